use crate::command::CommandDecodeError;
use crate::consensus::{LeaderInfo, SubmitError};
use crate::model::PrintJob;
use crate::state_machine::ValidationError;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The request breaks a fleet rule against the current state. Nothing was submitted.
    #[error("invalid request: {0}")]
    Invalid(ValidationError),

    /// The command was committed but the state had changed by the time it was applied.
    #[error("rejected when applied: {0}")]
    RejectedAtApply(ValidationError),

    #[error("this node is not the leader; leader is {}", .0.node_id)]
    NotLeader(LeaderInfo),

    #[error("no leader is currently known")]
    NoLeader,

    /// The command may or may not have been committed. Check before retrying.
    #[error("outcome unknown: no commit within {0:?}")]
    OutcomeUnknown(Duration),

    /// The id chosen for a new entity had already been taken by someone else.
    #[error("id conflict: {0}")]
    IdConflict(String),

    /// Every sequence number for this kind of entity is taken.
    #[error("no {0} ids left to allocate")]
    IdSpaceExhausted(&'static str),

    /// The job was committed and is queued on its printer, but starting it failed. The printer
    /// stays reserved for this job until its status is updated.
    #[error("job '{}' was queued but not started", .job.id)]
    NotActivated {
        job: PrintJob,
        #[source]
        source: Box<PipelineError>,
    },

    #[error("failed to encode command")]
    Encode(#[source] serde_json::Error),

    #[error("committed command couldn't be decoded")]
    Undecodable(#[source] CommandDecodeError),

    #[error("unexpected apply outcome: {0}")]
    UnexpectedOutcome(String),

    #[error("consensus engine unavailable")]
    Unavailable(#[source] SubmitError),
}

impl PipelineError {
    /// Whether the same request may succeed if sent again, possibly to another node.
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::RejectedAtApply(_)
            | PipelineError::NotLeader(_)
            | PipelineError::NoLeader
            | PipelineError::OutcomeUnknown(_)
            | PipelineError::IdConflict(_)
            | PipelineError::Unavailable(_) => true,
            PipelineError::Invalid(_)
            | PipelineError::IdSpaceExhausted(_)
            | PipelineError::NotActivated { .. }
            | PipelineError::Encode(_)
            | PipelineError::Undecodable(_)
            | PipelineError::UnexpectedOutcome(_) => false,
        }
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            PipelineError::Invalid(e) | PipelineError::RejectedAtApply(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SubmitError> for PipelineError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::NotLeader(leader) => PipelineError::NotLeader(leader),
            SubmitError::NoLeader => PipelineError::NoLeader,
            SubmitError::Timeout(timeout) => PipelineError::OutcomeUnknown(timeout),
            e @ SubmitError::LocalIo(_) | e @ SubmitError::EngineExited => PipelineError::Unavailable(e),
        }
    }
}
