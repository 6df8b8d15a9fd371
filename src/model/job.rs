use crate::model::{JobId, PrinterId, UnknownStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Job lifecycle: `queued → printing → {completed, failed}`. The string form of each variant is
/// persisted (log entries and snapshots). Don't rename.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Printing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Printing => "printing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether moving from `self` to `next` is an edge of the lifecycle graph. Self-loops are not.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Queued, JobStatus::Printing)
                | (JobStatus::Printing, JobStatus::Completed)
                | (JobStatus::Printing, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobStatus::Queued),
            "printing" => Ok(JobStatus::Printing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(UnknownStatusError::new("job", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrintJob {
    pub id: JobId,
    pub status: JobStatus,
    pub printer_id: PrinterId,
    /// Filament this job consumes, in grams. Fixed at submission.
    pub filament_weight: f64,
}

impl PrintJob {
    pub fn new(id: JobId, printer_id: PrinterId, filament_weight: f64) -> Self {
        PrintJob {
            id,
            status: JobStatus::Queued,
            printer_id,
            filament_weight,
        }
    }
}
