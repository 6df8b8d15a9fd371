use crate::commitlog::Index;
use crate::snapshot::{SnapshotError, SnapshotSink};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::Read;
use std::net::SocketAddr;
use std::time::Duration;
use std::{fmt, io};

/// Term is the leadership epoch an entry was ordered in.
#[derive(Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, Default)]
pub struct Term(u64);

impl Term {
    pub fn new(term: u64) -> Self {
        Term(term)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(&self) -> Self {
        Term(self.0 + 1)
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an entry in the replicated log.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId {
    pub term: Term,
    pub index: Index,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommittedEntry {
    pub id: EntryId,
    pub data: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderInfo {
    pub node_id: String,
    pub address: Option<SocketAddr>,
}

/// This node's view of who may accept mutating submissions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Leadership {
    Leader,
    Follower(LeaderInfo),
    NoLeader,
}

impl Leadership {
    pub fn is_leader(&self) -> bool {
        matches!(self, Leadership::Leader)
    }

    pub fn current_leader(&self) -> Option<&LeaderInfo> {
        match self {
            Leadership::Follower(leader) => Some(leader),
            _ => None,
        }
    }
}

/// Committed is the answer to a successful submission: where the entry landed and what the
/// leader's state machine produced when it applied it.
#[derive(Clone, Debug, PartialEq)]
pub struct Committed<O> {
    pub entry_id: EntryId,
    pub output: O,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("this node is not the leader; leader is {}", .0.node_id)]
    NotLeader(LeaderInfo),
    #[error("no leader is currently known")]
    NoLeader,
    #[error("entry was not committed within {0:?}; it may still commit later")]
    Timeout(Duration),
    #[error("local log write failed")]
    LocalIo(#[from] io::Error),
    #[error("consensus engine has shut down")]
    EngineExited,
}

/// ConsensusEngine orders opaque command payloads into a replicated log.
///
/// An `Ok` from `submit` means the entry is durably committed and has been applied to the local
/// state machine; `output` is what that apply returned. `Timeout` means the outcome is unknown.
#[async_trait]
pub trait ConsensusEngine: Send + Sync {
    type Output: Send;

    async fn submit(&self, command: Bytes, timeout: Duration) -> Result<Committed<Self::Output>, SubmitError>;

    fn leadership(&self) -> Leadership;
}

/// ReplicatedStateMachine is driven by the consensus engine on every replica.
///
/// Guarantees the engine gives the implementation:
///
/// * `apply` is called exactly once per committed entry, in commit order, never concurrently.
/// * `snapshot` and `restore` are never called concurrently with `apply`.
/// * After `restore`, the next `apply` is for the entry right after the snapshot's last one.
///
/// What the implementation must give back: `apply` is deterministic and never panics on bad input.
pub trait ReplicatedStateMachine: Send + 'static {
    type Output: Send + 'static;

    fn apply(&mut self, entry: &CommittedEntry) -> Self::Output;

    /// A detached, point-in-time copy of the state. Persisting it may happen later and elsewhere.
    fn snapshot(&mut self) -> Result<Box<dyn StateSnapshot>, SnapshotError>;

    /// Replaces the entire state with the one read from `reader`. On error the state is untouched.
    fn restore(&mut self, reader: &mut dyn Read) -> Result<(), SnapshotError>;
}

pub trait StateSnapshot: Send {
    /// Writes the snapshot to `sink`, closing it on success and cancelling it on failure.
    fn persist(&self, sink: Box<dyn SnapshotSink>) -> Result<(), SnapshotError>;
}
