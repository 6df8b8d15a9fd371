use crate::consensus::{CommitStream, CommittedEntry, ReplicatedStateMachine};
use crate::snapshot::{SnapshotError, SnapshotMeta};
use bytes::Bytes;

/// Everything a new replica needs to reach the leader's state: the latest snapshot, the committed
/// entries after it, and a stream of everything committed from then on.
pub struct CatchUp {
    pub snapshot: Option<SnapshotArtifact>,
    pub backlog: Vec<CommittedEntry>,
    pub stream: CommitStream,
}

#[derive(Clone, Debug)]
pub struct SnapshotArtifact {
    pub meta: SnapshotMeta,
    pub bytes: Bytes,
}

/// Follower is a replica that applies what another node has committed.
pub struct Follower<M: ReplicatedStateMachine> {
    logger: slog::Logger,
    state_machine: M,
    stream: CommitStream,
}

impl<M: ReplicatedStateMachine> Follower<M> {
    /// Restores the snapshot into `state_machine` and applies the backlog.
    pub fn catch_up(logger: slog::Logger, catch_up: CatchUp, mut state_machine: M) -> Result<Self, SnapshotError> {
        if let Some(snapshot) = &catch_up.snapshot {
            slog::info!(logger, "Restoring from snapshot {:?}", snapshot.meta.last_included);
            state_machine.restore(&mut snapshot.bytes.as_ref())?;
        }

        slog::info!(logger, "Applying {} backlog entries", catch_up.backlog.len());
        for entry in catch_up.backlog.iter() {
            state_machine.apply(entry);
        }

        Ok(Follower {
            logger,
            state_machine,
            stream: catch_up.stream,
        })
    }

    /// Applies the next committed entry. `None` once the engine has shut down.
    pub async fn apply_next(&mut self) -> Option<(CommittedEntry, M::Output)> {
        let entry = self.stream.next().await?;
        let output = self.state_machine.apply(&entry);

        Some((entry, output))
    }

    /// Applies entries until the engine shuts down, then hands the state machine back.
    pub async fn run(mut self) -> M {
        while self.apply_next().await.is_some() {}

        slog::info!(self.logger, "Commit stream closed, follower stopping.");
        self.state_machine
    }

    pub fn state_machine(&self) -> &M {
        &self.state_machine
    }
}
