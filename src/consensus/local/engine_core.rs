use crate::commitlog::{InMemoryLog, Log};
use crate::consensus::commit_stream::{self, CommitStreamPublisher};
use crate::consensus::leadership::{self, LeadershipListener, LeadershipNotifier};
use crate::consensus::local::log_entry::LogEntry;
use crate::consensus::local::LocalConsensusError;
use crate::consensus::{
    CatchUp, Committed, CommittedEntry, EntryId, LeaderInfo, Leadership, ReplicatedStateMachine, SnapshotArtifact,
    SubmitError, Term,
};
use crate::snapshot::{SnapshotError, SnapshotMeta, SnapshotStore};
use bytes::Bytes;
use std::io::Read;

#[derive(Clone, Debug)]
pub(super) enum LeadershipChange {
    BecomeLeader,
    StepDown(Option<LeaderInfo>),
}

/// EngineCore is the single ordering point of the local engine. It owns the commit log and the
/// state machine; the actor feeds it one event at a time.
pub(super) struct EngineCore<M: ReplicatedStateMachine> {
    logger: slog::Logger,
    state_machine: M,
    log: InMemoryLog<LogEntry>,
    term: Term,
    leadership: Leadership,
    leadership_notifier: LeadershipNotifier,
    subscribers: Vec<CommitStreamPublisher>,
    snapshot_store: Box<dyn SnapshotStore>,
    latest_snapshot: Option<SnapshotMeta>,
    snapshot_threshold: u64,
    last_entry: Option<EntryId>,
}

impl<M: ReplicatedStateMachine> EngineCore<M> {
    /// Builds the core on top of whatever the snapshot store holds. The node starts without a leader.
    pub(super) fn recover(
        logger: slog::Logger,
        mut state_machine: M,
        snapshot_store: Box<dyn SnapshotStore>,
        snapshot_threshold: u64,
    ) -> Result<(Self, LeadershipListener), LocalConsensusError> {
        let latest_snapshot = match snapshot_store.latest()? {
            Some((meta, mut reader)) => {
                state_machine.restore(&mut reader)?;
                slog::info!(logger, "Recovered from snapshot {:?}", meta.last_included);
                Some(meta)
            }
            None => None,
        };

        let last_entry = latest_snapshot.map(|meta| meta.last_included);
        let log = match last_entry {
            Some(id) => InMemoryLog::starting_at(id.index.plus(1)),
            None => InMemoryLog::create()?,
        };
        let term = last_entry.map(|id| id.term).unwrap_or_default();

        let (leadership_notifier, leadership_listener) = leadership::new(Leadership::NoLeader);

        let core = EngineCore {
            logger,
            state_machine,
            log,
            term,
            leadership: Leadership::NoLeader,
            leadership_notifier,
            subscribers: Vec::new(),
            snapshot_store,
            latest_snapshot,
            snapshot_threshold,
            last_entry,
        };

        Ok((core, leadership_listener))
    }

    pub(super) fn submit(&mut self, data: Bytes) -> Result<Committed<M::Output>, SubmitError> {
        match &self.leadership {
            Leadership::Leader => {}
            Leadership::Follower(leader) => return Err(SubmitError::NotLeader(leader.clone())),
            Leadership::NoLeader => return Err(SubmitError::NoLeader),
        }

        let index = self.log.append(LogEntry {
            term: self.term,
            data: data.clone(),
        })?;
        let entry = CommittedEntry {
            id: EntryId { term: self.term, index },
            data,
        };

        // With a single ordering point, an appended entry is a committed one.
        let output = self.state_machine.apply(&entry);
        self.last_entry = Some(entry.id);
        self.publish(&entry);
        self.snapshot_if_due();

        Ok(Committed {
            entry_id: entry.id,
            output,
        })
    }

    pub(super) fn subscribe(&mut self) -> Result<CatchUp, LocalConsensusError> {
        let snapshot = match self.snapshot_store.latest()? {
            Some((meta, mut reader)) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                Some(SnapshotArtifact {
                    meta,
                    bytes: Bytes::from(bytes),
                })
            }
            None => None,
        };

        let mut backlog = Vec::new();
        let mut index = self.log.first_index();
        while index < self.log.next_index() {
            if let Some(entry) = self.log.read(index)? {
                backlog.push(CommittedEntry {
                    id: EntryId { term: entry.term, index },
                    data: entry.data,
                });
            }
            index = index.plus(1);
        }

        let (publisher, stream) = commit_stream::new();
        self.subscribers.push(publisher);
        slog::info!(
            self.logger,
            "New subscriber catching up with {} backlog entries",
            backlog.len()
        );

        Ok(CatchUp {
            snapshot,
            backlog,
            stream,
        })
    }

    pub(super) fn change_leadership(&mut self, change: LeadershipChange) -> Term {
        let leadership = match change {
            LeadershipChange::BecomeLeader => {
                if !self.leadership.is_leader() {
                    self.term = self.term.next();
                }
                Leadership::Leader
            }
            LeadershipChange::StepDown(Some(leader)) => Leadership::Follower(leader),
            LeadershipChange::StepDown(None) => Leadership::NoLeader,
        };

        if leadership != self.leadership {
            slog::info!(self.logger, "Leadership is now {:?} in term {}", leadership, self.term);
            self.leadership = leadership.clone();
            self.leadership_notifier.notify(leadership);
        }

        self.term
    }

    /// Snapshots the state machine and compacts the log behind it. `None` when nothing has been
    /// committed yet.
    pub(super) fn take_snapshot(&mut self) -> Result<Option<SnapshotMeta>, SnapshotError> {
        let last_included = match self.last_entry {
            Some(id) => id,
            None => return Ok(None),
        };
        if matches!(self.latest_snapshot, Some(meta) if meta.last_included == last_included) {
            return Ok(self.latest_snapshot);
        }

        let meta = SnapshotMeta { last_included };
        let snapshot = self.state_machine.snapshot()?;
        let sink = self.snapshot_store.create(meta)?;
        snapshot.persist(sink)?;

        self.latest_snapshot = Some(meta);
        self.log.compact_through(last_included.index);
        slog::info!(
            self.logger,
            "Snapshot through {:?} persisted; log now starts at {}",
            last_included,
            self.log.first_index()
        );

        Ok(Some(meta))
    }

    fn snapshot_if_due(&mut self) {
        let last_index = match self.last_entry {
            Some(id) => id.index.as_u64(),
            None => return,
        };
        let snapshot_index = self
            .latest_snapshot
            .map(|meta| meta.last_included.index.as_u64())
            .unwrap_or(0);

        if last_index - snapshot_index >= self.snapshot_threshold {
            if let Err(e) = self.take_snapshot() {
                // The log keeps everything, we'll try again on the next commit.
                slog::warn!(self.logger, "Threshold snapshot failed: {}", e);
            }
        }
    }

    fn publish(&mut self, entry: &CommittedEntry) {
        let logger = &self.logger;
        self.subscribers
            .retain(|subscriber| subscriber.notify_commit(logger, entry));
    }
}
