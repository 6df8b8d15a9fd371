mod actor;
mod engine_core;
mod log_entry;

use crate::consensus::local::actor::{ActorClient, ActorExited};
use crate::consensus::local::engine_core::{EngineCore, LeadershipChange};
use crate::consensus::{
    CatchUp, Committed, ConsensusEngine, LeaderInfo, Leadership, LeadershipListener, ReplicatedStateMachine,
    SubmitError, Term,
};
use crate::snapshot::{SnapshotError, SnapshotMeta, SnapshotStore};
use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use std::time::Duration;

pub struct LocalConsensusConfig {
    pub node_id: String,
    pub info_logger: slog::Logger,
    pub snapshot_store: Box<dyn SnapshotStore>,
    /// Committed entries between two automatic snapshots.
    pub snapshot_threshold: u64,
    pub mailbox_size: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum LocalConsensusError {
    #[error("snapshot failure")]
    Snapshot(#[from] SnapshotError),
    #[error("local I/O failure")]
    Io(#[from] io::Error),
    #[error("consensus engine has shut down")]
    EngineExited,
}

impl From<ActorExited> for LocalConsensusError {
    fn from(_: ActorExited) -> Self {
        LocalConsensusError::EngineExited
    }
}

/// LocalConsensus is an in-process consensus engine: a single ordering point with an in-memory log.
///
/// It doesn't elect anyone. The embedding application decides leadership through `become_leader`
/// and `step_down`. Other replicas in the same process follow it through `subscribe`.
pub struct LocalConsensus<O> {
    client: ActorClient<O>,
    leadership: LeadershipListener,
}

impl<O> Clone for LocalConsensus<O> {
    fn clone(&self) -> Self {
        LocalConsensus {
            client: self.client.clone(),
            leadership: self.leadership.clone(),
        }
    }
}

impl<O: Send + 'static> LocalConsensus<O> {
    /// Restores `state_machine` from the latest snapshot in the config's store, then starts the
    /// engine's event loop on the current tokio runtime.
    pub fn start<M>(config: LocalConsensusConfig, state_machine: M) -> Result<Self, LocalConsensusError>
    where
        M: ReplicatedStateMachine<Output = O>,
    {
        let logger = config.info_logger.new(slog::o!("node" => config.node_id));

        let (core, leadership) = EngineCore::recover(
            logger.clone(),
            state_machine,
            config.snapshot_store,
            config.snapshot_threshold,
        )?;

        let (client, actor) = actor::create(logger, config.mailbox_size, core);
        tokio::spawn(actor.run_event_loop());

        Ok(LocalConsensus { client, leadership })
    }

    /// Starts a new term with this node as leader. A no-op when already leading.
    pub async fn become_leader(&self) -> Result<Term, LocalConsensusError> {
        Ok(self.client.change_leadership(LeadershipChange::BecomeLeader).await?)
    }

    /// Stops accepting submissions. Later submissions are redirected to `leader`, if known.
    pub async fn step_down(&self, leader: Option<LeaderInfo>) -> Result<Term, LocalConsensusError> {
        Ok(self.client.change_leadership(LeadershipChange::StepDown(leader)).await?)
    }

    pub async fn subscribe(&self) -> Result<CatchUp, LocalConsensusError> {
        self.client.subscribe().await
    }

    /// Snapshots everything committed so far and compacts the log behind it.
    pub async fn take_snapshot(&self) -> Result<Option<SnapshotMeta>, LocalConsensusError> {
        self.client.take_snapshot().await
    }

    pub fn leadership_listener(&self) -> LeadershipListener {
        self.leadership.clone()
    }
}

#[async_trait]
impl<O: Send + 'static> ConsensusEngine for LocalConsensus<O> {
    type Output = O;

    async fn submit(&self, command: Bytes, timeout: Duration) -> Result<Committed<O>, SubmitError> {
        self.client.submit(command, timeout).await
    }

    fn leadership(&self) -> Leadership {
        self.leadership.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::{CommittedEntry, Follower, StateSnapshot};
    use crate::snapshot::{InMemorySnapshotStore, SnapshotSink};
    use std::io::{Read, Write};

    // Keeps every payload it was given; snapshots are the payloads joined by newlines.
    #[derive(Default)]
    struct RecordingMachine {
        applied: Vec<(u64, Bytes)>,
    }

    struct RecordingSnapshot(Vec<u8>);

    impl StateSnapshot for RecordingSnapshot {
        fn persist(&self, mut sink: Box<dyn SnapshotSink>) -> Result<(), SnapshotError> {
            sink.write_all(&self.0)?;
            sink.close()?;
            Ok(())
        }
    }

    impl ReplicatedStateMachine for RecordingMachine {
        type Output = usize;

        fn apply(&mut self, entry: &CommittedEntry) -> usize {
            self.applied.push((entry.id.index.as_u64(), entry.data.clone()));
            self.applied.len()
        }

        fn snapshot(&mut self) -> Result<Box<dyn StateSnapshot>, SnapshotError> {
            let joined: Vec<&[u8]> = self.applied.iter().map(|(_, data)| data.as_ref()).collect();
            Ok(Box::new(RecordingSnapshot(joined.join(&b'\n'))))
        }

        fn restore(&mut self, reader: &mut dyn Read) -> Result<(), SnapshotError> {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            self.applied = bytes
                .split(|b| *b == b'\n')
                .filter(|part| !part.is_empty())
                .enumerate()
                .map(|(i, part)| (i as u64 + 1, Bytes::copy_from_slice(part)))
                .collect();
            Ok(())
        }
    }

    fn config(store: &InMemorySnapshotStore, snapshot_threshold: u64) -> LocalConsensusConfig {
        LocalConsensusConfig {
            node_id: "node-a".into(),
            info_logger: slog::Logger::root(slog::Discard, slog::o!()),
            snapshot_store: Box::new(store.clone()),
            snapshot_threshold,
            mailbox_size: 8,
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn only_the_leader_accepts_submissions() {
        let engine = LocalConsensus::start(config(&InMemorySnapshotStore::new(), 100), RecordingMachine::default())
            .unwrap();
        assert_eq!(engine.leadership(), Leadership::NoLeader);
        assert!(matches!(
            engine.submit(Bytes::from_static(b"a"), TIMEOUT).await,
            Err(SubmitError::NoLeader)
        ));

        let term = engine.become_leader().await.unwrap();
        assert_eq!(term, Term::new(1));
        let committed = engine.submit(Bytes::from_static(b"a"), TIMEOUT).await.unwrap();
        assert_eq!(committed.entry_id.index.as_u64(), 1);
        assert_eq!(committed.entry_id.term, Term::new(1));
        assert_eq!(committed.output, 1);

        let leader = LeaderInfo {
            node_id: "node-b".into(),
            address: None,
        };
        engine.step_down(Some(leader.clone())).await.unwrap();
        match engine.submit(Bytes::from_static(b"b"), TIMEOUT).await {
            Err(SubmitError::NotLeader(info)) => assert_eq!(info, leader),
            other => panic!("unexpected {:?}", other.map(|c| c.output)),
        }
    }

    #[tokio::test]
    async fn leadership_changes_are_observable() {
        let engine = LocalConsensus::<usize>::start(
            config(&InMemorySnapshotStore::new(), 100),
            RecordingMachine::default(),
        )
        .unwrap();
        let mut listener = engine.leadership_listener();

        engine.become_leader().await.unwrap();
        assert_eq!(listener.next().await, Some(Leadership::Leader));

        engine.step_down(None).await.unwrap();
        assert_eq!(listener.next().await, Some(Leadership::NoLeader));

        // A new term for every election.
        assert_eq!(engine.become_leader().await.unwrap(), Term::new(2));
    }

    #[tokio::test]
    async fn threshold_snapshot_compacts_and_subscribers_catch_up() {
        let store = InMemorySnapshotStore::new();
        let engine = LocalConsensus::start(config(&store, 3), RecordingMachine::default()).unwrap();
        engine.become_leader().await.unwrap();

        for payload in vec!["a", "b", "c", "d"] {
            engine.submit(Bytes::from(payload), TIMEOUT).await.unwrap();
        }
        assert_eq!(store.latest_meta().map(|m| m.last_included.index.as_u64()), Some(3));

        let catch_up = engine.subscribe().await.unwrap();
        assert_eq!(catch_up.snapshot.as_ref().map(|s| s.bytes.clone()), Some(Bytes::from("a\nb\nc")));
        assert_eq!(catch_up.backlog.len(), 1);
        assert_eq!(catch_up.backlog[0].id.index.as_u64(), 4);

        let logger = slog::Logger::root(slog::Discard, slog::o!());
        let mut follower = Follower::catch_up(logger, catch_up, RecordingMachine::default()).unwrap();
        engine.submit(Bytes::from("e"), TIMEOUT).await.unwrap();
        let (entry, output) = follower.apply_next().await.unwrap();

        assert_eq!(entry.id.index.as_u64(), 5);
        assert_eq!(output, 5);
        let payloads: Vec<Bytes> = follower.state_machine().applied.iter().map(|(_, d)| d.clone()).collect();
        assert_eq!(payloads, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn restart_resumes_after_snapshot() {
        let store = InMemorySnapshotStore::new();
        {
            let engine = LocalConsensus::start(config(&store, 100), RecordingMachine::default()).unwrap();
            engine.become_leader().await.unwrap();
            engine.submit(Bytes::from("a"), TIMEOUT).await.unwrap();
            engine.submit(Bytes::from("b"), TIMEOUT).await.unwrap();
            let meta = engine.take_snapshot().await.unwrap().unwrap();
            assert_eq!(meta.last_included.index.as_u64(), 2);
        }

        let engine = LocalConsensus::start(config(&store, 100), RecordingMachine::default()).unwrap();
        let term = engine.become_leader().await.unwrap();
        let committed = engine.submit(Bytes::from("c"), TIMEOUT).await.unwrap();

        assert_eq!(term, Term::new(2));
        assert_eq!(committed.entry_id.index.as_u64(), 3);
        assert_eq!(committed.output, 3);
    }

    #[tokio::test]
    async fn nothing_to_snapshot_before_first_commit() {
        let engine = LocalConsensus::<usize>::start(
            config(&InMemorySnapshotStore::new(), 100),
            RecordingMachine::default(),
        )
        .unwrap();

        assert!(engine.take_snapshot().await.unwrap().is_none());
    }
}
