use crate::consensus::local::engine_core::{EngineCore, LeadershipChange};
use crate::consensus::local::LocalConsensusError;
use crate::consensus::{CatchUp, Committed, ReplicatedStateMachine, SubmitError, Term};
use crate::snapshot::{SnapshotError, SnapshotMeta};
use bytes::Bytes;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time;

pub(super) fn create<M: ReplicatedStateMachine>(
    logger: slog::Logger,
    mailbox_size: usize,
    core: EngineCore<M>,
) -> (ActorClient<M::Output>, EngineActor<M>) {
    let (tx, rx) = mpsc::channel(mailbox_size);
    let client = ActorClient { sender: tx };
    let actor = EngineActor {
        logger,
        receiver: rx,
        core,
    };

    (client, actor)
}

// Disk interaction (snapshots) is synchronous inside the actor. Submissions queue up behind a
// snapshot while it is being written.
enum Event<O> {
    // Leader: append, apply, publish to subscribers, then answer.
    // Otherwise: redirect.
    Submit(Bytes, Callback<Committed<O>, SubmitError>),

    // Hand out the latest snapshot, the log after it, and a stream of what comes next.
    Subscribe(Callback<CatchUp, LocalConsensusError>),

    ChangeLeadership(LeadershipChange, oneshot::Sender<Term>),

    TakeSnapshot(Callback<Option<SnapshotMeta>, SnapshotError>),
}

struct Callback<O, E>(oneshot::Sender<Result<O, E>>);

impl<O, E> Callback<O, E> {
    fn send(self, message: Result<O, E>) {
        let _ = self.0.send(message);
    }
}

#[derive(Debug, thiserror::Error)]
#[error("engine actor has exited")]
pub struct ActorExited;

pub(super) struct ActorClient<O> {
    sender: mpsc::Sender<Event<O>>,
}

// Derived Clone would require `O: Clone`.
impl<O> Clone for ActorClient<O> {
    fn clone(&self) -> Self {
        ActorClient {
            sender: self.sender.clone(),
        }
    }
}

impl<O: Send + 'static> ActorClient<O> {
    /// The timeout covers the whole trip: waiting for mailbox space, ordering, and applying. When it
    /// fires the entry may still be committed later.
    pub(super) async fn submit(&self, data: Bytes, timeout: Duration) -> Result<Committed<O>, SubmitError> {
        let round_trip = async {
            let (tx, rx) = oneshot::channel();
            self.send(Event::Submit(data, Callback(tx)))
                .await
                .map_err(|_| SubmitError::EngineExited)?;

            rx.await.map_err(|_| SubmitError::EngineExited)?
        };

        match time::timeout(timeout, round_trip).await {
            Ok(result) => result,
            Err(_) => Err(SubmitError::Timeout(timeout)),
        }
    }

    pub(super) async fn subscribe(&self) -> Result<CatchUp, LocalConsensusError> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::Subscribe(Callback(tx))).await?;

        rx.await.map_err(|_| ActorExited)?
    }

    pub(super) async fn change_leadership(&self, change: LeadershipChange) -> Result<Term, ActorExited> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::ChangeLeadership(change, tx)).await?;

        rx.await.map_err(|_| ActorExited)
    }

    pub(super) async fn take_snapshot(&self) -> Result<Option<SnapshotMeta>, LocalConsensusError> {
        let (tx, rx) = oneshot::channel();
        self.send(Event::TakeSnapshot(Callback(tx))).await?;

        let result = rx.await.map_err(|_| ActorExited)?;
        Ok(result?)
    }

    async fn send(&self, event: Event<O>) -> Result<(), ActorExited> {
        self.sender.send(event).await.map_err(|_| ActorExited)
    }
}

/// EngineActor is the local engine in actor model.
pub(super) struct EngineActor<M: ReplicatedStateMachine> {
    logger: slog::Logger,
    receiver: mpsc::Receiver<Event<M::Output>>,
    core: EngineCore<M>,
}

impl<M: ReplicatedStateMachine> EngineActor<M> {
    pub(super) async fn run_event_loop(mut self) {
        while let Some(event) = self.receiver.recv().await {
            self.handle_event(event);
        }

        slog::info!(self.logger, "All engine handles dropped, event loop exiting.");
    }

    // This must NOT be async. Everything the core does happens between two events.
    fn handle_event(&mut self, event: Event<M::Output>) {
        match event {
            Event::Submit(data, callback) => {
                let result = self.core.submit(data);
                callback.send(result);
            }
            Event::Subscribe(callback) => {
                let result = self.core.subscribe();
                callback.send(result);
            }
            Event::ChangeLeadership(change, callback) => {
                let term = self.core.change_leadership(change);
                let _ = callback.send(term);
            }
            Event::TakeSnapshot(callback) => {
                let result = self.core.take_snapshot();
                callback.send(result);
            }
        }
    }
}
