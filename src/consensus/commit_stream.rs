use crate::consensus::CommittedEntry;
use tokio::sync::mpsc;

pub(super) fn new() -> (CommitStreamPublisher, CommitStream) {
    let (tx, rx) = mpsc::unbounded_channel();

    let publisher = CommitStreamPublisher { sender: tx };
    let stream = CommitStream { receiver: rx };

    (publisher, stream)
}

pub(super) struct CommitStreamPublisher {
    sender: mpsc::UnboundedSender<CommittedEntry>,
}

impl CommitStreamPublisher {
    /// Returns false once the stream has been dropped; the caller should forget this publisher.
    pub(super) fn notify_commit(&self, logger: &slog::Logger, entry: &CommittedEntry) -> bool {
        if self.sender.send(entry.clone()).is_err() {
            slog::info!(logger, "CommitStream has disconnected.");
            return false;
        }

        true
    }
}

/// CommitStream delivers committed entries in commit order, without gaps, starting right after the
/// catch-up point it was handed out with.
pub struct CommitStream {
    receiver: mpsc::UnboundedReceiver<CommittedEntry>,
}

impl CommitStream {
    /// next returns the next committed entry, or `None` once the engine has shut down.
    pub async fn next(&mut self) -> Option<CommittedEntry> {
        self.receiver.recv().await
    }
}
