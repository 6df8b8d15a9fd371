use crate::consensus::Leadership;
use tokio::sync::watch;

pub(super) fn new(initial: Leadership) -> (LeadershipNotifier, LeadershipListener) {
    let (snd, rcv) = watch::channel(initial);

    (LeadershipNotifier { snd }, LeadershipListener { rcv })
}

pub(super) struct LeadershipNotifier {
    snd: watch::Sender<Leadership>,
}

impl LeadershipNotifier {
    pub(super) fn notify(&self, leadership: Leadership) {
        let _ = self.snd.send(leadership);
    }
}

/// LeadershipListener observes this node's leadership. It doesn't queue: changes that happen
/// between two calls to `next` collapse into the most recent one.
#[derive(Clone)]
pub struct LeadershipListener {
    rcv: watch::Receiver<Leadership>,
}

impl LeadershipListener {
    pub fn current(&self) -> Leadership {
        self.rcv.borrow().clone()
    }

    /// Waits for the next change. `None` once the engine has shut down.
    pub async fn next(&mut self) -> Option<Leadership> {
        match self.rcv.changed().await {
            Ok(_) => Some(self.rcv.borrow().clone()),
            Err(_) => None,
        }
    }
}
