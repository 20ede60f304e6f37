//! Fan-out of user-visible notices.

use sitecal_core::UserNotifier;
use sitecal_domain::UserNotice;
use tokio::sync::broadcast;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 64;

/// Publishes notices on a broadcast channel. Notices sent while nobody is
/// subscribed are logged and dropped.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<UserNotice>,
}

impl BroadcastNotifier {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UserNotice> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl UserNotifier for BroadcastNotifier {
    fn notify(&self, notice: UserNotice) {
        debug!(
            kind = notice.kind.as_str(),
            operation = notice.operation.as_str(),
            message = %notice.message,
            "Calendar notice"
        );
        if self.sender.send(notice).is_err() {
            debug!("No notice subscribers");
        }
    }
}
