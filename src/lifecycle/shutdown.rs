//! Cancellation token for background pollers.

use tokio::sync::broadcast;

/// Cancellation token scoped to one owner (a watch command, a view), not to
/// the process.
///
/// Each poller started by the owner holds a receiver from [`Shutdown::subscribe`]
/// and exits its loop when the owner calls [`Shutdown::trigger`]. Executor
/// invocations already in flight are not interrupted; the poller stops at its
/// next `select!`. Independent owners create independent tokens.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Fresh token with no listeners.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for one poller.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop every poller holding a receiver. A token with no live
    /// receivers is a no-op.
    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Cancellation triggered with no pollers listening");
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
