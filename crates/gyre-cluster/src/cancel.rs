//! Cooperative cancellation for migration scans.

use tokio::sync::watch;

/// Cancellation signal checked between key iterations of a migration scan.
///
/// Membership operations perform no I/O, so there is nothing to time out;
/// the only way to abort a long scan is this explicit cooperative check.
/// Once an operation observes the signal it stops immediately and returns
/// [`Cancelled`](crate::ClusterError::Cancelled) — without rollback.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

/// Sender half of a cancellation pair.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelToken {
    /// Create a connected handle/token pair.
    pub fn pair() -> (CancelHandle, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelToken { rx })
    }

    /// A token that is never cancelled.
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        CancelToken { rx }
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

impl CancelHandle {
    /// Request cancellation of the associated operation.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}
