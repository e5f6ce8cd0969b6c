//! Cooperative cancellation
//!
//! A job receives a [`CancelToken`] and checks it between units of work. The
//! orchestrator keeps the matching [`CancelHandle`]. Both sides are backed by
//! a `tokio::sync::watch` channel carrying a single "cancelled" flag.

use tokio::sync::watch;

/// Creates a connected handle/token pair
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// Requesting side of a cancellation signal
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signals cancellation; never blocks and never fails
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Returns `true` once cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Observing side of a cancellation signal, handed to jobs
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token that is never cancelled
    pub fn never() -> Self {
        let (_, token) = cancel_pair();
        token
    }

    /// Returns `true` once cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes when cancellation is requested
    ///
    /// If the handle is dropped without cancelling, this never completes:
    /// a detached job keeps running after its orchestrator is gone.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
