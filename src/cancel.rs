//! Cancellation signal for long-running waits.
//!
//! A [`CancelToken`] is cloned into every place that may block on the cluster
//! converging. Cancelling any clone wakes all waiters.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Cloneable cancellation handle.
#[derive(Clone)]
pub struct CancelToken {
    /// Watch channel carrying the cancelled flag.
    watch: watch::Receiver<bool>,
    /// Internal sender for watch channel.
    watch_tx: Arc<watch::Sender<bool>>,
    /// Flag indicating if cancellation has been requested.
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        let (watch_tx, watch) = watch::channel(false);
        Self {
            watch,
            watch_tx: Arc::new(watch_tx),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. Only the first call has any effect.
    pub fn cancel(&self) {
        if self
            .cancelled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Cancellation requested");
            let _ = self.watch_tx.send(true);
        }
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once cancellation is requested (for use in `select!`).
    pub async fn cancelled(&self) {
        let mut rx = self.watch.clone();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                // Sender is owned by this token, so this only happens during teardown.
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
