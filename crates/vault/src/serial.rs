//! FIFO serialization of secure-store operations.
//!
//! The platform forbids concurrent authentication prompts on the key store,
//! and screens fire security calls from several lifecycle hooks at once
//! (focus, resume, explicit button). Mutual exclusion alone is not enough:
//! a second unlock attempt arriving while one is pending must queue behind
//! it, so the queue imposes a total order matching submission order.

use std::future::Future;

use {
    futures::future::BoxFuture,
    tokio::sync::{mpsc, oneshot},
    tracing::debug,
};

use crate::error::VaultError;

type Job = BoxFuture<'static, ()>;

/// Single-worker queue imposing a total order on secure-store operations.
///
/// Submissions run strictly one at a time, in submission order. Each job
/// settles its own result through a `oneshot`, so a failed or abandoned
/// operation never blocks the ones queued behind it.
pub struct SerialQueue {
    tx: mpsc::UnboundedSender<Job>,
}

impl SerialQueue {
    /// Spawn the worker task. Must be called from within a tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                job.await;
            }
            debug!("serial queue worker stopped");
        });
        Self { tx }
    }

    /// Run `op` after every previously enqueued operation has settled.
    ///
    /// Returns [`VaultError::QueueClosed`] only when the worker is gone,
    /// which happens during process shutdown.
    pub async fn run<T, F>(&self, op: F) -> Result<T, VaultError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let job: Job = Box::pin(async move {
            // The receiver may be gone if the submitter was dropped; the
            // queue itself must still advance.
            let _ = done_tx.send(op.await);
        });

        self.tx.send(job).map_err(|_| VaultError::QueueClosed)?;
        done_rx.await.map_err(|_| VaultError::QueueClosed)
    }
}

impl Default for SerialQueue {
    fn default() -> Self {
        Self::new()
    }
}
