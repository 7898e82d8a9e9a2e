//! Task group for the client's background tasks.

use std::future::Future;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::ClientError;

/// Owns the background tasks and reports the first failure.
///
/// The first task to fail cancels the shared token so the rest return
/// promptly. Dropping the group aborts anything still running.
pub struct TaskGroup {
    tasks: JoinSet<Result<(), ClientError>>,
    cancel: CancellationToken,
}

impl TaskGroup {
    #[must_use]
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            tasks: JoinSet::new(),
            cancel,
        }
    }

    /// Shared cancellation token.
    #[must_use]
    pub const fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Spawn a named task. An `Err` from the task cancels the shared token
    /// as soon as it is returned, whether or not anyone is waiting.
    pub fn spawn<F>(&mut self, name: &'static str, task: F)
    where
        F: Future<Output = Result<(), ClientError>> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        let task = async move {
            let result = task.await;
            if let Err(e) = &result {
                tracing::error!("Background task failed: {e}");
                cancel.cancel();
            }
            result
        };
        self.tasks
            .spawn(task.instrument(tracing::debug_span!("task", name)));
    }

    /// Number of tasks not yet joined.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every task to finish, returning the first error.
    ///
    /// # Errors
    /// Returns the first task error, or a join error if a task panicked.
    pub async fn wait(&mut self) -> Result<(), ClientError> {
        let mut first = None;
        while let Some(joined) = self.tasks.join_next().await {
            let result = joined.map_err(ClientError::from).and_then(|r| r);
            if let Err(e) = result {
                if first.is_none() {
                    // Panics skip the cancel in `spawn`.
                    self.cancel.cancel();
                    first = Some(e);
                } else {
                    tracing::debug!("Further task failure: {e}");
                }
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Cancel all tasks and wait for them.
    ///
    /// # Errors
    /// Returns a task error that had not been observed yet.
    pub async fn shutdown(&mut self) -> Result<(), ClientError> {
        self.cancel.cancel();
        self.wait().await
    }
}
