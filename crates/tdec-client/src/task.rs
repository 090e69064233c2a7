//! Background jobs with progress notifications and cooperative cancellation.
//!
//! Long operations (search, export) run as a spawned tokio task wrapped in a
//! [`JobTask`]. The task body receives a [`JobContext`]; it publishes
//! [`JobProgress`] values on a `watch` channel and checks its [`CancelToken`]
//! at every suspension point. Cancelling interrupts an inter-poll sleep
//! immediately.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::ClientError;

/// Where a job currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum JobProgress {
    #[default]
    Idle,
    /// The server accepted the job under this id.
    Submitted { job_id: String },
    /// A status check came back non-terminal.
    Polling {
        attempt: u32,
        max_attempts: u32,
        /// Server-reported completion, when it gives one.
        percent: Option<u8>,
    },
    /// Fetching detailed records for this many structures.
    Resolving { structures: usize },
    Downloading { file_name: String },
    Unpacking,
    Done,
}

/// Shared, clonable cancellation flag.
#[derive(Debug, Clone)]
pub struct CancelToken(Arc<watch::Sender<bool>>);

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(watch::channel(false).0))
    }

    pub fn cancel(&self) {
        self.0.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once [`CancelToken::cancel`] has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.0.subscribe();
        // The sender lives in `self`, so this only returns once the flag is set.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Handed to a job body: where to report progress, how to notice cancellation.
#[derive(Debug, Clone)]
pub struct JobContext {
    cancel: CancelToken,
    progress: Arc<watch::Sender<JobProgress>>,
}

impl Default for JobContext {
    fn default() -> Self {
        Self::new()
    }
}

impl JobContext {
    /// A context nobody observes; for running client operations inline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancel: CancelToken::new(),
            progress: Arc::new(watch::channel(JobProgress::Idle).0),
        }
    }

    #[must_use]
    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self {
            cancel,
            ..Self::new()
        }
    }

    pub fn report(&self, progress: JobProgress) {
        self.progress.send_replace(progress);
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<JobProgress> {
        self.progress.subscribe()
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// `Err(Cancelled)` once cancellation was requested.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Cancelled`].
    pub fn check_cancelled(&self) -> Result<(), ClientError> {
        if self.cancel.is_cancelled() {
            Err(ClientError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Sleep for `duration` unless cancelled first.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Cancelled`] when cancellation wins the race.
    pub async fn sleep(&self, duration: Duration) -> Result<(), ClientError> {
        tokio::select! {
            () = tokio::time::sleep(duration) => Ok(()),
            () = self.cancel.cancelled() => Err(ClientError::Cancelled),
        }
    }
}

/// A spawned client operation.
#[derive(Debug)]
pub struct JobTask<T> {
    handle: JoinHandle<Result<T, ClientError>>,
    ctx: JobContext,
}

impl<T: Send + 'static> JobTask<T> {
    /// Spawn `body` on the current tokio runtime.
    pub fn spawn<F, Fut>(body: F) -> Self
    where
        F: FnOnce(JobContext) -> Fut,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let ctx = JobContext::new();
        let handle = tokio::spawn(body(ctx.clone()));
        Self { handle, ctx }
    }

    /// Ask the job to stop at its next suspension point.
    pub fn cancel(&self) {
        self.ctx.cancel.cancel();
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.ctx.cancel.clone()
    }

    #[must_use]
    pub fn progress(&self) -> watch::Receiver<JobProgress> {
        self.ctx.subscribe()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the job's result.
    ///
    /// # Errors
    ///
    /// Whatever the job returned, [`ClientError::Cancelled`] if the tokio task
    /// itself was aborted, or [`ClientError::TaskAborted`] if it panicked.
    pub async fn join(self) -> Result<T, ClientError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ClientError::Cancelled),
            Err(e) => Err(ClientError::TaskAborted(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn cancel_interrupts_sleep() {
        let ctx = JobContext::new();
        let cancel = ctx.cancel_token().clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        });

        let started = Instant::now();
        let result = ctx.sleep(Duration::from_secs(30)).await;
        assert!(matches!(result, Err(ClientError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn shared_token_cancels_every_context() {
        let token = CancelToken::new();
        let first = JobContext::with_cancel(token.clone());
        let second = JobContext::with_cancel(token.clone());
        assert!(first.check_cancelled().is_ok());

        token.cancel();
        assert!(matches!(first.check_cancelled(), Err(ClientError::Cancelled)));
        assert!(matches!(second.check_cancelled(), Err(ClientError::Cancelled)));
    }

    #[tokio::test]
    async fn sleep_completes_without_cancel() {
        let ctx = JobContext::new();
        assert!(ctx.sleep(Duration::from_millis(1)).await.is_ok());
        assert!(ctx.check_cancelled().is_ok());
    }

    #[tokio::test]
    async fn task_reports_progress_and_result() {
        let task = JobTask::spawn(|ctx| async move {
            ctx.report(JobProgress::Submitted {
                job_id: "42".into(),
            });
            ctx.report(JobProgress::Done);
            Ok::<_, ClientError>(7)
        });
        let progress = task.progress();
        assert_eq!(task.join().await.unwrap(), 7);
        assert_eq!(*progress.borrow(), JobProgress::Done);
    }

    #[tokio::test]
    async fn cancelled_task_returns_cancelled() {
        let task = JobTask::spawn(|ctx| async move {
            ctx.sleep(Duration::from_secs(60)).await?;
            Ok::<_, ClientError>(())
        });
        task.cancel();
        assert!(matches!(task.join().await, Err(ClientError::Cancelled)));
    }

    #[tokio::test]
    async fn panicking_task_is_reported() {
        let task = JobTask::spawn(|_ctx| async move {
            let failing = true;
            assert!(!failing, "boom");
            Ok::<_, ClientError>(())
        });
        assert!(matches!(task.join().await, Err(ClientError::TaskAborted(_))));
    }
}
