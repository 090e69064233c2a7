//! Bounded status polling shared by search jobs and export domain events.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::ClientError;
use crate::task::{JobContext, JobProgress};

/// How often and how many times to check a status resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    #[must_use]
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

/// Outcome of one status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep<T> {
    /// Not terminal yet, with the server's percentage if it reported one.
    Pending(Option<u8>),
    Ready(T),
}

/// Call `probe` until it is ready, fails, or `policy.max_attempts` is spent.
///
/// Cancellation is checked before every attempt and interrupts the sleep
/// between attempts. There is no sleep after the last attempt.
///
/// # Errors
///
/// Propagates any error from `probe`, [`ClientError::Cancelled`], or
/// [`ClientError::PollingTimeout`] after the final non-terminal attempt.
pub async fn poll_until<T, F, Fut>(
    policy: PollPolicy,
    ctx: &JobContext,
    mut probe: F,
) -> Result<T, ClientError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PollStep<T>, ClientError>>,
{
    let max_attempts = policy.max_attempts;
    for attempt in 1..=max_attempts {
        ctx.check_cancelled()?;
        match probe(attempt).await? {
            PollStep::Ready(value) => {
                debug!(attempt, max_attempts, "poll reached terminal state");
                return Ok(value);
            }
            PollStep::Pending(percent) => {
                debug!(attempt, max_attempts, ?percent, "poll not terminal");
                ctx.report(JobProgress::Polling {
                    attempt,
                    max_attempts,
                    percent,
                });
                if attempt < max_attempts {
                    ctx.sleep(policy.interval).await?;
                }
            }
        }
    }
    Err(ClientError::PollingTimeout {
        attempts: max_attempts,
    })
}
