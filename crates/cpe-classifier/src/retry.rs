//! Deadline-bounded retry for classifier HTTP calls.
//!
//! A classification has one time budget, the adapter timeout.
//! [`RetryPolicy`] stops as soon as the next backoff would cross that
//! deadline and returns the last transport error.
//!
//! Only connection-level failures are retried. A request that itself timed
//! out is returned as is. HTTP error statuses are not errors at this layer
//! and return on the first attempt.

use std::time::Duration;

use tokio::time::Instant;

/// Retry attempts after the initial request, when the budget allows.
const MAX_RETRIES: u32 = 3;

/// First backoff; doubles on each retry.
const BASE_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    budget: Duration,
}

impl RetryPolicy {
    /// Default backoff, bounded by `budget` measured from the first attempt.
    pub(crate) fn within(budget: Duration) -> Self {
        Self {
            max_retries: MAX_RETRIES,
            base_delay: BASE_DELAY,
            budget,
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Send via `f`, retrying connection failures while the budget lasts.
    pub(crate) async fn send<F, Fut>(&self, f: F) -> Result<reqwest::Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let deadline = Instant::now() + self.budget;
        let mut attempt = 0;
        loop {
            let err = match f().await {
                Ok(resp) => return Ok(resp),
                Err(e) => e,
            };
            if err.is_timeout() || attempt >= self.max_retries {
                return Err(err);
            }
            let delay = self.backoff(attempt);
            if Instant::now() + delay >= deadline {
                tracing::debug!(attempt = attempt + 1, "classifier retry budget exhausted");
                return Err(err);
            }
            tracing::warn!(
                attempt = attempt + 1,
                max_retries = self.max_retries,
                "classifier request failed, retrying in {delay:?}: {err}"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
