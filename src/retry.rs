//! Exponential backoff for rate-limited API calls.

use crate::error::is_quota_exceeded;
use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Doubling backoff schedule with a capped delay.
///
/// Retries continue for as long as the predicate accepts the error; there is
/// no attempt ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    max: Duration,
}

impl Backoff {
    /// Creates a schedule starting at `base` and never exceeding `max`.
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }

    /// A schedule that never sleeps (for tests and dry runs).
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Base delay, also used as the pause between successful write batches.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base.saturating_mul(factor).min(self.max)
    }

    /// Runs `op` until it succeeds or fails with an error `is_retryable` rejects.
    pub async fn retry<T, F, Fut, P>(&self, label: &str, is_retryable: P, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        P: Fn(&anyhow::Error) -> bool,
    {
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if is_retryable(&e) => {
                    let wait = self.delay_for(attempt);
                    warn!(
                        "Rate limit hit on {}, attempt {}. Waiting {:?} before retry...",
                        label, attempt, wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("Unexpected error during {}: {:#}", label, e);
                    return Err(e);
                }
            }
        }
    }

    /// Retries only on the quota-exceeded signal.
    pub async fn retry_on_quota<T, F, Fut>(&self, label: &str, op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.retry(label, is_quota_exceeded, op).await
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), Duration::from_secs(300))
    }
}
