//! Bounded retries with a configured delay schedule

use crate::config::RetryConfig;
use crate::{Result, TrackerError};
use std::future::Future;
use std::time::Duration;

/// Retry behaviour for a fallible async operation
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | Success | Returned immediately |
/// | Transport error, timeout, non-2xx | Sleep, then retry |
/// | Any other error | Returned immediately |
/// | `max_retries + 1` failed attempts | `RetryExhausted` wrapping the last error |
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    delays: Vec<Duration>,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delays: Vec<Duration>) -> Self {
        Self { max_retries, delays }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            config
                .delays_ms
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect(),
        )
    }

    /// Delay before retry number `attempt` (zero-based)
    ///
    /// Attempts past the end of the schedule reuse its last entry.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        self.delays
            .get(attempt)
            .or_else(|| self.delays.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }

    /// Runs `operation` until it succeeds, fails permanently, or runs out of attempts
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 0;

        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };

            attempt += 1;
            if attempt > self.max_retries {
                return Err(TrackerError::RetryExhausted {
                    attempts: attempt,
                    source: Box::new(error),
                });
            }

            let delay = self.delay_for(attempt as usize - 1);
            tracing::warn!(
                "Attempt {}/{} failed: {}. Retrying in {:?}",
                attempt,
                self.max_retries + 1,
                error,
                delay
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
