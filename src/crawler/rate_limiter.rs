//! Minimum spacing between outbound requests
//!
//! The wiki is fetched sequentially by a single task. Every request, retries
//! included, waits its turn here first.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Enforces a minimum interval between permitted requests
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    /// When the last request was permitted
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Mutex::new(None),
        }
    }

    /// Waits until at least `interval` has passed since the last permitted request
    ///
    /// # Returns
    ///
    /// The instant this request was permitted
    pub async fn wait_turn(&self) -> Instant {
        let mut last = self.last_request.lock().await;

        if let Some(wait) = Self::time_until_next(*last, self.interval, Instant::now()) {
            tracing::trace!("Rate limit: waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }

        let now = Instant::now();
        *last = Some(now);
        now
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    fn time_until_next(last: Option<Instant>, interval: Duration, now: Instant) -> Option<Duration> {
        let elapsed = now.duration_since(last?);
        (elapsed < interval).then(|| interval - elapsed)
    }
}
