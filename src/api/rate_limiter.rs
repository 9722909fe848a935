//! Send pacing for Bot API calls.
//!
//! Telegram answers bursts of messages with `429 Too Many Requests`. The
//! limiter spaces message sends a minimum interval apart and, when a flood
//! error does come back, records its `retry_after` as a deadline that the
//! next send waits out.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Rate limiter enforcing a minimum interval between sends.
///
/// A zero interval disables pacing; penalties from flood errors still apply.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum duration between allowed sends.
    min_interval: Duration,

    /// Earliest instant the next send may go out.
    next_allowed: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a rate limiter with the specified minimum interval.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed: Mutex::new(None),
        }
    }

    /// Creates a rate limiter from seconds.
    #[must_use]
    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// Waits until a send is allowed, then claims the slot.
    ///
    /// Returns the duration waited (0 if no wait was needed). The lock is
    /// held across the sleep so concurrent senders queue up in order.
    pub async fn wait_and_acquire(&self) -> Duration {
        let mut next_allowed = self.next_allowed.lock().await;

        let wait_duration = match *next_allowed {
            Some(at) => at.saturating_duration_since(Instant::now()),
            None => Duration::ZERO,
        };

        if !wait_duration.is_zero() {
            debug!("Rate limiter: waiting {wait_duration:?} before next send");
            tokio::time::sleep(wait_duration).await;
        }

        *next_allowed = Some(Instant::now() + self.min_interval);
        wait_duration
    }

    /// Checks if a send is currently allowed without blocking.
    pub async fn is_allowed(&self) -> bool {
        let next_allowed = self.next_allowed.lock().await;
        match *next_allowed {
            Some(at) => at <= Instant::now(),
            None => true,
        }
    }

    /// Returns the time remaining until the next send is allowed.
    pub async fn time_until_allowed(&self) -> Duration {
        let next_allowed = self.next_allowed.lock().await;
        match *next_allowed {
            Some(at) => at.saturating_duration_since(Instant::now()),
            None => Duration::ZERO,
        }
    }

    /// Pushes the next send out by `delay`, keeping the later deadline when
    /// one is already pending. Called with the `retry_after` of a flood
    /// error.
    pub async fn penalize(&self, delay: Duration) {
        warn!("Rate limiter: backing off {delay:?} after flood error");
        let mut next_allowed = self.next_allowed.lock().await;
        let candidate = Instant::now() + delay;
        *next_allowed = Some(next_allowed.map_or(candidate, |at| at.max(candidate)));
    }

    /// Resets the rate limiter, allowing an immediate send.
    pub async fn reset(&self) {
        let mut next_allowed = self.next_allowed.lock().await;
        *next_allowed = None;
    }
}
