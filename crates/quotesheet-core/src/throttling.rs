use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Spaces upstream quote calls to a calls-per-minute quota.
///
/// The first `calls` requests pass immediately; later ones are released one per
/// `60s / calls`.
#[derive(Clone)]
pub struct RequestPacer {
    limiter: Arc<DirectRateLimiter>,
    clock: DefaultClock,
}

impl RequestPacer {
    /// Returns `None` when `calls` is zero, which disables pacing.
    pub fn per_minute(calls: u32) -> Option<Self> {
        let calls = NonZeroU32::new(calls)?;
        Some(Self {
            limiter: Arc::new(RateLimiter::direct(Quota::per_minute(calls))),
            clock: DefaultClock::default(),
        })
    }

    /// Waits until the quota admits one more call.
    pub async fn wait(&self) {
        if let Err(delay) = self.try_acquire() {
            tracing::debug!(
                wait_ms = delay.as_millis() as u64,
                "pacing quote request for rate limit"
            );
            self.limiter.until_ready().await;
        }
    }

    /// Non-blocking variant: `Err` carries the time until the next slot opens.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        self.limiter
            .check()
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_disables_pacing() {
        assert!(RequestPacer::per_minute(0).is_none());
    }

    #[test]
    fn burst_matches_quota_then_defers() {
        let pacer = RequestPacer::per_minute(2).expect("non-zero rate");

        assert!(pacer.try_acquire().is_ok());
        assert!(pacer.try_acquire().is_ok());

        let delay = pacer.try_acquire().expect_err("third call should wait");
        assert!(delay > Duration::ZERO);
        assert!(delay <= Duration::from_secs(30));
    }
}
