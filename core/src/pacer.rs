//! Global request pacing

use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, state::NotKeyed, Quota, RateLimiter};

/// Token bucket emitting one permit per interval
///
/// The bucket holds at most one token, so workers sharing a pacer via `Arc`
/// observe evenly spaced permits at the configured rate with no burst beyond
/// a single request. A rate of 0 disables pacing entirely.
pub struct RatePacer {
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    rate: u32,
}

impl RatePacer {
    /// Create a pacer for `rate` requests per second
    ///
    /// The permit interval is `1s / rate`, clamped to at least one
    /// millisecond.
    pub fn new(rate: u32) -> Self {
        let limiter = if rate == 0 {
            None
        } else {
            let interval =
                Duration::from_secs_f64(1.0 / f64::from(rate)).max(Duration::from_millis(1));
            Quota::with_period(interval).map(RateLimiter::direct)
        };

        Self { limiter, rate }
    }

    /// Wait until the next permit is available
    ///
    /// Returns immediately when pacing is disabled.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Take a permit without waiting, if one is available
    pub fn try_acquire(&self) -> bool {
        match &self.limiter {
            Some(limiter) => limiter.check().is_ok(),
            None => true,
        }
    }

    /// Whether pacing is active
    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Configured rate in requests per second
    pub fn rate(&self) -> u32 {
        self.rate
    }
}

impl std::fmt::Debug for RatePacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatePacer")
            .field("rate", &self.rate)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_pacer_disabled_at_zero() {
        let pacer = RatePacer::new(0);
        assert!(!pacer.is_enabled());
        assert!(pacer.try_acquire());
        assert_eq!(pacer.rate(), 0);
    }

    #[test]
    fn test_pacer_enabled() {
        let pacer = RatePacer::new(50);
        assert!(pacer.is_enabled());
        assert_eq!(pacer.rate(), 50);
    }

    #[test]
    fn test_pacer_high_rate_clamped() {
        // 5000 rps implies a 200 microsecond interval, clamped to 1 ms.
        let pacer = RatePacer::new(5000);
        assert!(pacer.is_enabled());
    }

    #[test]
    fn test_first_permit_immediate() {
        let pacer = RatePacer::new(1);
        assert!(pacer.try_acquire());
        // Bucket capacity is one, so a second permit is not yet due.
        assert!(!pacer.try_acquire());
    }

    #[tokio::test]
    async fn test_wait_disabled_returns_immediately() {
        let pacer = RatePacer::new(0);
        let start = Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_wait_spaces_permits() {
        let pacer = RatePacer::new(20);
        let start = Instant::now();
        for _ in 0..5 {
            pacer.wait().await;
        }
        // Four 50 ms intervals after the immediate first permit.
        assert!(start.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn test_pacer_debug() {
        let debug = format!("{:?}", RatePacer::new(10));
        assert!(debug.contains("RatePacer"));
        assert!(debug.contains("10"));
    }
}
