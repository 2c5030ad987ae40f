//! Token-bucket limiter guarding waitlist signups.

use std::convert::TryFrom;
use std::time::{Duration, Instant};

/// Bucket size and refill period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests admitted back to back.
    pub burst: u32,
    /// Time to refill the whole bucket.
    pub replenish_period: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            burst: 5,
            replenish_period: Duration::from_secs(60),
        }
    }
}

/// Result of asking the limiter for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Whether the request may proceed.
    pub allowed: bool,
    /// Whole tokens left after this request.
    pub remaining: u32,
    /// Wait before the next token is available; zero when allowed.
    pub retry_after: Duration,
}

/// Token bucket with fixed-point accounting.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimit,
    tokens: u128,
    last_refill: Instant,
}

impl RateLimiter {
    const TOKEN_SCALE: u128 = 1_000_000;

    /// Full bucket as of `now`.
    #[must_use]
    pub fn new(config: RateLimit, now: Instant) -> Self {
        Self {
            config,
            tokens: Self::capacity_for(config),
            last_refill: now,
        }
    }

    fn capacity_for(config: RateLimit) -> u128 {
        u128::from(config.burst) * Self::TOKEN_SCALE
    }

    fn capacity(&self) -> u128 {
        Self::capacity_for(self.config)
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        if elapsed == Duration::ZERO {
            return;
        }

        let period_micros = self.config.replenish_period.as_micros();
        let capacity = self.capacity();
        if period_micros == 0 || capacity == 0 {
            self.tokens = capacity;
            self.last_refill = now;
            return;
        }

        if let Some(amount) = capacity
            .saturating_mul(elapsed.as_micros())
            .checked_div(period_micros)
            && amount > 0
        {
            self.tokens = (self.tokens + amount).min(capacity);
            self.last_refill = now;
        }
    }

    /// Take one token if available.
    pub fn check(&mut self, now: Instant) -> RateLimitStatus {
        self.refill(now);

        if self.tokens >= Self::TOKEN_SCALE {
            self.tokens -= Self::TOKEN_SCALE;
            RateLimitStatus {
                allowed: true,
                remaining: self.remaining_tokens(),
                retry_after: Duration::ZERO,
            }
        } else {
            RateLimitStatus {
                allowed: false,
                remaining: 0,
                retry_after: self.retry_delay(),
            }
        }
    }

    fn remaining_tokens(&self) -> u32 {
        u32::try_from(self.tokens / Self::TOKEN_SCALE).unwrap_or(u32::MAX)
    }

    fn retry_delay(&self) -> Duration {
        let capacity = self.capacity();
        if capacity == 0 {
            return Duration::MAX;
        }

        let period_micros = self.config.replenish_period.as_micros();
        if period_micros == 0 {
            return Duration::ZERO;
        }

        let deficit = Self::TOKEN_SCALE.saturating_sub(self.tokens);
        let retry_micros = deficit.saturating_mul(period_micros).div_ceil(capacity);
        Duration::from_micros(u64::try_from(retry_micros).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: RateLimit = RateLimit {
        burst: 2,
        replenish_period: Duration::from_secs(10),
    };

    #[test]
    fn burst_is_admitted_then_throttled() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(LIMIT, start);

        let first = limiter.check(start);
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);
        assert!(limiter.check(start).allowed);

        let denied = limiter.check(start);
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after, Duration::from_secs(5));
    }

    #[test]
    fn tokens_refill_over_time_up_to_capacity() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(LIMIT, start);
        limiter.check(start);
        limiter.check(start);

        let later = start + Duration::from_secs(5);
        assert!(limiter.check(later).allowed);
        assert!(!limiter.check(later).allowed);

        let much_later = later + Duration::from_secs(600);
        assert_eq!(limiter.check(much_later).remaining, 1);
    }

    #[test]
    fn zero_burst_never_admits() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(
            RateLimit {
                burst: 0,
                ..LIMIT
            },
            start,
        );
        let status = limiter.check(start);
        assert!(!status.allowed);
        assert_eq!(status.retry_after, Duration::MAX);
    }
}
