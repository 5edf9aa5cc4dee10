//! Per-client request pacing
//!
//! This module enforces a minimum interval between requests for each client
//! key using the governor crate's keyed rate limiters. A quota with a period
//! equal to the minimum interval and a burst of one token gives exactly the
//! "at most one request per interval per key" behavior.

use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DashMapStateStore;
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use nonzero_ext::nonzero;
use std::time::Duration;
use thiserror::Error as ThisError;

/// Default minimum interval between requests per client key
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Number of tracked client keys above which stale entries are pruned
pub const DEFAULT_MAX_TRACKED_KEYS: usize = 1024;

/// Error returned when a client key requests faster than the minimum interval
#[derive(Debug, Clone, ThisError)]
#[error("rate limit exceeded for '{client_key}', retry after {}ms", retry_after.as_millis())]
pub struct RateLimitError {
    /// The client key that exceeded its limit
    pub client_key: String,
    /// How long the client must wait before the next request is allowed
    pub retry_after: Duration,
}

/// Trait for rate limiting functionality
///
/// This trait allows for dependency injection of rate limiting behavior,
/// enabling easier testing with mock implementations.
pub trait RateLimitChecker: Send + Sync {
    /// Check if a request is allowed for a client key
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the request is allowed
    /// * `Err(RateLimitError)` with a retry-after duration if it came too soon
    fn check_rate_limit(&self, client_key: &str) -> Result<(), RateLimitError>;
}

/// Rate limiter enforcing a minimum interval between requests per client key
pub struct MinIntervalLimiter {
    limiter: GovernorRateLimiter<String, DashMapStateStore<String>, DefaultClock>,
    clock: DefaultClock,
    max_tracked_keys: usize,
}

impl std::fmt::Debug for MinIntervalLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinIntervalLimiter")
            .field("tracked_keys", &self.limiter.len())
            .field("max_tracked_keys", &self.max_tracked_keys)
            .finish()
    }
}

impl MinIntervalLimiter {
    /// Create a limiter with the default one-second interval
    pub fn new() -> Self {
        Self::with_min_interval(DEFAULT_MIN_INTERVAL)
    }

    /// Create a limiter with a custom minimum interval
    ///
    /// # Panics
    ///
    /// Panics if `min_interval` is zero; use [`MockRateLimiter`] to disable
    /// rate limiting in tests instead.
    pub fn with_min_interval(min_interval: Duration) -> Self {
        let quota = Quota::with_period(min_interval)
            .expect("minimum interval must be non-zero")
            .allow_burst(nonzero!(1u32));
        let clock = DefaultClock::default();
        let limiter = GovernorRateLimiter::new(quota, DashMapStateStore::default(), clock.clone());

        Self {
            limiter,
            clock,
            max_tracked_keys: DEFAULT_MAX_TRACKED_KEYS,
        }
    }

    /// Number of client keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.limiter.len()
    }
}

impl Default for MinIntervalLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitChecker for MinIntervalLimiter {
    fn check_rate_limit(&self, client_key: &str) -> Result<(), RateLimitError> {
        // Drop idle keys once the map grows past the cap so long-running
        // servers do not accumulate state for one-off clients.
        if self.limiter.len() > self.max_tracked_keys {
            self.limiter.retain_recent();
        }

        match self.limiter.check_key(&client_key.to_string()) {
            Ok(()) => Ok(()),
            Err(not_until) => Err(RateLimitError {
                client_key: client_key.to_string(),
                retry_after: not_until.wait_time_from(self.clock.now()),
            }),
        }
    }
}

/// Mock rate limiter for testing
///
/// Allows every request by default; construct with [`MockRateLimiter::denying`]
/// to simulate an exhausted limit.
#[derive(Debug, Default)]
pub struct MockRateLimiter {
    retry_after: Option<Duration>,
}

impl MockRateLimiter {
    /// Create a mock that allows every request
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that denies every request with the given retry-after
    pub fn denying(retry_after: Duration) -> Self {
        Self {
            retry_after: Some(retry_after),
        }
    }
}

impl RateLimitChecker for MockRateLimiter {
    fn check_rate_limit(&self, client_key: &str) -> Result<(), RateLimitError> {
        match self.retry_after {
            None => Ok(()),
            Some(retry_after) => Err(RateLimitError {
                client_key: client_key.to_string(),
                retry_after,
            }),
        }
    }
}
