//! Retry policy for directions requests.

use std::time::Duration;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default fixed pause between attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Service Unavailable.
const HTTP_SERVICE_UNAVAILABLE: u16 = 503;

/// When and how often a failed attempt is repeated.
///
/// Only responses whose status is listed in `retry_statuses` are retried.
/// Timeouts, transport errors and every other status end the fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
            retry_statuses: vec![HTTP_SERVICE_UNAVAILABLE],
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Total attempts including the first.
    #[inline]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Whether attempt number `attempt` (1-based) that ended with `status`
    /// should be followed by another.
    pub fn should_retry(&self, status: u16, attempt: u32) -> bool {
        attempt < self.max_attempts() && self.retry_statuses.contains(&status)
    }
}
