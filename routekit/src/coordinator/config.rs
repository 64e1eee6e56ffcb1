//! Coordinator configuration.

use super::throttle::DEFAULT_MIN_REQUEST_INTERVAL;
use std::time::Duration;

/// Settings for [`RouteCoordinator`](super::RouteCoordinator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Minimum spacing between provider requests of any fingerprint
    pub min_request_interval: Duration,
    /// Close an open breaker automatically after this long; `None` keeps it
    /// open until reset
    pub circuit_auto_reset_after: Option<Duration>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
            circuit_auto_reset_after: None,
        }
    }
}

impl CoordinatorConfig {
    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    pub fn with_circuit_auto_reset(mut self, after: Option<Duration>) -> Self {
        self.circuit_auto_reset_after = after;
        self
    }
}
