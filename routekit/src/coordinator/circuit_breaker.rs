//! Process-wide circuit breaker for the directions provider.
//!
//! # State Machine
//!
//! ```text
//! Closed --[access denied / key missing]--> Open
//! Open --[reset()]--> Closed
//! Open --[auto_reset_after elapsed, if configured]--> Closed
//! ```
//!
//! While open every resolve is refused without touching the cache, the
//! in-flight set or the network. Unlike a load-shedding breaker there is no
//! half-open probe: a denied key stays denied until someone fixes it.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

/// Circuit breaker state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitState {
    /// Requests flow normally.
    Closed,
    /// Requests are refused.
    Open { reason: String, since: Instant },
}

impl CircuitState {
    /// True for [`CircuitState::Open`].
    pub fn is_open(&self) -> bool {
        matches!(self, CircuitState::Open { .. })
    }

    /// User-friendly display string.
    pub fn display_status(&self) -> &'static str {
        match self {
            CircuitState::Closed => "Available",
            CircuitState::Open { .. } => "Suspended",
        }
    }
}

/// Outcome of [`ApiCircuitBreaker::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitCheck {
    /// Closed, go ahead.
    Closed,
    /// Was open, cooldown elapsed, now closed.
    AutoReset,
    /// Open, refuse.
    Open { reason: String },
}

/// Latching breaker shared by every resolve.
#[derive(Debug)]
pub struct ApiCircuitBreaker {
    auto_reset_after: Option<Duration>,
    state: Mutex<CircuitState>,
}

impl Default for ApiCircuitBreaker {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ApiCircuitBreaker {
    /// Creates a closed breaker.
    ///
    /// With `auto_reset_after` set, an open breaker closes itself on the
    /// first check after the cooldown.
    pub fn new(auto_reset_after: Option<Duration>) -> Self {
        Self {
            auto_reset_after,
            state: Mutex::new(CircuitState::Closed),
        }
    }

    /// Opens the breaker. Returns `true` if it was closed.
    pub fn trip(&self, reason: impl Into<String>) -> bool {
        let mut state = self.state.lock();
        if state.is_open() {
            return false;
        }
        let reason = reason.into();
        info!(reason = %reason, "Routing circuit breaker opened");
        *state = CircuitState::Open {
            reason,
            since: Instant::now(),
        };
        true
    }

    /// Closes the breaker. Returns `true` if it was open.
    pub fn reset(&self) -> bool {
        let mut state = self.state.lock();
        if !state.is_open() {
            return false;
        }
        *state = CircuitState::Closed;
        info!("Routing circuit breaker reset");
        true
    }

    /// Current state, applying any due auto-reset.
    pub fn check(&self) -> CircuitCheck {
        let mut state = self.state.lock();
        let (expired, reason) = match &*state {
            CircuitState::Closed => return CircuitCheck::Closed,
            CircuitState::Open { reason, since } => (
                self.auto_reset_after
                    .is_some_and(|cooldown| since.elapsed() >= cooldown),
                reason.clone(),
            ),
        };

        if expired {
            info!("Routing circuit breaker cooldown elapsed, closing");
            *state = CircuitState::Closed;
            CircuitCheck::AutoReset
        } else {
            CircuitCheck::Open { reason }
        }
    }

    /// True if requests are currently refused.
    pub fn is_open(&self) -> bool {
        matches!(self.check(), CircuitCheck::Open { .. })
    }

    /// Snapshot of the state, without applying auto-reset.
    pub fn state(&self) -> CircuitState {
        self.state.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_closed() {
        let breaker = ApiCircuitBreaker::default();
        assert!(!breaker.is_open());
        assert_eq!(breaker.check(), CircuitCheck::Closed);
        assert_eq!(breaker.state().display_status(), "Available");
    }

    #[tokio::test]
    async fn test_trip_latches_until_reset() {
        let breaker = ApiCircuitBreaker::default();
        assert!(breaker.trip("HTTP 403"));
        assert!(!breaker.trip("again"));
        assert!(breaker.is_open());
        assert_eq!(
            breaker.check(),
            CircuitCheck::Open {
                reason: "HTTP 403".into()
            }
        );

        assert!(breaker.reset());
        assert!(!breaker.reset());
        assert!(!breaker.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stays_open_without_auto_reset() {
        let breaker = ApiCircuitBreaker::new(None);
        breaker.trip("denied");
        tokio::time::advance(Duration::from_secs(24 * 3600)).await;
        assert!(breaker.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_reset_after_cooldown() {
        let breaker = ApiCircuitBreaker::new(Some(Duration::from_secs(60)));
        breaker.trip("denied");

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(breaker.is_open());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(breaker.check(), CircuitCheck::AutoReset);
        assert_eq!(breaker.check(), CircuitCheck::Closed);
    }
}
