//! Request coordination: cache, single-flight, throttle and circuit breaker.
//!
//! # Per-fingerprint lifecycle
//!
//! ```text
//! IDLE ──► CACHED                       (fresh cache hit)
//!   │
//!   └──► THROTTLED ──► IN_FLIGHT ──► RESOLVED (provider result)
//!                          │
//!                          └──────► RESOLVED (straight-line fallback)
//! ```
//!
//! Access errors from the provider open a process-wide breaker; every
//! later resolve is refused until [`RouteCoordinator::reset_circuit_breaker`].

mod circuit_breaker;
mod coalesce;
mod config;
mod error;
mod resolver;
mod throttle;

pub use circuit_breaker::{ApiCircuitBreaker, CircuitCheck, CircuitState};
pub use coalesce::{
    CoalescerStats, InFlightGuard, InFlightRegistry, Registration, ResolveOutcome,
};
pub use config::CoordinatorConfig;
pub use error::RouteError;
pub use resolver::{CoordinatorStatsSnapshot, RouteCoordinator};
pub use throttle::{RequestThrottle, DEFAULT_MIN_REQUEST_INTERVAL};
