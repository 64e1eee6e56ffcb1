//! The route request coordinator.

use super::circuit_breaker::{ApiCircuitBreaker, CircuitCheck, CircuitState};
use super::coalesce::{CoalescerStats, InFlightGuard, InFlightRegistry, Registration};
use super::config::CoordinatorConfig;
use super::error::RouteError;
use super::throttle::RequestThrottle;
use crate::cache::RouteCache;
use crate::events::{EventBus, RouteEvent};
use crate::fallback;
use crate::provider::{ProviderError, RouteProvider};
use crate::route::{RequestFingerprint, RouteErrorKind, RouteRequest, RouteResult};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct CoordinatorStats {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    coalesced: AtomicU64,
    provider_calls: AtomicU64,
    fallbacks: AtomicU64,
    blocked: AtomicU64,
    cancelled: AtomicU64,
    denied: AtomicU64,
}

impl CoordinatorStats {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CoordinatorStatsSnapshot {
        CoordinatorStatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            blocked: self.blocked.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time coordinator counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinatorStatsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    /// Resolves that waited on another caller's request
    pub coalesced: u64,
    pub provider_calls: u64,
    /// Provider failures answered with a straight-line route
    pub fallbacks: u64,
    /// Resolves refused by the open breaker
    pub blocked: u64,
    pub cancelled: u64,
    /// Provider calls that tripped the breaker
    pub denied: u64,
}

/// Owns the cache, in-flight set, breaker and throttle, and turns route
/// requests into results.
///
/// Resolution order for one request:
///
/// 1. Refuse if the breaker is open.
/// 2. Reject invalid coordinates; answer same-point requests directly.
/// 3. Return a fresh cache entry.
/// 4. Join an in-flight request for the same fingerprint.
/// 5. Wait for a throttle slot.
/// 6. Call the provider; cache success, open the breaker on access errors,
///    cache a fallback for anything else.
///
/// Shared across tasks behind an `Arc`.
#[derive(Debug)]
pub struct RouteCoordinator<P> {
    provider: P,
    cache: RouteCache,
    in_flight: InFlightRegistry,
    breaker: ApiCircuitBreaker,
    throttle: RequestThrottle,
    events: EventBus,
    stats: CoordinatorStats,
}

impl<P: RouteProvider> RouteCoordinator<P> {
    /// Creates a coordinator with a default cache and its own event bus.
    pub fn new(provider: P, config: CoordinatorConfig) -> Self {
        Self::with_parts(provider, config, RouteCache::default(), EventBus::default())
    }

    /// Creates a coordinator around an existing cache and event bus.
    pub fn with_parts(
        provider: P,
        config: CoordinatorConfig,
        cache: RouteCache,
        events: EventBus,
    ) -> Self {
        Self {
            provider,
            cache,
            in_flight: InFlightRegistry::new(),
            breaker: ApiCircuitBreaker::new(config.circuit_auto_reset_after),
            throttle: RequestThrottle::new(config.min_request_interval),
            events,
            stats: CoordinatorStats::default(),
        }
    }

    /// Resolves `request`; dropping the future cancels it.
    pub async fn resolve(&self, request: &RouteRequest) -> Result<RouteResult, RouteError> {
        self.resolve_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Resolves `request`, giving up when `cancel` fires.
    pub async fn resolve_with_cancel(
        &self,
        request: &RouteRequest,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, RouteError> {
        CoordinatorStats::bump(&self.stats.requests);
        self.ensure_available()?;
        request.validate()?;

        if request.is_same_point() {
            return Ok(RouteResult::same_point(request.mode));
        }

        let fingerprint = request.fingerprint();
        loop {
            if let Some(cached) = self.cache.get(&fingerprint) {
                CoordinatorStats::bump(&self.stats.cache_hits);
                debug!(fingerprint = %fingerprint, "Route served from cache");
                return Ok(cached);
            }

            let mut receiver = match self.in_flight.register(fingerprint) {
                Registration::Leader(guard) => {
                    return self.lead(request, guard, cancel).await;
                }
                Registration::Follower(receiver) => receiver,
            };

            CoordinatorStats::bump(&self.stats.coalesced);
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    CoordinatorStats::bump(&self.stats.cancelled);
                    return Err(RouteError::Cancelled);
                }
                outcome = receiver.recv() => outcome,
            };

            match outcome {
                Ok(outcome) => return outcome,
                Err(_) => {
                    debug!(fingerprint = %fingerprint, "Leader abandoned request, retrying");
                    self.ensure_available()?;
                }
            }
        }
    }

    async fn lead(
        &self,
        request: &RouteRequest,
        guard: InFlightGuard<'_>,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, RouteError> {
        let fingerprint = guard.fingerprint();

        // A leader that finished between our cache miss and registration
        // has already stored its result.
        if let Some(cached) = self.cache.get(&fingerprint) {
            CoordinatorStats::bump(&self.stats.cache_hits);
            guard.complete(Ok(cached.clone()));
            return Ok(cached);
        }

        let token = guard.token().clone();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return self.abandon(guard),
            _ = token.cancelled() => return self.cancelled(guard),
            _ = self.throttle.acquire() => {}
        }

        // The breaker may have opened while we were throttled.
        if let Err(err) = self.ensure_available() {
            guard.complete(Err(err.clone()));
            return Err(err);
        }

        CoordinatorStats::bump(&self.stats.provider_calls);
        debug!(
            fingerprint = %fingerprint,
            provider = self.provider.name(),
            "Fetching route from provider"
        );
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return self.abandon(guard),
            fetched = self.provider.fetch(request, &token) => fetched,
        };

        match fetched {
            Ok(result) => {
                if result.error.is_none() {
                    self.cache.put(fingerprint, result.clone());
                }
                guard.complete(Ok(result.clone()));
                Ok(result)
            }
            Err(ProviderError::Cancelled) => {
                if token.is_cancelled() {
                    self.cancelled(guard)
                } else {
                    self.abandon(guard)
                }
            }
            Err(err) if err.trips_circuit_breaker() => {
                CoordinatorStats::bump(&self.stats.denied);
                let kind = err.kind().unwrap_or(RouteErrorKind::ApiAccessDenied);
                let message = err.to_string();
                self.open_circuit(&message);
                let error = RouteError::AccessDenied { kind, message };
                guard.complete(Err(error.clone()));
                Err(error)
            }
            Err(err) => {
                CoordinatorStats::bump(&self.stats.fallbacks);
                warn!(
                    fingerprint = %fingerprint,
                    error = %err,
                    "Provider failed, using straight-line fallback"
                );
                let result = fallback::synthesize(request);
                self.cache.put(fingerprint, result.clone());
                guard.complete(Ok(result.clone()));
                Ok(result)
            }
        }
    }

    /// Our caller gave up; followers will retry on their own.
    fn abandon(&self, guard: InFlightGuard<'_>) -> Result<RouteResult, RouteError> {
        CoordinatorStats::bump(&self.stats.cancelled);
        drop(guard);
        Err(RouteError::Cancelled)
    }

    /// The fingerprint was cancelled for everyone.
    fn cancelled(&self, guard: InFlightGuard<'_>) -> Result<RouteResult, RouteError> {
        CoordinatorStats::bump(&self.stats.cancelled);
        debug!(fingerprint = %guard.fingerprint(), "Route request cancelled");
        guard.complete(Err(RouteError::Cancelled));
        Err(RouteError::Cancelled)
    }

    fn check_breaker(&self) -> CircuitCheck {
        let check = self.breaker.check();
        if check == CircuitCheck::AutoReset {
            self.events.publish(RouteEvent::CircuitReset);
        }
        check
    }

    fn ensure_available(&self) -> Result<(), RouteError> {
        match self.check_breaker() {
            CircuitCheck::Closed | CircuitCheck::AutoReset => Ok(()),
            CircuitCheck::Open { reason } => {
                CoordinatorStats::bump(&self.stats.blocked);
                Err(RouteError::ServiceBlocked { reason })
            }
        }
    }

    fn open_circuit(&self, reason: &str) {
        if self.breaker.trip(reason) {
            self.events.publish(RouteEvent::CircuitOpened {
                reason: reason.to_string(),
            });
        }
    }

    /// Cancels the in-flight request for `fingerprint`, if any.
    ///
    /// The leader and every follower receive [`RouteError::Cancelled`];
    /// nothing is cached.
    pub fn cancel(&self, fingerprint: &RequestFingerprint) -> bool {
        self.in_flight.cancel(fingerprint)
    }

    /// Closes the breaker. Returns `true` if it was open.
    pub fn reset_circuit_breaker(&self) -> bool {
        let was_open = self.breaker.reset();
        if was_open {
            info!("Routing resumed after manual reset");
            self.events.publish(RouteEvent::CircuitReset);
        }
        was_open
    }

    /// True while the breaker refuses requests.
    pub fn is_blocked(&self) -> bool {
        matches!(self.check_breaker(), CircuitCheck::Open { .. })
    }

    /// Breaker state snapshot.
    pub fn circuit_state(&self) -> CircuitState {
        self.breaker.state()
    }

    pub fn is_in_flight(&self, fingerprint: &RequestFingerprint) -> bool {
        self.in_flight.contains(fingerprint)
    }

    /// True if a fresh, non-errored result is cached.
    pub fn has_cached(&self, fingerprint: &RequestFingerprint) -> bool {
        self.cache.contains_usable(fingerprint)
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn stats(&self) -> CoordinatorStatsSnapshot {
        self.stats.snapshot()
    }

    /// Single-flight counters.
    pub fn in_flight_stats(&self) -> CoalescerStats {
        self.in_flight.stats()
    }
}
