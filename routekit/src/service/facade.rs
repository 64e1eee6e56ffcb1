//! Route service facade implementation.

use super::config::ServiceConfig;
use crate::cache::{CacheStats, RouteCache};
use crate::coordinator::{
    CircuitState, CoalescerStats, CoordinatorStatsSnapshot, RouteCoordinator, RouteError,
};
use crate::events::{EventBus, RouteEvent};
use crate::geo::Coordinate;
use crate::prefetch::{LoadingByMode, LoadingIndicators, MultiModalPrefetcher};
use crate::provider::RouteProvider;
use crate::route::{RequestFingerprint, RoutePair, RouteRequest, RouteResult, TravelMode};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Point-in-time service counters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ServiceStats {
    pub coordinator: CoordinatorStatsSnapshot,
    pub cache: CacheStats,
    pub in_flight: CoalescerStats,
}

/// High-level facade over the routing components.
///
/// Owns the coordinator, prefetcher and loading indicators, and is the
/// only API a map view needs:
///
/// ```ignore
/// use routekit::service::RouteService;
///
/// let service = RouteService::from_config(config)?;
/// let mut events = service.subscribe();
///
/// let route = service
///     .request_route(origin, destination, TravelMode::Walking)
///     .await?;
/// ```
///
/// The other travel modes for the same pair are prefetched in the
/// background and arrive as [`RouteEvent::Resolved`] with `prefetched` set.
#[derive(Debug)]
pub struct RouteService<P> {
    coordinator: Arc<RouteCoordinator<P>>,
    prefetcher: Arc<MultiModalPrefetcher<P>>,
    loading: LoadingIndicators,
}

impl<P: RouteProvider + 'static> RouteService<P> {
    /// Wires a service around `provider`.
    pub fn new(provider: P, config: &ServiceConfig) -> Self {
        let cache = RouteCache::new(*config.cache());
        let events = EventBus::new(config.event_capacity());
        let coordinator = Arc::new(RouteCoordinator::with_parts(
            provider,
            *config.coordinator(),
            cache,
            events,
        ));
        let loading = LoadingIndicators::new();
        let prefetcher = Arc::new(MultiModalPrefetcher::new(
            Arc::clone(&coordinator),
            *config.prefetch(),
            loading.clone(),
        ));

        info!(
            provider = coordinator.provider().name(),
            prefetch = config.prefetch().enabled,
            "Route service ready"
        );

        Self {
            coordinator,
            prefetcher,
            loading,
        }
    }

    /// Resolves the route from `origin` to `destination` for `mode`.
    pub async fn request_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<RouteResult, RouteError> {
        self.request(RouteRequest::new(origin, destination, mode))
            .await
    }

    /// Resolves `request` as the user's active route.
    pub async fn request(&self, request: RouteRequest) -> Result<RouteResult, RouteError> {
        self.request_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`request`](Self::request), giving up when `cancel` fires.
    ///
    /// The request's pair becomes the active pair, which cancels a prefetch
    /// running for any other pair. On success the result is published and,
    /// the first time this pair resolves, the remaining modes are prefetched.
    pub async fn request_with_cancel(
        &self,
        request: RouteRequest,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, RouteError> {
        let fingerprint = request.fingerprint();
        self.prefetcher
            .set_active_pair(RoutePair::new(&request.origin, &request.destination));

        let loading = self.loading.begin(request.mode);
        let outcome = self.coordinator.resolve_with_cancel(&request, cancel).await;
        drop(loading);

        match &outcome {
            Ok(result) => {
                self.coordinator.events().publish(RouteEvent::Resolved {
                    fingerprint,
                    result: result.clone(),
                    prefetched: false,
                });
                // Same-point answers have nothing to prefetch; waypoint
                // routes are specific to the active mode.
                if result.error.is_none() && request.waypoints.is_empty() {
                    let _ = self.prefetcher.trigger(&request);
                }
            }
            Err(RouteError::Cancelled) => {
                debug!(fingerprint = %fingerprint, "Route request cancelled");
            }
            Err(err) => {
                warn!(fingerprint = %fingerprint, error = %err, "Route request failed");
                self.coordinator.events().publish(RouteEvent::Failed {
                    fingerprint,
                    mode: request.mode,
                    error: err.clone(),
                });
            }
        }
        outcome
    }

    /// Cancels the in-flight request for `fingerprint`.
    pub fn cancel_route(&self, fingerprint: &RequestFingerprint) -> bool {
        self.coordinator.cancel(fingerprint)
    }

    /// Lets routing resume after the breaker opened.
    pub fn reset_circuit_breaker(&self) -> bool {
        self.coordinator.reset_circuit_breaker()
    }

    pub fn is_blocked(&self) -> bool {
        self.coordinator.is_blocked()
    }

    pub fn circuit_state(&self) -> CircuitState {
        self.coordinator.circuit_state()
    }

    /// Which modes have a request outstanding right now.
    pub fn loading_by_mode(&self) -> LoadingByMode {
        self.loading.get()
    }

    /// Receiver notified whenever a mode flips between idle and loading.
    pub fn watch_loading(&self) -> watch::Receiver<LoadingByMode> {
        self.loading.watch()
    }

    /// Subscribes to route and breaker events.
    pub fn subscribe(&self) -> broadcast::Receiver<RouteEvent> {
        self.coordinator.events().subscribe()
    }

    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            coordinator: self.coordinator.stats(),
            cache: self.coordinator.cache().stats(),
            in_flight: self.coordinator.in_flight_stats(),
        }
    }

    pub fn coordinator(&self) -> &Arc<RouteCoordinator<P>> {
        &self.coordinator
    }

    pub fn prefetcher(&self) -> &Arc<MultiModalPrefetcher<P>> {
        &self.prefetcher
    }
}
