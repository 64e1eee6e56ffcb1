//! Background resolution of the non-active travel modes.

use super::config::PrefetchConfig;
use super::loading::{LoadingGuard, LoadingIndicators};
use crate::coordinator::{RouteCoordinator, RouteError};
use crate::events::RouteEvent;
use crate::geo::Coordinate;
use crate::provider::RouteProvider;
use crate::route::{RoutePair, RouteRequest, TravelMode};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// What one prefetch run did with each remaining mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefetchReport {
    pub pair: RoutePair,
    /// Already had a fresh cached result; never scheduled
    pub already_cached: Vec<TravelMode>,
    pub resolved: Vec<TravelMode>,
    /// Dropped at re-validation
    pub skipped: Vec<TravelMode>,
    pub failed: Vec<TravelMode>,
    /// The run stopped early
    pub cancelled: bool,
}

impl PrefetchReport {
    fn new(pair: RoutePair) -> Self {
        Self {
            pair,
            already_cached: Vec::new(),
            resolved: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            cancelled: false,
        }
    }
}

#[derive(Debug, Default)]
struct PrefetchState {
    active_pair: Option<RoutePair>,
    triggered: HashSet<RoutePair>,
    run: Option<CancellationToken>,
}

/// Fills in the other travel modes once the active one has resolved.
///
/// Each (origin, destination) pair is prefetched at most once while any of
/// its routes is still cached. Modes are
/// resolved one after another, the n-th one `n * stagger` after the trigger,
/// so at most one prefetch request is outstanding at any time.
#[derive(Debug)]
pub struct MultiModalPrefetcher<P> {
    coordinator: Arc<RouteCoordinator<P>>,
    config: PrefetchConfig,
    loading: LoadingIndicators,
    state: Mutex<PrefetchState>,
}

impl<P: RouteProvider + 'static> MultiModalPrefetcher<P> {
    pub fn new(
        coordinator: Arc<RouteCoordinator<P>>,
        config: PrefetchConfig,
        loading: LoadingIndicators,
    ) -> Self {
        Self {
            coordinator,
            config,
            loading,
            state: Mutex::new(PrefetchState::default()),
        }
    }

    /// Records the pair the user is looking at.
    ///
    /// Switching to a different pair cancels the running prefetch.
    pub fn set_active_pair(&self, pair: RoutePair) {
        let mut state = self.state.lock();
        if state.active_pair == Some(pair) {
            return;
        }
        if let Some(run) = state.run.take() {
            debug!(pair = %pair, "Active pair changed, cancelling prefetch");
            run.cancel();
        }
        state.active_pair = Some(pair);
    }

    pub fn active_pair(&self) -> Option<RoutePair> {
        self.state.lock().active_pair
    }

    /// True once `pair` has been handed to a prefetch run.
    pub fn was_triggered(&self, pair: &RoutePair) -> bool {
        self.state.lock().triggered.contains(pair)
    }

    /// Starts prefetching the modes other than `request.mode`.
    ///
    /// Returns `None` when prefetch is disabled or this pair already ran and
    /// still has cached routes.
    pub fn trigger(self: &Arc<Self>, request: &RouteRequest) -> Option<JoinHandle<PrefetchReport>> {
        if !self.config.enabled {
            return None;
        }

        let pair = RoutePair::new(&request.origin, &request.destination);
        self.set_active_pair(pair);

        let cancel = {
            let mut state = self.state.lock();
            self.forget_stale_pairs(&mut state, pair);
            if !state.triggered.insert(pair) {
                return None;
            }
            let cancel = CancellationToken::new();
            state.run = Some(cancel.clone());
            cancel
        };

        info!(pair = %pair, active_mode = %request.mode, "Prefetching remaining travel modes");
        let this = Arc::clone(self);
        let (origin, destination, mode) = (request.origin, request.destination, request.mode);
        Some(tokio::spawn(async move {
            this.prefetch_remaining(origin, destination, mode, &cancel)
                .await
        }))
    }

    /// Cancels the running prefetch, if any.
    pub fn cancel(&self) -> bool {
        match self.state.lock().run.take() {
            Some(run) => {
                run.cancel();
                true
            }
            None => false,
        }
    }

    /// Resolves every mode except `exclude` that has no fresh cached route.
    pub async fn prefetch_remaining(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        exclude: TravelMode,
        cancel: &CancellationToken,
    ) -> PrefetchReport {
        let pair = RoutePair::new(&origin, &destination);
        let mut report = PrefetchReport::new(pair);

        let mut pending = Vec::new();
        for mode in TravelMode::others(exclude) {
            if self.coordinator.has_cached(&pair.fingerprint(mode)) {
                report.already_cached.push(mode);
            } else {
                pending.push(mode);
            }
        }
        let mut loading: Vec<Option<LoadingGuard>> = pending
            .iter()
            .map(|mode| Some(self.loading.begin(*mode)))
            .collect();

        let start = Instant::now();
        for (index, mode) in pending.iter().copied().enumerate() {
            let due = start + self.config.stagger * index as u32;
            let proceed = tokio::select! {
                biased;
                _ = cancel.cancelled() => false,
                _ = tokio::time::sleep_until(due) => true,
            };
            if !proceed {
                report.cancelled = true;
                break;
            }

            let fingerprint = pair.fingerprint(mode);
            if !self.still_wanted(pair, mode) {
                debug!(fingerprint = %fingerprint, "Prefetch skipped");
                loading[index] = None;
                report.skipped.push(mode);
                continue;
            }

            let request = RouteRequest::new(origin, destination, mode);
            let outcome = self.coordinator.resolve_with_cancel(&request, cancel).await;
            loading[index] = None;
            match outcome {
                Ok(result) => {
                    self.coordinator.events().publish(RouteEvent::Resolved {
                        fingerprint,
                        result,
                        prefetched: true,
                    });
                    report.resolved.push(mode);
                }
                Err(RouteError::Cancelled) => {
                    report.cancelled = true;
                    break;
                }
                Err(err) => {
                    debug!(fingerprint = %fingerprint, error = %err, "Prefetch failed");
                    report.failed.push(mode);
                }
            }
        }
        drop(loading);

        debug!(
            pair = %pair,
            resolved = report.resolved.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            cancelled = report.cancelled,
            "Prefetch run finished"
        );
        report
    }

    /// Drops triggered pairs with no fresh cached mode left, so a pair whose
    /// routes expired is prefetched again and the set stays bounded by the
    /// cache.
    fn forget_stale_pairs(&self, state: &mut PrefetchState, keep: RoutePair) {
        let purged = self.coordinator.cache().purge_expired();
        let before = state.triggered.len();
        state.triggered.retain(|pair| {
            *pair == keep
                || TravelMode::ALL
                    .into_iter()
                    .any(|mode| self.coordinator.has_cached(&pair.fingerprint(mode)))
        });
        let forgotten = before - state.triggered.len();
        if purged > 0 || forgotten > 0 {
            debug!(purged, forgotten, "Pruned stale prefetch state");
        }
    }

    /// Re-validation before each prefetch request.
    fn still_wanted(&self, pair: RoutePair, mode: TravelMode) -> bool {
        let fingerprint = pair.fingerprint(mode);
        self.active_pair() == Some(pair)
            && !self.coordinator.is_blocked()
            && !self.coordinator.is_in_flight(&fingerprint)
            && !self.coordinator.has_cached(&fingerprint)
    }

    pub fn loading(&self) -> &LoadingIndicators {
        &self.loading
    }

    pub fn config(&self) -> &PrefetchConfig {
        &self.config
    }
}
