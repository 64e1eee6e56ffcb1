//! Integration tests for route resolution through the real directions client.
//!
//! These tests drive `RouteCoordinator` over `DirectionsClient` with a
//! scripted HTTP transport and verify:
//! - Request coalescing (concurrent identical requests → one HTTP call)
//! - Retry on 503 and the straight-line fallback
//! - The circuit breaker blocking every mode until reset
//! - Cache capacity and TTL
//!
//! Run with: `cargo test --test resolution_integration`

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::join_all;
use serde_json::json;

use routekit::cache::{CacheConfig, RouteCache};
use routekit::coordinator::{CoordinatorConfig, RouteCoordinator, RouteError};
use routekit::events::{EventBus, RouteEvent};
use routekit::geo::{haversine_km, Coordinate};
use routekit::provider::{
    polyline, AsyncHttpClient, DirectionsClient, HttpResponse, ProviderConfig, ProviderError,
};
use routekit::route::{RouteErrorKind, RouteRequest, RouteResult, TravelMode};
use routekit::time::ManualClock;

// ============================================================================
// Scripted transport
// ============================================================================

#[derive(Clone)]
enum Reply {
    Status(u16),
    Body(String),
    Hang,
}

/// HTTP transport answering from a script.
///
/// Replies are consumed in order; the last one repeats.
#[derive(Clone)]
struct ScriptedHttp {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    calls: Arc<AtomicUsize>,
    latency: Duration,
}

impl ScriptedHttp {
    fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            calls: Arc::new(AtomicUsize::new(0)),
            latency: Duration::ZERO,
        }
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> Reply {
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap()
        }
    }
}

impl AsyncHttpClient for ScriptedHttp {
    async fn post_json(
        &self,
        _url: &str,
        _headers: &[(&str, &str)],
        _json_body: &str,
    ) -> Result<HttpResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.next_reply();
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match reply {
            Reply::Status(status) => Ok(HttpResponse::new(status, "unavailable")),
            Reply::Body(body) => Ok(HttpResponse::new(200, body)),
            Reply::Hang => std::future::pending().await,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn moscow_origin() -> Coordinate {
    Coordinate::new(55.751244, 37.618423)
}

fn moscow_destination() -> Coordinate {
    Coordinate::new(55.761244, 37.628423)
}

fn moscow_request(mode: TravelMode) -> RouteRequest {
    RouteRequest::new(moscow_origin(), moscow_destination(), mode)
}

/// A healthy ORS response: five points, 1.2 km, 15 minutes.
fn moscow_body() -> String {
    let origin = moscow_origin();
    let destination = moscow_destination();
    let points: Vec<Coordinate> = (0..5)
        .map(|i| origin.lerp(&destination, i as f64 / 4.0))
        .collect();
    json!({
        "routes": [{
            "summary": {"distance": 1200.0, "duration": 900.0},
            "geometry": polyline::encode(&points)
        }]
    })
    .to_string()
}

fn coordinator(
    http: &ScriptedHttp,
) -> Arc<RouteCoordinator<DirectionsClient<ScriptedHttp>>> {
    coordinator_with_key(http, "test-key")
}

fn coordinator_with_key(
    http: &ScriptedHttp,
    api_key: &str,
) -> Arc<RouteCoordinator<DirectionsClient<ScriptedHttp>>> {
    let provider = DirectionsClient::new(http.clone(), ProviderConfig::new(api_key));
    Arc::new(RouteCoordinator::new(provider, CoordinatorConfig::default()))
}

// ============================================================================
// Resolution
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_healthy_route() {
    let http = ScriptedHttp::new(vec![Reply::Body(moscow_body())]);
    let coordinator = coordinator(&http);

    let result = coordinator
        .resolve(&moscow_request(TravelMode::Walking))
        .await
        .unwrap();

    assert!(!result.is_approximate);
    assert!(result.error.is_none());
    assert!((result.distance_km - 1.2).abs() < 1e-9);
    assert!((result.duration_min - 15.0).abs() < 1e-9);
    assert!(result.coordinates.len() > 2);
    assert_eq!(result.mode, TravelMode::Walking);
    assert_eq!(http.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_identical_requests_share_one_call() {
    let http = ScriptedHttp::new(vec![Reply::Body(moscow_body())])
        .with_latency(Duration::from_millis(300));
    let coordinator = coordinator(&http);
    let request = moscow_request(TravelMode::Driving);

    let resolves = (0..10).map(|_| {
        let coordinator = Arc::clone(&coordinator);
        let request = request.clone();
        async move { coordinator.resolve(&request).await }
    });
    let results: Vec<Result<RouteResult, RouteError>> = join_all(resolves).await;

    assert_eq!(http.calls(), 1);
    let first = results[0].as_ref().unwrap();
    for result in &results {
        assert_eq!(result.as_ref().unwrap(), first);
    }

    let stats = coordinator.stats();
    assert_eq!(stats.provider_calls, 1);
    assert_eq!(stats.coalesced, 9);
}

#[tokio::test(start_paused = true)]
async fn test_cached_route_skips_provider() {
    let http = ScriptedHttp::new(vec![Reply::Body(moscow_body())]);
    let coordinator = coordinator(&http);
    let request = moscow_request(TravelMode::Bicycling);

    let first = coordinator.resolve(&request).await.unwrap();
    let second = coordinator.resolve(&request).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(http.calls(), 1);
    assert_eq!(coordinator.stats().cache_hits, 1);
}

#[tokio::test(start_paused = true)]
async fn test_same_point_never_calls_provider() {
    let http = ScriptedHttp::new(vec![Reply::Body(moscow_body())]);
    let coordinator = coordinator(&http);

    let request = RouteRequest::new(moscow_origin(), moscow_origin(), TravelMode::Driving);
    let result = coordinator.resolve(&request).await.unwrap();

    assert_eq!(result.error, Some(RouteErrorKind::SameCoordinates));
    assert!(result.coordinates.is_empty());
    assert_eq!(http.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_coordinates_rejected() {
    let http = ScriptedHttp::new(vec![Reply::Body(moscow_body())]);
    let coordinator = coordinator(&http);

    let request = RouteRequest::new(
        Coordinate::new(95.0, 37.6),
        moscow_destination(),
        TravelMode::Driving,
    );
    let err = coordinator.resolve(&request).await.unwrap_err();

    assert_eq!(err.kind(), Some(RouteErrorKind::InvalidCoordinates));
    assert_eq!(http.calls(), 0);
}

// ============================================================================
// Retry and fallback
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_repeated_503_falls_back_to_straight_line() {
    let http = ScriptedHttp::new(vec![Reply::Status(503)]);
    let coordinator = coordinator(&http);
    let request = moscow_request(TravelMode::Walking);

    let result = coordinator.resolve(&request).await.unwrap();

    assert_eq!(http.calls(), 3);
    assert!(result.is_approximate);
    assert!(result.error.is_none());
    assert!(result.coordinates.len() >= 2);

    let straight = haversine_km(&request.origin, &request.destination);
    assert!((result.distance_km - straight).abs() <= straight * 0.01);
    assert_eq!(coordinator.stats().fallbacks, 1);
}

#[tokio::test(start_paused = true)]
async fn test_503_then_success_is_not_approximate() {
    let http = ScriptedHttp::new(vec![Reply::Status(503), Reply::Body(moscow_body())]);
    let coordinator = coordinator(&http);

    let result = coordinator
        .resolve(&moscow_request(TravelMode::Driving))
        .await
        .unwrap();

    assert_eq!(http.calls(), 2);
    assert!(!result.is_approximate);
    assert_eq!(result.traffic_load.len(), result.coordinates.len());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_falls_back() {
    let http = ScriptedHttp::new(vec![Reply::Hang]);
    let coordinator = coordinator(&http);

    let result = coordinator
        .resolve(&moscow_request(TravelMode::Driving))
        .await
        .unwrap();

    assert!(result.is_approximate);
    assert_eq!(http.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_out_of_range_geometry_falls_back() {
    let geometry = polyline::encode(&[Coordinate::new(10.0, 10.0), Coordinate::new(300.0, 500.0)]);
    let body = json!({
        "routes": [{
            "summary": {"distance": 1200.0, "duration": 900.0},
            "geometry": geometry
        }]
    })
    .to_string();
    let http = ScriptedHttp::new(vec![Reply::Body(body)]);
    let coordinator = coordinator(&http);

    let result = coordinator
        .resolve(&moscow_request(TravelMode::Walking))
        .await
        .unwrap();

    assert!(result.is_approximate);
    assert!(result.coordinates.iter().all(Coordinate::is_valid));
    assert_eq!(coordinator.stats().fallbacks, 1);
    assert_eq!(http.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_server_error_is_not_retried() {
    let http = ScriptedHttp::new(vec![Reply::Status(500)]);
    let coordinator = coordinator(&http);

    let result = coordinator
        .resolve(&moscow_request(TravelMode::Transit))
        .await
        .unwrap();

    assert!(result.is_approximate);
    assert_eq!(http.calls(), 1);
}

// ============================================================================
// Circuit breaker
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_access_denied_blocks_every_mode_until_reset() {
    let http = ScriptedHttp::new(vec![Reply::Status(403), Reply::Body(moscow_body())]);
    let coordinator = coordinator(&http);
    let mut events = coordinator.events().subscribe();

    let err = coordinator
        .resolve(&moscow_request(TravelMode::Driving))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(RouteErrorKind::ApiAccessDenied));
    assert!(coordinator.is_blocked());
    assert!(matches!(
        events.recv().await.unwrap(),
        RouteEvent::CircuitOpened { .. }
    ));

    for mode in TravelMode::ALL {
        let err = coordinator.resolve(&moscow_request(mode)).await.unwrap_err();
        assert!(matches!(err, RouteError::ServiceBlocked { .. }));
    }
    assert_eq!(http.calls(), 1);

    assert!(coordinator.reset_circuit_breaker());
    assert!(matches!(events.recv().await.unwrap(), RouteEvent::CircuitReset));

    let result = coordinator
        .resolve(&moscow_request(TravelMode::Walking))
        .await
        .unwrap();
    assert!(!result.is_approximate);
    assert_eq!(http.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_missing_api_key_opens_breaker_without_network() {
    let http = ScriptedHttp::new(vec![Reply::Body(moscow_body())]);
    let coordinator = coordinator_with_key(&http, "");

    let err = coordinator
        .resolve(&moscow_request(TravelMode::Driving))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(RouteErrorKind::ApiKeyMissing));
    assert!(coordinator.is_blocked());
    assert_eq!(http.calls(), 0);
}

// ============================================================================
// Cache
// ============================================================================

fn numbered_request(i: usize) -> RouteRequest {
    RouteRequest::new(
        Coordinate::new(55.0 + i as f64 * 0.01, 37.0),
        Coordinate::new(56.0, 38.0),
        TravelMode::Driving,
    )
}

#[test]
fn test_cache_stays_within_capacity() {
    let cache = RouteCache::new(CacheConfig::default());

    for i in 0..45 {
        let request = numbered_request(i);
        cache.put(request.fingerprint(), routekit::fallback::synthesize(&request));
    }

    assert_eq!(cache.len(), 40);
    assert_eq!(cache.stats().evictions, 5);
    assert!(cache.get(&numbered_request(44).fingerprint()).is_some());
}

#[test]
fn test_cache_entries_expire() {
    let clock = Arc::new(ManualClock::new(0));
    let cache = RouteCache::with_clock(
        CacheConfig::default().with_ttl(Duration::from_secs(300)),
        clock.clone(),
    );
    let request = numbered_request(0);
    cache.put(request.fingerprint(), routekit::fallback::synthesize(&request));

    clock.advance(Duration::from_secs(299));
    assert!(cache.get(&request.fingerprint()).is_some());

    clock.advance(Duration::from_secs(2));
    assert!(cache.get(&request.fingerprint()).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_shared_cache_and_bus() {
    let http = ScriptedHttp::new(vec![Reply::Body(moscow_body())]);
    let cache = RouteCache::new(CacheConfig::default());
    let request = moscow_request(TravelMode::Walking);
    cache.put(request.fingerprint(), routekit::fallback::synthesize(&request));

    let provider = DirectionsClient::new(http.clone(), ProviderConfig::new("key"));
    let coordinator = RouteCoordinator::with_parts(
        provider,
        CoordinatorConfig::default(),
        cache,
        EventBus::new(8),
    );

    let result = coordinator.resolve(&request).await.unwrap();
    assert!(result.is_approximate);
    assert_eq!(http.calls(), 0);
}
