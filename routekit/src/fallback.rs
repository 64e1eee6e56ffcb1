//! Straight-line fallback routes.
//!
//! When the provider cannot deliver, the UI still gets something to draw: a
//! short polyline along the straight line between the endpoints, the
//! great-circle distance and a duration estimated from the mode's nominal
//! speed. These results are always flagged approximate.

use crate::geo::haversine_km;
use crate::route::{RouteRequest, RouteResult, TravelMode, MAX_TRAFFIC_LOAD};

/// Points in a synthesized polyline, endpoints included.
pub const FALLBACK_POINTS: usize = 6;

/// Peak of the synthetic traffic curve.
const TRAFFIC_PEAK: f64 = 8.0;

/// Builds an approximate route for `request`. Never fails.
///
/// Waypoints are ignored; the line runs straight from origin to destination.
pub fn synthesize(request: &RouteRequest) -> RouteResult {
    let last = (FALLBACK_POINTS - 1) as f64;
    let coordinates: Vec<_> = (0..FALLBACK_POINTS)
        .map(|i| request.origin.lerp(&request.destination, i as f64 / last))
        .collect();

    let distance_km = haversine_km(&request.origin, &request.destination);
    let duration_min = estimate_duration_min(distance_km, request.mode);
    let traffic_load = traffic_for_mode(request.mode, coordinates.len());

    RouteResult {
        coordinates,
        distance_km,
        duration_min,
        is_approximate: true,
        mode: request.mode,
        traffic_load,
        error: None,
    }
}

/// Minutes to cover `distance_km` at the nominal speed of `mode`.
#[inline]
pub fn estimate_duration_min(distance_km: f64, mode: TravelMode) -> f64 {
    distance_km / mode.nominal_speed_kmh() * 60.0
}

/// Traffic load for a polyline of `len` points travelled in `mode`.
///
/// Zeros for every mode without traffic.
pub fn traffic_for_mode(mode: TravelMode, len: usize) -> Vec<u8> {
    if mode.has_traffic() {
        traffic_profile(len)
    } else {
        vec![0; len]
    }
}

/// Synthetic congestion curve peaking mid-route.
///
/// Point `i` of `len` gets `round(8 * (1 - 2 * |i / (len - 1) - 0.5|))`,
/// so both ends are 0 and the middle is 8. A single point gets 0.
pub fn traffic_profile(len: usize) -> Vec<u8> {
    if len <= 1 {
        return vec![0; len];
    }
    let n = (len - 1) as f64;
    (0..len)
        .map(|i| {
            let t = i as f64 / n;
            let load = (TRAFFIC_PEAK * (1.0 - 2.0 * (t - 0.5).abs())).round();
            load.clamp(0.0, MAX_TRAFFIC_LOAD as f64) as u8
        })
        .collect()
}
