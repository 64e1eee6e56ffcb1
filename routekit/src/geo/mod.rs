//! Geographic helpers.
//!
//! Plain functions over [`Coordinate`]: degree/radian conversion, haversine
//! distance, and polyline length. Nothing here holds state.

mod types;

pub use types::{Coordinate, CoordError, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius used for haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Converts degrees to radians.
#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Converts radians to degrees.
#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Great-circle distance between two points in kilometers.
///
/// # Example
///
/// ```
/// use routekit::geo::{haversine_km, Coordinate};
///
/// let a = Coordinate::new(55.751244, 37.618423);
/// let b = Coordinate::new(55.761244, 37.628423);
/// let km = haversine_km(&a, &b);
/// assert!(km > 1.2 && km < 1.35);
/// ```
pub fn haversine_km(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1 = to_radians(from.latitude);
    let lat2 = to_radians(to.latitude);
    let delta_lat = to_radians(to.latitude - from.latitude);
    let delta_lon = to_radians(to.longitude - from.longitude);

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Clamp guards asin against rounding slightly above 1.0 for antipodes
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Sum of haversine distances along a polyline.
///
/// Returns 0 for fewer than two points.
pub fn path_length_km(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_km(&pair[0], &pair[1]))
        .sum()
}
