//! Request fingerprinting.
//!
//! A [`RequestFingerprint`] is the key used both by the route cache and by
//! the in-flight registry. Coordinates are quantized to six decimal places
//! (roughly 11 cm) so that jitter from repeated GPS reads or map drags maps
//! to the same key.
//!
//! Waypoints contribute a hash of their quantized values, so two requests
//! that only differ in their waypoint lists never share a cache entry.

use super::mode::TravelMode;
use super::types::RouteRequest;
use crate::geo::Coordinate;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Quantization factor: six decimal digits.
const MICRO_DEGREES: f64 = 1_000_000.0;

/// A coordinate rounded to integer micro-degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuantizedCoord {
    lat_e6: i64,
    lon_e6: i64,
}

impl QuantizedCoord {
    /// Rounds both axes to six decimals.
    #[inline]
    pub fn from_coordinate(coord: &Coordinate) -> Self {
        Self {
            lat_e6: (coord.latitude * MICRO_DEGREES).round() as i64,
            lon_e6: (coord.longitude * MICRO_DEGREES).round() as i64,
        }
    }

    /// Back to degrees (already rounded).
    pub fn to_coordinate(&self) -> Coordinate {
        Coordinate::new(
            self.lat_e6 as f64 / MICRO_DEGREES,
            self.lon_e6 as f64 / MICRO_DEGREES,
        )
    }
}

impl fmt::Display for QuantizedCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.to_coordinate();
        write!(f, "{:.6},{:.6}", c.latitude, c.longitude)
    }
}

/// Origin/destination pair, independent of mode.
///
/// The prefetcher keys its "already triggered" bookkeeping on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoutePair {
    origin: QuantizedCoord,
    destination: QuantizedCoord,
}

impl RoutePair {
    /// Quantizes both endpoints.
    pub fn new(origin: &Coordinate, destination: &Coordinate) -> Self {
        Self {
            origin: QuantizedCoord::from_coordinate(origin),
            destination: QuantizedCoord::from_coordinate(destination),
        }
    }

    /// Waypoint-free fingerprint for `mode` on this pair.
    pub fn fingerprint(&self, mode: TravelMode) -> RequestFingerprint {
        RequestFingerprint {
            origin: self.origin,
            destination: self.destination,
            waypoints: 0,
            mode,
        }
    }
}

impl fmt::Display for RoutePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.origin, self.destination)
    }
}

/// Deterministic key for a [`RouteRequest`].
///
/// # Example
///
/// ```
/// use routekit::geo::Coordinate;
/// use routekit::route::{RouteRequest, TravelMode};
///
/// let a = RouteRequest::new(
///     Coordinate::new(55.7512441, 37.6184229),
///     Coordinate::new(55.761244, 37.628423),
///     TravelMode::Driving,
/// );
/// let b = RouteRequest::new(
///     Coordinate::new(55.7512443, 37.6184231),
///     Coordinate::new(55.761244, 37.628423),
///     TravelMode::Driving,
/// );
/// assert_eq!(a.fingerprint(), b.fingerprint());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestFingerprint {
    origin: QuantizedCoord,
    destination: QuantizedCoord,
    /// Hash of the quantized waypoint list, 0 when there are none
    waypoints: u64,
    mode: TravelMode,
}

impl RequestFingerprint {
    /// Derives the fingerprint of `request`.
    pub fn from_request(request: &RouteRequest) -> Self {
        Self {
            origin: QuantizedCoord::from_coordinate(&request.origin),
            destination: QuantizedCoord::from_coordinate(&request.destination),
            waypoints: waypoint_hash(&request.waypoints),
            mode: request.mode,
        }
    }

    /// Travel mode component.
    #[inline]
    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    /// Origin/destination component.
    #[inline]
    pub fn pair(&self) -> RoutePair {
        RoutePair {
            origin: self.origin,
            destination: self.destination,
        }
    }

    /// True if the request carried waypoints.
    #[inline]
    pub fn has_waypoints(&self) -> bool {
        self.waypoints != 0
    }
}

impl fmt::Display for RequestFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}:{}", self.origin, self.destination, self.mode)?;
        if self.waypoints != 0 {
            write!(f, "#wp{:016x}", self.waypoints)?;
        }
        Ok(())
    }
}

fn waypoint_hash(waypoints: &[Coordinate]) -> u64 {
    if waypoints.is_empty() {
        return 0;
    }
    let mut hasher = DefaultHasher::new();
    waypoints.len().hash(&mut hasher);
    for waypoint in waypoints {
        QuantizedCoord::from_coordinate(waypoint).hash(&mut hasher);
    }
    // 0 is reserved for "no waypoints"
    hasher.finish().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(origin: (f64, f64), destination: (f64, f64), mode: TravelMode) -> RouteRequest {
        RouteRequest::new(
            Coordinate::new(origin.0, origin.1),
            Coordinate::new(destination.0, destination.1),
            mode,
        )
    }

    #[test]
    fn test_fingerprint_is_idempotent() {
        let req = request(
            (55.751244, 37.618423),
            (55.761244, 37.628423),
            TravelMode::Driving,
        );
        assert_eq!(req.fingerprint(), req.fingerprint());
        assert_eq!(req.fingerprint().to_string(), req.fingerprint().to_string());
    }

    #[test]
    fn test_jitter_beyond_sixth_decimal_is_ignored() {
        let a = request(
            (55.7512440001, 37.6184230004),
            (55.761244, 37.628423),
            TravelMode::Walking,
        );
        let b = request(
            (55.7512439998, 37.6184229996),
            (55.761244, 37.628423),
            TravelMode::Walking,
        );
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_sixth_decimal_difference_is_significant() {
        let a = request((55.751244, 37.618423), (55.761244, 37.628423), TravelMode::Driving);
        let b = request((55.751245, 37.618423), (55.761244, 37.628423), TravelMode::Driving);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_mode_is_part_of_fingerprint() {
        let a = request((1.0, 2.0), (3.0, 4.0), TravelMode::Driving);
        let b = a.for_mode(TravelMode::Transit);
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().pair(), b.fingerprint().pair());
    }

    #[test]
    fn test_waypoints_change_fingerprint() {
        let base = request((1.0, 2.0), (3.0, 4.0), TravelMode::Driving);
        let via_a = base
            .clone()
            .with_waypoints(vec![Coordinate::new(2.0, 3.0)]);
        let via_b = base
            .clone()
            .with_waypoints(vec![Coordinate::new(2.5, 3.0)]);

        assert_ne!(base.fingerprint(), via_a.fingerprint());
        assert_ne!(via_a.fingerprint(), via_b.fingerprint());
        assert!(via_a.fingerprint().has_waypoints());
        assert!(!base.fingerprint().has_waypoints());
    }

    #[test]
    fn test_pair_fingerprint_matches_plain_request() {
        let req = request((1.0, 2.0), (3.0, 4.0), TravelMode::Bicycling);
        let pair = RoutePair::new(&req.origin, &req.destination);
        assert_eq!(pair.fingerprint(TravelMode::Bicycling), req.fingerprint());
    }

    #[test]
    fn test_display_format() {
        let req = request((55.751244, 37.618423), (55.761244, 37.628423), TravelMode::Driving);
        assert_eq!(
            req.fingerprint().to_string(),
            "55.751244,37.618423->55.761244,37.628423:driving"
        );
    }

    #[test]
    fn test_negative_coordinates_round_symmetrically() {
        let q = QuantizedCoord::from_coordinate(&Coordinate::new(-33.8688197, -151.2092955));
        let c = q.to_coordinate();
        assert!((c.latitude + 33.86882).abs() < 1e-9);
        assert!((c.longitude + 151.209296).abs() < 1e-9);
    }
}
