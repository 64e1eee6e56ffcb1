//! Route request and result types.

use super::fingerprint::RequestFingerprint;
use super::mode::TravelMode;
use crate::geo::{CoordError, Coordinate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin and destination closer than this on both axes are the same point.
pub const SAME_POINT_EPSILON_DEG: f64 = 1e-7;

/// Upper bound of a traffic load value.
pub const MAX_TRAFFIC_LOAD: u8 = 10;

/// A single routing need: where from, where to, how.
///
/// Immutable once built; the coordinator never rewrites requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    /// Intermediate points passed through to the provider in order.
    #[serde(default)]
    pub waypoints: Vec<Coordinate>,
    pub mode: TravelMode,
}

impl RouteRequest {
    /// Creates a request without waypoints.
    pub fn new(origin: Coordinate, destination: Coordinate, mode: TravelMode) -> Self {
        Self {
            origin,
            destination,
            waypoints: Vec::new(),
            mode,
        }
    }

    /// Adds pass-through waypoints.
    pub fn with_waypoints(mut self, waypoints: Vec<Coordinate>) -> Self {
        self.waypoints = waypoints;
        self
    }

    /// Same endpoints and waypoints, different mode.
    pub fn for_mode(&self, mode: TravelMode) -> Self {
        Self {
            origin: self.origin,
            destination: self.destination,
            waypoints: self.waypoints.clone(),
            mode,
        }
    }

    /// Cache and dedup key for this request.
    #[inline]
    pub fn fingerprint(&self) -> RequestFingerprint {
        RequestFingerprint::from_request(self)
    }

    /// Validates origin, destination and every waypoint.
    pub fn validate(&self) -> Result<(), CoordError> {
        self.origin.validate()?;
        self.destination.validate()?;
        for waypoint in &self.waypoints {
            waypoint.validate()?;
        }
        Ok(())
    }

    /// True when origin and destination coincide within
    /// [`SAME_POINT_EPSILON_DEG`].
    #[inline]
    pub fn is_same_point(&self) -> bool {
        self.origin
            .approx_eq(&self.destination, SAME_POINT_EPSILON_DEG)
    }

    /// All points in travel order: origin, waypoints, destination.
    pub fn points(&self) -> Vec<Coordinate> {
        let mut points = Vec::with_capacity(self.waypoints.len() + 2);
        points.push(self.origin);
        points.extend_from_slice(&self.waypoints);
        points.push(self.destination);
        points
    }
}

/// Why a route is empty or why it could not be obtained.
///
/// The serialized form is the wire code shown to collaborators
/// (`INVALID_COORDINATES`, `SAME_COORDINATES`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteErrorKind {
    InvalidCoordinates,
    SameCoordinates,
    ApiKeyMissing,
    ApiAccessDenied,
    EmptyResponse,
    RequestError,
    ServiceUnavailable,
}

impl RouteErrorKind {
    /// Stable wire code.
    pub fn code(&self) -> &'static str {
        match self {
            RouteErrorKind::InvalidCoordinates => "INVALID_COORDINATES",
            RouteErrorKind::SameCoordinates => "SAME_COORDINATES",
            RouteErrorKind::ApiKeyMissing => "API_KEY_MISSING",
            RouteErrorKind::ApiAccessDenied => "API_ACCESS_DENIED",
            RouteErrorKind::EmptyResponse => "EMPTY_RESPONSE",
            RouteErrorKind::RequestError => "REQUEST_ERROR",
            RouteErrorKind::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Kinds that mean the provider will keep refusing us.
    #[inline]
    pub fn trips_circuit_breaker(&self) -> bool {
        matches!(
            self,
            RouteErrorKind::ApiAccessDenied | RouteErrorKind::ApiKeyMissing
        )
    }
}

impl fmt::Display for RouteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Canonical route shape handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    /// Polyline, possibly empty
    pub coordinates: Vec<Coordinate>,
    pub distance_km: f64,
    pub duration_min: f64,
    /// Straight-line estimate rather than a provider route
    pub is_approximate: bool,
    pub mode: TravelMode,
    /// Load per polyline point, 0..=10, only non-zero for driving
    pub traffic_load: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RouteErrorKind>,
}

impl RouteResult {
    /// Empty result for a request whose endpoints coincide.
    pub fn same_point(mode: TravelMode) -> Self {
        Self::empty(mode, RouteErrorKind::SameCoordinates)
    }

    /// Empty result carrying `error`.
    pub fn empty(mode: TravelMode, error: RouteErrorKind) -> Self {
        Self {
            coordinates: Vec::new(),
            distance_km: 0.0,
            duration_min: 0.0,
            is_approximate: false,
            mode,
            traffic_load: Vec::new(),
            error: Some(error),
        }
    }

    /// Has geometry and no error.
    #[inline]
    pub fn is_usable(&self) -> bool {
        !self.coordinates.is_empty() && self.error.is_none()
    }

    /// Number of polyline points.
    #[inline]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// True when the polyline has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}
