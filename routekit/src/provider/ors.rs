//! OpenRouteService directions wire format.
//!
//! # Request
//!
//! `POST {base}/v2/directions/{profile}` with the API key in the
//! `Authorization` header and a JSON body:
//!
//! ```json
//! {"coordinates": [[lng, lat], ...], "preference": "fastest", "instructions": false}
//! ```
//!
//! Note the `[lng, lat]` order.
//!
//! # Response
//!
//! Only the first route is used. `summary.distance` is in metres,
//! `summary.duration` in seconds, and `geometry` is a precision-5 encoded
//! polyline. Very short routes may come back with an empty summary.

use super::polyline;
use super::types::ProviderError;
use crate::geo::Coordinate;
use crate::route::{RouteRequest, TravelMode};
use serde::{Deserialize, Serialize};

/// Public OpenRouteService endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// Routing profile for `mode`.
///
/// There is no public transit profile; transit is routed over the road
/// network with the "recommended" preference.
pub fn profile(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Driving | TravelMode::Transit => "driving-car",
        TravelMode::Walking => "foot-walking",
        TravelMode::Bicycling => "cycling-regular",
    }
}

/// Route preference for `mode`.
pub fn preference(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Transit => "recommended",
        _ => "fastest",
    }
}

/// Directions endpoint for `mode` under `base_url`.
pub fn directions_url(base_url: &str, mode: TravelMode) -> String {
    format!(
        "{}/v2/directions/{}",
        base_url.trim_end_matches('/'),
        profile(mode)
    )
}

#[derive(Debug, Serialize)]
struct DirectionsBody<'a> {
    coordinates: Vec<[f64; 2]>,
    preference: &'a str,
    instructions: bool,
}

/// Serializes the request body for `request`.
pub fn request_body(request: &RouteRequest) -> Result<String, ProviderError> {
    let body = DirectionsBody {
        coordinates: request
            .points()
            .iter()
            .map(|c| [c.longitude, c.latitude])
            .collect(),
        preference: preference(request.mode),
        instructions: false,
    };
    serde_json::to_string(&body)
        .map_err(|e| ProviderError::Request(format!("Failed to encode request: {}", e)))
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    summary: Option<Summary>,
    #[serde(default)]
    geometry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Summary {
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    duration: Option<f64>,
}

/// First route of a response, decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRoute {
    pub coordinates: Vec<Coordinate>,
    /// Metres, if the provider reported it
    pub distance_m: Option<f64>,
    /// Seconds, if the provider reported it
    pub duration_s: Option<f64>,
}

impl DecodedRoute {
    /// True if the provider sent any summary figure.
    pub fn has_summary(&self) -> bool {
        self.distance_m.is_some() || self.duration_s.is_some()
    }
}

/// Parses a successful response body.
///
/// Returns [`ProviderError::EmptyResponse`] when there is no route or no
/// geometry, and [`ProviderError::Request`] for malformed JSON, a malformed
/// polyline or a decoded point outside valid latitude/longitude ranges.
pub fn parse_response(body: &[u8]) -> Result<DecodedRoute, ProviderError> {
    let response: DirectionsResponse = serde_json::from_slice(body)
        .map_err(|e| ProviderError::Request(format!("Malformed directions response: {}", e)))?;

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyResponse)?;

    let geometry = route
        .geometry
        .filter(|g| !g.is_empty())
        .ok_or(ProviderError::EmptyResponse)?;

    let coordinates = polyline::decode(&geometry)
        .map_err(|e| ProviderError::Request(format!("Malformed route geometry: {}", e)))?;
    for point in &coordinates {
        point
            .validate()
            .map_err(|e| ProviderError::Request(format!("Route geometry out of range: {}", e)))?;
    }

    let summary = route.summary.unwrap_or_default();
    Ok(DecodedRoute {
        coordinates,
        distance_m: summary.distance.filter(|d| d.is_finite() && *d >= 0.0),
        duration_s: summary.duration.filter(|d| d.is_finite() && *d >= 0.0),
    })
}
