//! Route domain types: travel modes, requests, results and fingerprints.

mod fingerprint;
mod mode;
mod types;

pub use fingerprint::{QuantizedCoord, RequestFingerprint, RoutePair};
pub use mode::{ParseTravelModeError, TravelMode};
pub use types::{
    RouteErrorKind, RouteRequest, RouteResult, MAX_TRAFFIC_LOAD, SAME_POINT_EPSILON_DEG,
};
