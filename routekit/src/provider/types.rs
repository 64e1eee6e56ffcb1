//! Provider types and traits

use crate::geo::CoordError;
use crate::route::{RouteErrorKind, RouteRequest, RouteResult};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur while fetching directions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Origin, destination or a waypoint failed validation
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(#[from] CoordError),

    /// No API key configured; nothing was sent
    #[error("No API key configured for the directions provider")]
    ApiKeyMissing,

    /// Provider rejected our credentials (HTTP 401/403)
    #[error("Access denied by provider (HTTP {status}): {message}")]
    AccessDenied { status: u16, message: String },

    /// Response decoded but contained no usable route
    #[error("Provider returned no usable route")]
    EmptyResponse,

    /// Non-success status that is not an access error
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Transport failure or undecodable body
    #[error("Request failed: {0}")]
    Request(String),

    /// A single attempt exceeded the per-attempt timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the fetch
    #[error("Request cancelled")]
    Cancelled,
}

impl ProviderError {
    /// Wire-level classification.
    ///
    /// Cancellation is not an error from the caller's point of view and
    /// has no kind.
    pub fn kind(&self) -> Option<RouteErrorKind> {
        match self {
            ProviderError::InvalidCoordinates(_) => Some(RouteErrorKind::InvalidCoordinates),
            ProviderError::ApiKeyMissing => Some(RouteErrorKind::ApiKeyMissing),
            ProviderError::AccessDenied { .. } => Some(RouteErrorKind::ApiAccessDenied),
            ProviderError::EmptyResponse => Some(RouteErrorKind::EmptyResponse),
            ProviderError::Http { .. }
            | ProviderError::Request(_)
            | ProviderError::Timeout(_) => Some(RouteErrorKind::RequestError),
            ProviderError::Cancelled => None,
        }
    }

    /// True if the provider will keep refusing every request.
    pub fn trips_circuit_breaker(&self) -> bool {
        self.kind()
            .is_some_and(|kind| kind.trips_circuit_breaker())
    }

    /// True for [`ProviderError::Cancelled`].
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProviderError::Cancelled)
    }
}

/// Async source of directions for a single travel mode.
///
/// Implementors validate the request, talk to the network and decode the
/// result. Retries, timeouts and cancellation all happen inside `fetch`.
pub trait RouteProvider: Send + Sync {
    /// Fetches a route for `request`.
    ///
    /// A same-point request resolves to [`RouteResult::same_point`] without
    /// touching the network. Once `cancel` fires no further attempt is made
    /// and [`ProviderError::Cancelled`] is returned.
    fn fetch(
        &self,
        request: &RouteRequest,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<RouteResult, ProviderError>> + Send;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;
}
