//! Coordinator error types.

use crate::geo::CoordError;
use crate::route::RouteErrorKind;
use std::fmt;

/// Errors surfaced by [`RouteCoordinator::resolve`](super::RouteCoordinator::resolve).
///
/// Transient provider failures never show up here; they are absorbed by the
/// straight-line fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    /// The circuit breaker is open; nothing was attempted
    ServiceBlocked { reason: String },
    /// Request coordinates failed validation
    InvalidCoordinates(CoordError),
    /// The provider refused our credentials; the breaker is now open
    AccessDenied { kind: RouteErrorKind, message: String },
    /// The request was cancelled before it resolved
    Cancelled,
}

impl RouteError {
    /// Wire-level classification, `None` for cancellation.
    pub fn kind(&self) -> Option<RouteErrorKind> {
        match self {
            Self::ServiceBlocked { .. } => Some(RouteErrorKind::ServiceUnavailable),
            Self::InvalidCoordinates(_) => Some(RouteErrorKind::InvalidCoordinates),
            Self::AccessDenied { kind, .. } => Some(*kind),
            Self::Cancelled => None,
        }
    }

    /// True for [`RouteError::Cancelled`].
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceBlocked { reason } => {
                write!(f, "Routing service suspended: {}", reason)
            }
            Self::InvalidCoordinates(e) => write!(f, "Invalid coordinates: {}", e),
            Self::AccessDenied { kind, message } => {
                write!(f, "Routing provider access denied ({}): {}", kind, message)
            }
            Self::Cancelled => write!(f, "Route request cancelled"),
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidCoordinates(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoordError> for RouteError {
    fn from(e: CoordError) -> Self {
        Self::InvalidCoordinates(e)
    }
}
