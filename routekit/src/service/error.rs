//! Service error types.

use crate::provider::ProviderError;
use std::fmt;

/// Errors that can occur while assembling the service.
///
/// Per-request failures are reported as
/// [`RouteError`](crate::coordinator::RouteError) instead.
#[derive(Debug)]
pub enum ServiceError {
    /// Failed to create HTTP client
    HttpClientError(String),
    /// Failed to create provider
    ProviderError(ProviderError),
    /// Invalid configuration
    ConfigError(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpClientError(msg) => write!(f, "HTTP client error: {}", msg),
            Self::ProviderError(e) => write!(f, "Provider error: {}", e),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ProviderError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProviderError> for ServiceError {
    fn from(e: ProviderError) -> Self {
        Self::ProviderError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_http_client_error() {
        let err = ServiceError::HttpClientError("tls backend unavailable".to_string());
        assert!(err.to_string().contains("HTTP client error"));
        assert!(err.to_string().contains("tls backend unavailable"));
    }

    #[test]
    fn test_display_config_error() {
        let err = ServiceError::ConfigError("event capacity must be positive".to_string());
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_from_provider_error() {
        let service_err: ServiceError = ProviderError::ApiKeyMissing.into();
        assert!(matches!(service_err, ServiceError::ProviderError(_)));
        assert!(std::error::Error::source(&service_err).is_some());
    }
}
