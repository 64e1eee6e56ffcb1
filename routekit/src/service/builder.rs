//! Construction of the production service.
//!
//! Wires the OpenRouteService client over reqwest into a [`RouteService`].

use super::config::ServiceConfig;
use super::error::ServiceError;
use super::facade::RouteService;
use crate::provider::{AsyncReqwestClient, DirectionsClient, ProviderConfig};
use tracing::warn;

/// The provider used outside of tests.
pub type OrsProvider = DirectionsClient<AsyncReqwestClient>;

/// Create the directions client for `config`.
///
/// The HTTP client's own timeout matches the per-attempt timeout so a stuck
/// connection is torn down together with the attempt.
pub fn create_provider(config: &ProviderConfig) -> Result<OrsProvider, ServiceError> {
    let http = AsyncReqwestClient::with_timeout(config.timeout)
        .map_err(|e| ServiceError::HttpClientError(e.to_string()))?;
    if !config.has_api_key() {
        warn!("No directions API key configured; routing is unavailable until one is set");
    }
    Ok(DirectionsClient::new(http, config.clone()))
}

/// Check settings that would otherwise panic or stall at runtime.
pub fn validate_config(config: &ServiceConfig) -> Result<(), ServiceError> {
    if config.event_capacity() == 0 {
        return Err(ServiceError::ConfigError(
            "event capacity must be at least 1".to_string(),
        ));
    }
    if config.provider().timeout.is_zero() {
        return Err(ServiceError::ConfigError(
            "provider timeout must be positive".to_string(),
        ));
    }
    if config.cache().ttl.is_zero() {
        return Err(ServiceError::ConfigError(
            "cache TTL must be positive".to_string(),
        ));
    }
    Ok(())
}

impl RouteService<OrsProvider> {
    /// Create the OpenRouteService-backed service from configuration.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: ServiceConfig) -> Result<Self, ServiceError> {
        validate_config(&config)?;
        let provider = create_provider(config.provider())?;
        Ok(Self::new(provider, &config))
    }
}
