//! Conversion from file settings to the typed component configs.

use std::time::Duration;

use super::defaults::API_KEY_ENV_VAR;
use super::settings::ConfigFile;
use crate::cache::CacheConfig;
use crate::coordinator::CoordinatorConfig;
use crate::prefetch::PrefetchConfig;
use crate::provider::{ProviderConfig, RetryPolicy};
use crate::service::ServiceConfig;

impl ConfigFile {
    /// The API key from the file, else from `ORS_API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(
            self.provider.api_key.as_deref(),
            std::env::var(API_KEY_ENV_VAR).ok(),
        )
    }

    pub fn to_provider_config(&self) -> ProviderConfig {
        let retry = RetryPolicy::default()
            .with_max_retries(self.retry.max_retries)
            .with_backoff(Duration::from_millis(self.retry.backoff_ms));
        ProviderConfig::new(self.resolved_api_key().unwrap_or_default())
            .with_base_url(self.provider.base_url.clone())
            .with_timeout(Duration::from_secs(self.provider.timeout_secs))
            .with_retry(retry)
    }

    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig::default()
            .with_ttl(Duration::from_secs(self.cache.ttl_secs))
            .with_capacity(self.cache.capacity)
    }

    pub fn to_coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig::default()
            .with_min_request_interval(Duration::from_millis(self.coordinator.min_interval_ms))
            .with_circuit_auto_reset(
                self.coordinator
                    .circuit_auto_reset_secs
                    .map(Duration::from_secs),
            )
    }

    pub fn to_prefetch_config(&self) -> PrefetchConfig {
        PrefetchConfig {
            enabled: self.prefetch.enabled,
            stagger: Duration::from_millis(self.prefetch.stagger_ms),
        }
    }

    /// Everything the route service needs.
    pub fn to_service_config(&self) -> ServiceConfig {
        ServiceConfig::builder()
            .provider(self.to_provider_config())
            .cache(self.to_cache_config())
            .coordinator(self.to_coordinator_config())
            .prefetch(self.to_prefetch_config())
            .build()
    }
}

/// Picks the configured key, falling back to the environment value.
/// Blank values count as missing.
pub fn resolve_api_key(configured: Option<&str>, env: Option<String>) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| env.map(|key| key.trim().to_string()).filter(|key| !key.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_api_key_prefers_file() {
        assert_eq!(
            resolve_api_key(Some("file-key"), Some("env-key".into())),
            Some("file-key".to_string())
        );
        assert_eq!(
            resolve_api_key(None, Some("env-key".into())),
            Some("env-key".to_string())
        );
        assert_eq!(
            resolve_api_key(Some("  "), Some("env-key".into())),
            Some("env-key".to_string())
        );
        assert_eq!(resolve_api_key(None, Some(" ".into())), None);
        assert_eq!(resolve_api_key(None, None), None);
    }

    #[test]
    fn test_to_service_config() {
        let mut file = ConfigFile::default();
        file.provider.api_key = Some("key".to_string());
        file.provider.timeout_secs = 7;
        file.retry.max_retries = 4;
        file.retry.backoff_ms = 50;
        file.cache.capacity = 5;
        file.coordinator.min_interval_ms = 200;
        file.coordinator.circuit_auto_reset_secs = Some(60);
        file.prefetch.stagger_ms = 3000;

        let config = file.to_service_config();

        assert_eq!(config.provider().api_key, "key");
        assert_eq!(config.provider().timeout, Duration::from_secs(7));
        assert_eq!(config.provider().retry.max_retries, 4);
        assert_eq!(config.provider().retry.backoff, Duration::from_millis(50));
        assert_eq!(config.cache().capacity, 5);
        assert_eq!(
            config.coordinator().min_request_interval,
            Duration::from_millis(200)
        );
        assert_eq!(
            config.coordinator().circuit_auto_reset_after,
            Some(Duration::from_secs(60))
        );
        assert_eq!(config.prefetch().stagger, Duration::from_secs(3));
    }

    #[test]
    fn test_defaults_match_component_defaults() {
        let file = ConfigFile::default();
        assert_eq!(file.to_cache_config(), CacheConfig::default());
        assert_eq!(file.to_coordinator_config(), CoordinatorConfig::default());
        assert_eq!(file.to_prefetch_config(), PrefetchConfig::default());
        assert_eq!(file.to_provider_config().retry, RetryPolicy::default());
    }
}
