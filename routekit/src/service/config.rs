//! Service configuration types.

use crate::cache::CacheConfig;
use crate::coordinator::CoordinatorConfig;
use crate::events::DEFAULT_EVENT_CAPACITY;
use crate::prefetch::PrefetchConfig;
use crate::provider::ProviderConfig;

/// Configuration for the route service.
///
/// Combines the settings of every component the service wires together.
///
/// # Example
///
/// ```
/// use routekit::service::ServiceConfig;
/// use routekit::provider::ProviderConfig;
/// use routekit::prefetch::PrefetchConfig;
///
/// let config = ServiceConfig::builder()
///     .provider(ProviderConfig::new("my-key"))
///     .prefetch(PrefetchConfig::disabled())
///     .build();
///
/// assert!(config.provider().has_api_key());
/// assert!(!config.prefetch().enabled);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    provider: ProviderConfig,
    cache: CacheConfig,
    coordinator: CoordinatorConfig,
    prefetch: PrefetchConfig,
    /// Capacity of the event broadcast channel
    event_capacity: Option<usize>,
}

impl ServiceConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Get the directions provider configuration.
    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    /// Get the route cache configuration.
    pub fn cache(&self) -> &CacheConfig {
        &self.cache
    }

    /// Get the coordinator configuration.
    pub fn coordinator(&self) -> &CoordinatorConfig {
        &self.coordinator
    }

    /// Get the prefetch configuration.
    pub fn prefetch(&self) -> &PrefetchConfig {
        &self.prefetch
    }

    /// Get the event channel capacity.
    pub fn event_capacity(&self) -> usize {
        self.event_capacity.unwrap_or(DEFAULT_EVENT_CAPACITY)
    }
}

/// Builder for ServiceConfig.
///
/// Unset values fall back to each component's defaults.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfigBuilder {
    provider: Option<ProviderConfig>,
    cache: Option<CacheConfig>,
    coordinator: Option<CoordinatorConfig>,
    prefetch: Option<PrefetchConfig>,
    event_capacity: Option<usize>,
}

impl ServiceConfigBuilder {
    /// Set the directions provider configuration.
    pub fn provider(mut self, config: ProviderConfig) -> Self {
        self.provider = Some(config);
        self
    }

    /// Set the route cache configuration.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = Some(config);
        self
    }

    /// Set the coordinator configuration.
    pub fn coordinator(mut self, config: CoordinatorConfig) -> Self {
        self.coordinator = Some(config);
        self
    }

    /// Set the prefetch configuration.
    pub fn prefetch(mut self, config: PrefetchConfig) -> Self {
        self.prefetch = Some(config);
        self
    }

    /// Set the event channel capacity.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Build the configuration with defaults for unset values.
    pub fn build(self) -> ServiceConfig {
        ServiceConfig {
            provider: self.provider.unwrap_or_default(),
            cache: self.cache.unwrap_or_default(),
            coordinator: self.coordinator.unwrap_or_default(),
            prefetch: self.prefetch.unwrap_or_default(),
            event_capacity: self.event_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert!(!config.provider().has_api_key());
        assert_eq!(config.cache().capacity, 40);
        assert_eq!(config.cache().ttl, Duration::from_secs(300));
        assert_eq!(
            config.coordinator().min_request_interval,
            Duration::from_secs(1)
        );
        assert!(config.prefetch().enabled);
        assert_eq!(config.event_capacity(), DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ServiceConfig::builder()
            .cache(CacheConfig::default().with_capacity(10))
            .coordinator(
                CoordinatorConfig::default()
                    .with_min_request_interval(Duration::from_millis(250)),
            )
            .event_capacity(8)
            .build();

        assert_eq!(config.cache().capacity, 10);
        assert_eq!(
            config.coordinator().min_request_interval,
            Duration::from_millis(250)
        );
        assert_eq!(config.event_capacity(), 8);
        assert!(config.prefetch().enabled);
    }
}
