//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Directions provider settings
    pub provider: ProviderSettings,
    /// Retry behavior for transient provider failures
    pub retry: RetrySettings,
    /// Route cache settings
    pub cache: CacheSettings,
    /// Throttle and circuit breaker settings
    pub coordinator: CoordinatorSettings,
    /// Multi-modal prefetch settings
    pub prefetch: PrefetchSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Directions provider configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// OpenRouteService API key; `ORS_API_KEY` is used when unset
    pub api_key: Option<String>,
    /// Base URL of the directions API
    pub base_url: String,
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrySettings {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Pause between attempts in milliseconds
    pub backoff_ms: u64,
}

/// Route cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Entry time-to-live in seconds
    pub ttl_secs: u64,
    /// Maximum number of cached routes
    pub capacity: usize,
}

/// Coordinator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorSettings {
    /// Minimum spacing between provider requests in milliseconds
    pub min_interval_ms: u64,
    /// Close the breaker automatically after this many seconds.
    /// `None` keeps it open until reset.
    pub circuit_auto_reset_secs: Option<u64>,
}

/// Prefetch configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefetchSettings {
    /// Prefetch the other travel modes after a route resolves
    pub enabled: bool,
    /// Spacing between successive mode prefetches in milliseconds
    pub stagger_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
