//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation. Values mirror the component defaults so an empty config
//! file behaves exactly like no config file.

use super::settings::*;
use crate::cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
use crate::coordinator::DEFAULT_MIN_REQUEST_INTERVAL;
use crate::prefetch::DEFAULT_PREFETCH_STAGGER;
use crate::provider::ors::DEFAULT_BASE_URL;
use crate::provider::{DEFAULT_BACKOFF, DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_TIMEOUT};

/// Environment variable consulted when `[provider] api_key` is empty.
pub const API_KEY_ENV_VAR: &str = "ORS_API_KEY";

/// Default per-attempt provider timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = DEFAULT_REQUEST_TIMEOUT.as_secs();

/// Default retry backoff in milliseconds.
pub const DEFAULT_BACKOFF_MS: u64 = DEFAULT_BACKOFF.as_millis() as u64;

/// Default cache TTL in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = DEFAULT_CACHE_TTL.as_secs();

/// Default minimum request interval in milliseconds.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = DEFAULT_MIN_REQUEST_INTERVAL.as_millis() as u64;

/// Default prefetch stagger in milliseconds.
pub const DEFAULT_STAGGER_MS: u64 = DEFAULT_PREFETCH_STAGGER.as_millis() as u64;

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "routekit.log";

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            provider: ProviderSettings {
                api_key: None,
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            retry: RetrySettings {
                max_retries: DEFAULT_MAX_RETRIES,
                backoff_ms: DEFAULT_BACKOFF_MS,
            },
            cache: CacheSettings {
                ttl_secs: DEFAULT_CACHE_TTL_SECS,
                capacity: DEFAULT_CACHE_CAPACITY,
            },
            coordinator: CoordinatorSettings {
                min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
                circuit_auto_reset_secs: None,
            },
            prefetch: PrefetchSettings {
                enabled: true,
                stagger_ms: DEFAULT_STAGGER_MS,
            },
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
