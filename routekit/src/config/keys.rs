//! `section.key` access to settings for `routekit config get/set`.
//!
//! Each key validates incoming text with a small value specification before
//! it touches the [`ConfigFile`].

use std::str::FromStr;
use thiserror::Error;

use super::parser::{expand_tilde, optional_string, parse_bool};
use super::settings::ConfigFile;
use super::writer::path_to_string;

/// Errors from `ConfigKey` parsing and `set`.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// The value does not fit the key
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// A settable field of [`ConfigFile`], named `section.key` as in `config.ini`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ProviderApiKey,
    ProviderBaseUrl,
    ProviderTimeoutSecs,
    RetryMaxRetries,
    RetryBackoffMs,
    CacheTtlSecs,
    CacheCapacity,
    CoordinatorMinIntervalMs,
    CoordinatorCircuitAutoResetSecs,
    PrefetchEnabled,
    PrefetchStaggerMs,
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|key| key.name() == lower)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Get the canonical key name (e.g., "cache.ttl_secs").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::ProviderApiKey => "provider.api_key",
            ConfigKey::ProviderBaseUrl => "provider.base_url",
            ConfigKey::ProviderTimeoutSecs => "provider.timeout_secs",
            ConfigKey::RetryMaxRetries => "retry.max_retries",
            ConfigKey::RetryBackoffMs => "retry.backoff_ms",
            ConfigKey::CacheTtlSecs => "cache.ttl_secs",
            ConfigKey::CacheCapacity => "cache.capacity",
            ConfigKey::CoordinatorMinIntervalMs => "coordinator.min_interval_ms",
            ConfigKey::CoordinatorCircuitAutoResetSecs => "coordinator.circuit_auto_reset_secs",
            ConfigKey::PrefetchEnabled => "prefetch.enabled",
            ConfigKey::PrefetchStaggerMs => "prefetch.stagger_ms",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the section name (e.g., "cache").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "ttl_secs").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Whether `get` should mask the value.
    pub fn is_secret(&self) -> bool {
        matches!(self, ConfigKey::ProviderApiKey)
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ProviderApiKey => config.provider.api_key.clone().unwrap_or_default(),
            ConfigKey::ProviderBaseUrl => config.provider.base_url.clone(),
            ConfigKey::ProviderTimeoutSecs => config.provider.timeout_secs.to_string(),
            ConfigKey::RetryMaxRetries => config.retry.max_retries.to_string(),
            ConfigKey::RetryBackoffMs => config.retry.backoff_ms.to_string(),
            ConfigKey::CacheTtlSecs => config.cache.ttl_secs.to_string(),
            ConfigKey::CacheCapacity => config.cache.capacity.to_string(),
            ConfigKey::CoordinatorMinIntervalMs => config.coordinator.min_interval_ms.to_string(),
            ConfigKey::CoordinatorCircuitAutoResetSecs => config
                .coordinator
                .circuit_auto_reset_secs
                .map(|secs| secs.to_string())
                .unwrap_or_default(),
            ConfigKey::PrefetchEnabled => config.prefetch.enabled.to_string(),
            ConfigKey::PrefetchStaggerMs => config.prefetch.stagger_ms.to_string(),
            ConfigKey::LoggingFile => path_to_string(&config.logging.file),
        }
    }

    /// Set the value in a config file.
    ///
    /// Values that fail [`validate`](Self::validate) leave `config` untouched.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        self.validate(value)?;
        let value = value.trim();
        let invalid = |reason: &str| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: reason.to_string(),
        };
        let number = || value.parse::<u64>().map_err(|_| invalid("must be an integer"));

        match self {
            ConfigKey::ProviderApiKey => config.provider.api_key = optional_string(value),
            ConfigKey::ProviderBaseUrl => {
                config.provider.base_url = value.trim_end_matches('/').to_string();
            }
            ConfigKey::ProviderTimeoutSecs => config.provider.timeout_secs = number()?,
            ConfigKey::RetryMaxRetries => {
                config.retry.max_retries = value
                    .parse()
                    .map_err(|_| invalid("must be a non-negative integer"))?;
            }
            ConfigKey::RetryBackoffMs => config.retry.backoff_ms = number()?,
            ConfigKey::CacheTtlSecs => config.cache.ttl_secs = number()?,
            ConfigKey::CacheCapacity => {
                config.cache.capacity = value
                    .parse()
                    .map_err(|_| invalid("must be a positive integer"))?;
            }
            ConfigKey::CoordinatorMinIntervalMs => config.coordinator.min_interval_ms = number()?,
            ConfigKey::CoordinatorCircuitAutoResetSecs => {
                config.coordinator.circuit_auto_reset_secs = if value.is_empty() {
                    None
                } else {
                    Some(number()?).filter(|secs| *secs > 0)
                };
            }
            ConfigKey::PrefetchEnabled => config.prefetch.enabled = parse_bool(value),
            ConfigKey::PrefetchStaggerMs => config.prefetch.stagger_ms = number()?,
            ConfigKey::LoggingFile => config.logging.file = expand_tilde(value),
        }
        Ok(())
    }

    /// Checks `value` without applying it.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value.trim())
            .map_err(|reason| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason,
            })
    }

    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::ProviderApiKey => Box::new(AnyStringSpec),
            ConfigKey::ProviderBaseUrl => Box::new(UrlSpec),
            ConfigKey::ProviderTimeoutSecs => Box::new(PositiveIntegerSpec),
            ConfigKey::RetryMaxRetries => Box::new(NonNegativeIntegerSpec),
            ConfigKey::RetryBackoffMs => Box::new(NonNegativeIntegerSpec),
            ConfigKey::CacheTtlSecs => Box::new(PositiveIntegerSpec),
            ConfigKey::CacheCapacity => Box::new(PositiveIntegerSpec),
            ConfigKey::CoordinatorMinIntervalMs => Box::new(NonNegativeIntegerSpec),
            ConfigKey::CoordinatorCircuitAutoResetSecs => Box::new(OptionalIntegerSpec),
            ConfigKey::PrefetchEnabled => Box::new(BooleanSpec),
            ConfigKey::PrefetchStaggerMs => Box::new(NonNegativeIntegerSpec),
            ConfigKey::LoggingFile => Box::new(PathSpec),
        }
    }

    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ProviderApiKey,
            ConfigKey::ProviderBaseUrl,
            ConfigKey::ProviderTimeoutSecs,
            ConfigKey::RetryMaxRetries,
            ConfigKey::RetryBackoffMs,
            ConfigKey::CacheTtlSecs,
            ConfigKey::CacheCapacity,
            ConfigKey::CoordinatorMinIntervalMs,
            ConfigKey::CoordinatorCircuitAutoResetSecs,
            ConfigKey::PrefetchEnabled,
            ConfigKey::PrefetchStaggerMs,
            ConfigKey::LoggingFile,
        ]
    }
}

// ============================================================================
// Value specifications
// ============================================================================

/// A rule a raw value must satisfy; the error is shown to the user.
trait ValueSpecification {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

struct AnyStringSpec;

impl ValueSpecification for AnyStringSpec {
    fn is_satisfied_by(&self, _value: &str) -> Result<(), String> {
        Ok(())
    }
}

/// `1..`
struct PositiveIntegerSpec;

impl ValueSpecification for PositiveIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err("must be a positive integer".to_string()),
        }
    }
}

/// `0..`
struct NonNegativeIntegerSpec;

impl ValueSpecification for NonNegativeIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        value
            .parse::<u64>()
            .map(|_| ())
            .map_err(|_| "must be a non-negative integer".to_string())
    }
}

/// `0..`, or empty for "unset".
struct OptionalIntegerSpec;

impl ValueSpecification for OptionalIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Ok(());
        }
        value
            .parse::<u64>()
            .map(|_| ())
            .map_err(|_| "must be a non-negative integer or empty".to_string())
    }
}

struct BooleanSpec;

impl ValueSpecification for BooleanSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "false" | "yes" | "no" | "on" | "off" | "1" | "0" => Ok(()),
            _ => Err("expected true/false, yes/no, on/off or 1/0".to_string()),
        }
    }
}

struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("path must not be empty".to_string())
        } else {
            Ok(())
        }
    }
}

/// Absolute http(s) URL.
struct UrlSpec;

impl ValueSpecification for UrlSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(())
        } else {
            Err("expected an http:// or https:// URL".to_string())
        }
    }
}
