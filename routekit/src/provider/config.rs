//! Directions provider configuration.

use super::ors::DEFAULT_BASE_URL;
use super::retry::RetryPolicy;
use std::fmt;
use std::time::Duration;

/// Hard limit on a single request attempt.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Settings for [`DirectionsClient`](super::DirectionsClient).
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// API key; empty means unconfigured
    pub api_key: String,
    pub base_url: String,
    /// Per-attempt timeout
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl ProviderConfig {
    /// Default settings with `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// True if a non-blank API key is set.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// Keeps the key out of logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &if self.has_api_key() { "<set>" } else { "<unset>" })
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.base_url, "https://api.openrouteservice.org");
        assert!(!config.has_api_key());
        assert!(!ProviderConfig::new("   ").has_api_key());
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", ProviderConfig::new("secret-key"));
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<set>"));
    }
}
