//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::defaults::API_KEY_ENV_VAR;
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let api_key = config.provider.api_key.as_deref().unwrap_or("");
    let auto_reset = config
        .coordinator
        .circuit_auto_reset_secs
        .map(|secs| secs.to_string())
        .unwrap_or_default();

    format!(
        r#"[provider]
; OpenRouteService API key
; Get one at: https://openrouteservice.org/dev/#/signup
; If empty, the {} environment variable is used
api_key = {}
; Directions API base URL
base_url = {}
; Timeout in seconds for a single request attempt (default: 15)
timeout_secs = {}

[retry]
; Retries after the first attempt when the provider answers 503 (default: 2)
max_retries = {}
; Pause between attempts in milliseconds (default: 1000)
backoff_ms = {}

[cache]
; How long a resolved route stays fresh, in seconds (default: 300)
ttl_secs = {}
; Maximum number of cached routes; the oldest is evicted first (default: 40)
capacity = {}

[coordinator]
; Minimum spacing between provider requests in milliseconds (default: 1000)
min_interval_ms = {}
; After an access error all routing stops until reset.
; Set to resume automatically after this many seconds; empty means manual reset.
circuit_auto_reset_secs = {}

[prefetch]
; Resolve the other travel modes in the background after a route is shown
enabled = {}
; Spacing between successive mode prefetches in milliseconds (default: 1200)
stagger_ms = {}

[logging]
; Log file path
file = {}
"#,
        API_KEY_ENV_VAR,
        api_key,
        config.provider.base_url,
        config.provider.timeout_secs,
        config.retry.max_retries,
        config.retry.backoff_ms,
        config.cache.ttl_secs,
        config.cache.capacity,
        config.coordinator.min_interval_ms,
        auto_reset,
        config.prefetch.enabled,
        config.prefetch.stagger_ms,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_preserves_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.provider.api_key = Some("secret".to_string());
        config.cache.capacity = 12;
        config.coordinator.circuit_auto_reset_secs = Some(30);
        config.prefetch.enabled = false;
        config.logging.file = temp_dir.path().join("routekit.log");

        config.save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_default_written_without_key() {
        let content = to_config_string(&ConfigFile::default());
        assert!(content.contains("api_key = \n"));
        assert!(content.contains("circuit_auto_reset_secs = \n"));
        assert!(content.contains("capacity = 40"));
    }
}
