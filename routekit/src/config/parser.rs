//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [provider] section
    if let Some(section) = ini.section(Some("provider")) {
        if let Some(v) = section.get("api_key") {
            config.provider.api_key = optional_string(v);
        }
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !v.starts_with("http://") && !v.starts_with("https://") {
                return Err(invalid(
                    "provider",
                    "base_url",
                    v,
                    "must be a URL starting with 'http://' or 'https://'",
                ));
            }
            config.provider.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = section.get("timeout_secs") {
            config.provider.timeout_secs = parse_positive(
                "provider",
                "timeout_secs",
                v,
                "must be a positive integer (seconds)",
            )?;
        }
    }

    // [retry] section
    if let Some(section) = ini.section(Some("retry")) {
        if let Some(v) = section.get("max_retries") {
            config.retry.max_retries = parse_number(
                "retry",
                "max_retries",
                v,
                "must be a non-negative integer",
            )?;
        }
        if let Some(v) = section.get("backoff_ms") {
            config.retry.backoff_ms = parse_number(
                "retry",
                "backoff_ms",
                v,
                "must be a non-negative integer (milliseconds)",
            )?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("ttl_secs") {
            config.cache.ttl_secs =
                parse_positive("cache", "ttl_secs", v, "must be a positive integer (seconds)")?;
        }
        if let Some(v) = section.get("capacity") {
            config.cache.capacity =
                parse_positive("cache", "capacity", v, "must be a positive integer")?;
        }
    }

    // [coordinator] section
    if let Some(section) = ini.section(Some("coordinator")) {
        if let Some(v) = section.get("min_interval_ms") {
            config.coordinator.min_interval_ms = parse_number(
                "coordinator",
                "min_interval_ms",
                v,
                "must be a non-negative integer (milliseconds)",
            )?;
        }
        if let Some(v) = section.get("circuit_auto_reset_secs") {
            // Empty or zero keeps the breaker open until reset
            config.coordinator.circuit_auto_reset_secs = if v.trim().is_empty() {
                None
            } else {
                let secs: u64 = parse_number(
                    "coordinator",
                    "circuit_auto_reset_secs",
                    v,
                    "must be a non-negative integer (seconds) or empty",
                )?;
                (secs > 0).then_some(secs)
            };
        }
    }

    // [prefetch] section
    if let Some(section) = ini.section(Some("prefetch")) {
        if let Some(v) = section.get("enabled") {
            config.prefetch.enabled = parse_bool(v);
        }
        if let Some(v) = section.get("stagger_ms") {
            config.prefetch.stagger_ms = parse_number(
                "prefetch",
                "stagger_ms",
                v,
                "must be a non-negative integer (milliseconds)",
            )?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive<T: FromStr + Default + PartialOrd>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    let parsed: T = parse_number(section, key, value, reason)?;
    if parsed > T::default() {
        Ok(parsed)
    } else {
        Err(invalid(section, key, value, reason))
    }
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Convert empty string to None, non-empty to Some.
pub(super) fn optional_string(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
