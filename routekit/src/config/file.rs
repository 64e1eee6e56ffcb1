//! Reading and writing `~/.routekit/config.ini`.
//!
//! A missing file is not an error: every setting has a default.

use ini::Ini;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::parser::parse_ini;
use super::settings::ConfigFile;
use super::writer::to_config_string;

const CONFIG_DIR_NAME: &str = ".routekit";
const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors loading or saving `config.ini`.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but could not be read or is not INI
    #[error("Cannot read config.ini: {0}")]
    ReadError(#[from] ini::Error),

    #[error("Cannot write config.ini: {0}")]
    WriteError(String),

    /// A setting is present but unusable
    #[error("Invalid setting {section}.{key} = '{value}': {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Cannot create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Settings from `~/.routekit/config.ini`, or defaults if it is absent.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Settings from `path`, or defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        match path.try_exists() {
            Ok(true) => parse_ini(&Ini::load_from_file(path)?),
            _ => Ok(Self::default()),
        }
    }

    /// Writes to `~/.routekit/config.ini`.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Writes to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(ConfigFileError::DirectoryError)?;
        }

        fs::write(path, to_config_string(self))
            .map_err(|e| ConfigFileError::WriteError(format!("{}: {}", path.display(), e)))
    }

    /// Writes the defaults to `~/.routekit/config.ini` unless it exists.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        Self::ensure_exists_at(&path)?;
        Ok(path)
    }

    /// Create a default config file at `path` if it doesn't exist.
    ///
    /// Returns `true` if a file was written.
    pub fn ensure_exists_at(path: &Path) -> Result<bool, ConfigFileError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }
}

/// `~/.routekit`, or `./.routekit` without a home directory.
pub fn config_directory() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_default();
    home.join(CONFIG_DIR_NAME)
}

/// `~/.routekit/config.ini`.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();

        assert!(config.provider.api_key.is_none());
        assert_eq!(config.provider.base_url, "https://api.openrouteservice.org");
        assert_eq!(config.provider.timeout_secs, 15);
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.backoff_ms, 1000);
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.cache.capacity, 40);
        assert_eq!(config.coordinator.min_interval_ms, 1000);
        assert!(config.coordinator.circuit_auto_reset_secs.is_none());
        assert_eq!(config.prefetch.stagger_ms, 1200);
        assert!(config.logging.file.ends_with(DEFAULT_LOG_FILE_NAME));
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let loaded = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(loaded, ConfigFile::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.cache.capacity = 12;
        config.prefetch.enabled = false;
        config.save_to(&path).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_ensure_exists_at_writes_once() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        assert!(ConfigFile::ensure_exists_at(&config_path).unwrap());
        assert!(config_path.exists());
        assert!(!ConfigFile::ensure_exists_at(&config_path).unwrap());
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with(".routekit/config.ini"));
    }
}
