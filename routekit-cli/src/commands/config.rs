//! Configuration management CLI commands.
//!
//! Provides `config init`, `config get`, `config set`, `config list` and
//! `config path` for viewing and modifying settings from the command line.

use clap::Subcommand;
use routekit::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Create the configuration file with defaults if it does not exist
    Init,

    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., cache.ttl_secs)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., cache.ttl_secs)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List {
        /// Print secrets such as the API key instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init => run_init(),
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List { show_secrets } => run_list(show_secrets),
        ConfigCommands::Path => run_path(),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!("Unknown configuration key '{}'", key))
    })
}

/// Create the default configuration file.
fn run_init() -> Result<(), CliError> {
    let path = config_file_path();
    if ConfigFile::ensure_exists_at(&path)? {
        println!("Created {}", path.display());
    } else {
        println!("Configuration already exists at {}", path.display());
    }
    Ok(())
}

/// Get a configuration value.
fn run_get(key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let config = ConfigFile::load()?;
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

/// Set a configuration value.
fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let mut config = ConfigFile::load()?;
    config_key
        .set(&mut config, value)
        .map_err(|e| CliError::Config(e.to_string()))?;
    config.save()?;

    if config_key.is_secret() {
        println!("Set {}", config_key.name());
    } else {
        println!("Set {} = {}", config_key.name(), value);
    }

    Ok(())
}

/// List all configuration settings.
fn run_list(show_secrets: bool) -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        // Print section header when section changes
        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        println!("  {} = {}", key.key_name(), display_value(key, &config, show_secrets));
    }

    Ok(())
}

fn display_value(key: &ConfigKey, config: &ConfigFile, show_secrets: bool) -> String {
    let value = key.get(config);
    if value.is_empty() {
        "(not set)".to_string()
    } else if key.is_secret() && !show_secrets {
        "********".to_string()
    } else {
        value
    }
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("cache.ttl_secs").unwrap(), ConfigKey::CacheTtlSecs);
        assert!(matches!(parse_key("cache.nope"), Err(CliError::Config(_))));
    }

    #[test]
    fn test_display_value_masks_secrets() {
        let mut config = ConfigFile::default();
        assert_eq!(
            display_value(&ConfigKey::ProviderApiKey, &config, false),
            "(not set)"
        );

        config.provider.api_key = Some("abc123".to_string());
        assert_eq!(
            display_value(&ConfigKey::ProviderApiKey, &config, false),
            "********"
        );
        assert_eq!(
            display_value(&ConfigKey::ProviderApiKey, &config, true),
            "abc123"
        );
        assert_eq!(
            display_value(&ConfigKey::CacheCapacity, &config, false),
            "40"
        );
    }
}
