//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization and service creation to reduce
//! duplication across command handlers.

use crate::error::CliError;
use routekit::config::ConfigFile;
use routekit::logging::{init_logging, split_log_path, LoggingGuard};
use routekit::prefetch::PrefetchConfig;
use routekit::provider::ProviderConfig;
use routekit::service::{OrsProvider, RouteService, ServiceConfig};
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner with optional debug logging.
    ///
    /// Logs go to the configured file only; stdout is reserved for command
    /// output so it can be piped.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging unless RUST_LOG is set
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(&log_dir, &log_file, false, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("RouteKit v{}", routekit::VERSION);
        info!("RouteKit CLI: {} command", command);
    }

    /// Service configuration from the config file, with an optional API key override.
    ///
    /// Prefetch is disabled: the process exits before background work would finish.
    pub fn service_config(&self, api_key: Option<String>) -> ServiceConfig {
        let provider = match api_key {
            Some(key) => ProviderConfig {
                api_key: key,
                ..self.config.to_provider_config()
            },
            None => self.config.to_provider_config(),
        };

        ServiceConfig::builder()
            .provider(provider)
            .cache(self.config.to_cache_config())
            .coordinator(self.config.to_coordinator_config())
            .prefetch(PrefetchConfig::disabled())
            .build()
    }

    /// Create the OpenRouteService-backed service.
    pub fn create_service(
        &self,
        config: ServiceConfig,
    ) -> Result<RouteService<OrsProvider>, CliError> {
        RouteService::from_config(config)
            .map_err(CliError::ServiceCreation)
            .inspect(|_| info!("Service created successfully"))
    }
}
