//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use routekit::config::{ConfigFileError, API_KEY_ENV_VAR};
use routekit::coordinator::RouteError;
use routekit::route::RouteErrorKind;
use routekit::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to create service
    ServiceCreation(ServiceError),
    /// Route request failed
    Route(RouteError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Failed to render output
    Output(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Route(RouteError::AccessDenied { kind, .. }) => {
                eprintln!();
                if *kind == RouteErrorKind::ApiKeyMissing {
                    eprintln!("No OpenRouteService API key is configured. Either:");
                } else {
                    eprintln!("OpenRouteService rejected the API key. Check that it is valid, then either:");
                }
                eprintln!("  1. Run: routekit config set provider.api_key <KEY>");
                eprintln!("  2. Export {}=<KEY>", API_KEY_ENV_VAR);
                eprintln!("  3. Pass --api-key <KEY>");
            }
            CliError::Route(RouteError::ServiceBlocked { .. }) => {
                eprintln!();
                eprintln!("Routing is suspended after an access error in this session.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Use 'routekit config list' to see available keys.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ServiceCreation(e) => write!(f, "Failed to create service: {}", e),
            CliError::Route(e) => write!(f, "Route request failed: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Output(e) => write!(f, "Failed to render output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ServiceCreation(e) => Some(e),
            CliError::Route(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::ServiceCreation(e)
    }
}

impl From<RouteError> for CliError {
    fn from(e: RouteError) -> Self {
        CliError::Route(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}
