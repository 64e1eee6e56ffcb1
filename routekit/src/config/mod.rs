//! User configuration for RouteKit.
//!
//! Settings are read from `~/.routekit/config.ini` and converted into the
//! typed config structs each component takes:
//!
//! ```text
//! config.ini ──► ConfigFile ──► ServiceConfig
//!                               ├─ ProviderConfig (+ RetryPolicy)
//!                               ├─ CacheConfig
//!                               ├─ CoordinatorConfig
//!                               └─ PrefetchConfig
//! ```
//!
//! # Example
//!
//! ```no_run
//! use routekit::config::ConfigFile;
//!
//! let file = ConfigFile::load()?;
//! let config = file.to_service_config();
//! # Ok::<(), routekit::config::ConfigFileError>(())
//! ```

mod convert;
mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use convert::resolve_api_key;
pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::*;
