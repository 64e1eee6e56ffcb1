//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (init, get, set, list, path)
//! - [`route`] - Resolve a route and print it as JSON

pub mod config;
pub mod route;
