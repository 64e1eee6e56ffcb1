//! RouteKit - Multi-modal route resolution for map clients
//!
//! This library turns (origin, destination, travel mode) requests into
//! drawable routes. It sits between a map UI and a rate-limited directions
//! provider (OpenRouteService) and takes care of caching, request
//! deduplication, throttling, retry, a circuit breaker for access errors,
//! a straight-line fallback, and background prefetch of the other travel
//! modes.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use routekit::config::ConfigFile;
//! use routekit::route::TravelMode;
//! use routekit::service::RouteService;
//!
//! let config = ConfigFile::load()?.to_service_config();
//! let service = RouteService::from_config(config)?;
//!
//! let route = service
//!     .request_route(origin, destination, TravelMode::Walking)
//!     .await?;
//! ```

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod events;
pub mod fallback;
pub mod geo;
pub mod logging;
pub mod prefetch;
pub mod provider;
pub mod route;
pub mod service;
pub mod time;

/// Version of the RouteKit library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
