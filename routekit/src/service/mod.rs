//! High-level service facade for route requests.
//!
//! This module wires the provider, coordinator, cache and prefetcher
//! together, following the Facade pattern.
//!
//! # Example
//!
//! ```ignore
//! use routekit::service::{RouteService, ServiceConfig};
//! use routekit::provider::ProviderConfig;
//! use routekit::route::TravelMode;
//!
//! let config = ServiceConfig::builder()
//!     .provider(ProviderConfig::new(api_key))
//!     .build();
//!
//! let service = RouteService::from_config(config)?;
//! let route = service
//!     .request_route(origin, destination, TravelMode::Driving)
//!     .await?;
//! ```

mod builder;
mod config;
mod error;
mod facade;

pub use builder::{create_provider, validate_config, OrsProvider};
pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use error::ServiceError;
pub use facade::{RouteService, ServiceStats};
