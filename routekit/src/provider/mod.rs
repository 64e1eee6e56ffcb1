//! Directions provider abstraction
//!
//! This module provides the [`RouteProvider`] trait and the
//! OpenRouteService-backed [`DirectionsClient`]. The HTTP transport sits
//! behind [`AsyncHttpClient`] so tests can script responses.
//!
//! ```ignore
//! use routekit::provider::{AsyncReqwestClient, DirectionsClient, ProviderConfig};
//!
//! let http = AsyncReqwestClient::new()?;
//! let client = DirectionsClient::new(http, ProviderConfig::new(api_key));
//! let route = client.fetch(&request, &CancellationToken::new()).await?;
//! ```

mod client;
mod config;
mod http;
pub mod ors;
pub mod polyline;
mod retry;
#[cfg(test)]
mod stub;
mod types;

pub use client::DirectionsClient;
pub use config::{ProviderConfig, DEFAULT_REQUEST_TIMEOUT};
pub use http::{AsyncHttpClient, AsyncReqwestClient, HttpResponse};
pub use polyline::PolylineError;
pub use retry::{RetryPolicy, DEFAULT_BACKOFF, DEFAULT_MAX_RETRIES};
pub use types::{ProviderError, RouteProvider};

#[cfg(test)]
pub use http::tests::{MockAsyncHttpClient, MockReply};
#[cfg(test)]
pub use stub::StubProvider;
