//! Directions client with timeout, retry and cancellation.

use super::config::ProviderConfig;
use super::http::{AsyncHttpClient, HttpResponse};
use super::ors::{self, DecodedRoute};
use super::types::{ProviderError, RouteProvider};
use crate::fallback::{estimate_duration_min, traffic_for_mode};
use crate::geo::path_length_km;
use crate::route::{RouteRequest, RouteResult};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const HTTP_UNAUTHORIZED: u16 = 401;
const HTTP_FORBIDDEN: u16 = 403;

/// OpenRouteService directions client.
///
/// One `fetch` issues up to [`RetryPolicy::max_attempts`] requests, each
/// bounded by the configured timeout. Only the statuses listed in the retry
/// policy are retried.
///
/// [`RetryPolicy::max_attempts`]: super::RetryPolicy::max_attempts
pub struct DirectionsClient<C: AsyncHttpClient> {
    http_client: C,
    config: ProviderConfig,
}

impl<C: AsyncHttpClient> DirectionsClient<C> {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `config` - Key, endpoint, timeout and retry policy
    pub fn new(http_client: C, config: ProviderConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Client configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn attempt(
        &self,
        url: &str,
        body: &str,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, ProviderError> {
        let headers = [("Authorization", self.config.api_key.as_str())];
        tokio::select! {
            biased;

            _ = cancel.cancelled() => Err(ProviderError::Cancelled),

            result = tokio::time::timeout(
                self.config.timeout,
                self.http_client.post_json(url, &headers, body),
            ) => match result {
                Ok(response) => response,
                Err(_) => Err(ProviderError::Timeout(self.config.timeout)),
            },
        }
    }

    fn build_result(
        &self,
        request: &RouteRequest,
        route: DecodedRoute,
    ) -> Result<RouteResult, ProviderError> {
        if route.coordinates.len() < 2 {
            return Err(ProviderError::EmptyResponse);
        }

        let has_summary = route.has_summary();
        let distance_km = route
            .distance_m
            .map(|m| m / 1000.0)
            .unwrap_or_else(|| path_length_km(&route.coordinates));
        let duration_min = route
            .duration_s
            .map(|s| s / 60.0)
            .unwrap_or_else(|| estimate_duration_min(distance_km, request.mode));

        let traffic_load = if has_summary {
            traffic_for_mode(request.mode, route.coordinates.len())
        } else {
            vec![0; route.coordinates.len()]
        };

        Ok(RouteResult {
            coordinates: route.coordinates,
            distance_km,
            duration_min,
            is_approximate: false,
            mode: request.mode,
            traffic_load,
            error: None,
        })
    }
}

impl<C: AsyncHttpClient> RouteProvider for DirectionsClient<C> {
    async fn fetch(
        &self,
        request: &RouteRequest,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, ProviderError> {
        request.validate()?;

        if request.is_same_point() {
            debug!(mode = %request.mode, "Origin equals destination, skipping provider");
            return Ok(RouteResult::same_point(request.mode));
        }

        if !self.config.has_api_key() {
            return Err(ProviderError::ApiKeyMissing);
        }

        let url = ors::directions_url(&self.config.base_url, request.mode);
        let body = ors::request_body(request)?;
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            attempt += 1;
            if cancel.is_cancelled() {
                return Err(ProviderError::Cancelled);
            }

            debug!(
                mode = %request.mode,
                attempt = attempt,
                max_attempts = retry.max_attempts(),
                "Requesting directions"
            );
            let response = self.attempt(&url, &body, cancel).await?;

            if response.is_success() {
                let route = ors::parse_response(&response.body)?;
                return self.build_result(request, route);
            }

            let status = response.status;
            if status == HTTP_UNAUTHORIZED || status == HTTP_FORBIDDEN {
                warn!(status = status, "Directions provider denied access");
                return Err(ProviderError::AccessDenied {
                    status,
                    message: response.body_snippet(),
                });
            }

            if !retry.should_retry(status, attempt) {
                warn!(
                    status = status,
                    attempt = attempt,
                    "Directions request failed"
                );
                return Err(ProviderError::Http {
                    status,
                    message: response.body_snippet(),
                });
            }

            warn!(
                status = status,
                attempt = attempt,
                backoff_ms = retry.backoff.as_millis() as u64,
                "Directions provider unavailable, retrying"
            );
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
                _ = tokio::time::sleep(retry.backoff) => {}
            }
        }
    }

    fn name(&self) -> &str {
        "OpenRouteService"
    }
}
