//! Scripted [`RouteProvider`] for unit tests.

use super::types::{ProviderError, RouteProvider};
use crate::route::{RouteRequest, RouteResult, TravelMode};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Answers every fetch the same way after `delay`, recording each call.
#[derive(Debug, Clone)]
pub struct StubProvider {
    reply: Result<(), ProviderError>,
    delay: Duration,
    calls: Arc<Mutex<Vec<(TravelMode, Instant)>>>,
}

impl StubProvider {
    pub fn ok() -> Self {
        Self {
            reply: Ok(()),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self {
            reply: Err(err),
            ..Self::ok()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().len()
    }

    /// Mode and start time of every fetch, in call order.
    pub fn call_log(&self) -> Vec<(TravelMode, Instant)> {
        self.calls.lock().clone()
    }
}

impl RouteProvider for StubProvider {
    async fn fetch(
        &self,
        request: &RouteRequest,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, ProviderError> {
        self.calls.lock().push((request.mode, Instant::now()));
        tokio::select! {
            _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
            _ = tokio::time::sleep(self.delay) => {}
        }
        self.reply.clone().map(|_| RouteResult {
            coordinates: request.points(),
            distance_km: 1.25,
            duration_min: 4.0,
            is_approximate: false,
            mode: request.mode,
            traffic_load: vec![0; request.points().len()],
            error: None,
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}
