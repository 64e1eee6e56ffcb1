//! Minimum spacing between provider requests.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Default minimum interval between two accepted requests.
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Global request throttle.
///
/// Only accepted requests are recorded; accepted requests are at least
/// `min_interval` apart regardless of fingerprint. A caller that stops
/// waiting before it is accepted leaves no trace.
#[derive(Debug)]
pub struct RequestThrottle {
    min_interval: Duration,
    last_accepted: Mutex<Option<Instant>>,
}

impl Default for RequestThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_REQUEST_INTERVAL)
    }
}

impl RequestThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: Mutex::new(None),
        }
    }

    /// Accepts a request now if the interval has elapsed since the last
    /// accepted one. Otherwise returns the earliest instant to try again.
    pub fn try_accept(&self) -> Result<(), Instant> {
        let now = Instant::now();
        let mut last = self.last_accepted.lock();
        match *last {
            Some(prev) if prev + self.min_interval > now => Err(prev + self.min_interval),
            _ => {
                *last = Some(now);
                Ok(())
            }
        }
    }

    /// Waits until a request is accepted.
    ///
    /// Cancel-safe: dropping the future before it resolves does not
    /// consume a slot.
    pub async fn acquire(&self) {
        loop {
            match self.try_accept() {
                Ok(()) => return,
                Err(at) => {
                    trace!(
                        delay_ms = (at - Instant::now()).as_millis() as u64,
                        "Request throttled"
                    );
                    tokio::time::sleep_until(at).await;
                }
            }
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
