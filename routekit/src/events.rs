//! Route events for UI collaborators.
//!
//! The renderer and the loading chrome subscribe here instead of polling
//! the coordinator. Delivery is best effort: a subscriber that falls more
//! than the channel capacity behind skips ahead.

use crate::coordinator::RouteError;
use crate::route::{RequestFingerprint, RouteResult, TravelMode};
use tokio::sync::broadcast;
use tracing::trace;

/// Default event channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Something subscribers may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteEvent {
    /// A route is ready to draw.
    Resolved {
        fingerprint: RequestFingerprint,
        result: RouteResult,
        /// Came from a background prefetch rather than a user request
        prefetched: bool,
    },
    /// A user-facing resolve failed.
    Failed {
        fingerprint: RequestFingerprint,
        mode: TravelMode,
        error: RouteError,
    },
    /// The provider refused us; routing is suspended.
    CircuitOpened { reason: String },
    /// Routing is available again.
    CircuitReset,
}

/// Broadcast channel for [`RouteEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RouteEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// New subscription; sees events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RouteEvent> {
        self.sender.subscribe()
    }

    /// Publishes `event` and returns how many subscribers got it.
    pub fn publish(&self, event: RouteEvent) -> usize {
        match self.sender.send(event) {
            Ok(n) => n,
            Err(_) => {
                trace!("Route event dropped, no subscribers");
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
