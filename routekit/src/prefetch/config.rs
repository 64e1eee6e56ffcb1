//! Configuration for multi-modal prefetch.

use std::time::Duration;

/// Default spacing between prefetches of successive modes.
///
/// Slightly longer than the coordinator's minimum request interval so a
/// prefetch never competes with the request that triggered it.
pub const DEFAULT_PREFETCH_STAGGER: Duration = Duration::from_millis(1200);

/// Settings for [`MultiModalPrefetcher`](super::MultiModalPrefetcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchConfig {
    pub enabled: bool,
    /// The n-th remaining mode is requested `n * stagger` after the trigger
    pub stagger: Duration,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stagger: DEFAULT_PREFETCH_STAGGER,
        }
    }
}

impl PrefetchConfig {
    /// Prefetch switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }
}
