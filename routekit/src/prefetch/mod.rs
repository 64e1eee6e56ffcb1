//! Multi-modal prefetch.
//!
//! Once the active mode of an (origin, destination) pair has resolved, the
//! remaining modes are resolved in the background so switching modes is
//! instant:
//!
//! ```text
//! t = 0          resolve(walking)      ─┐
//! t = stagger    resolve(bicycling)     ├─ one at a time, via the coordinator
//! t = 2*stagger  resolve(transit)      ─┘
//! ```
//!
//! Every request still goes through [`RouteCoordinator`](crate::coordinator::RouteCoordinator),
//! so the throttle, cache and breaker apply. Per-mode loading state is
//! observable through [`LoadingIndicators`].

mod config;
mod loading;
mod prefetcher;

pub use config::{PrefetchConfig, DEFAULT_PREFETCH_STAGGER};
pub use loading::{LoadingByMode, LoadingGuard, LoadingIndicators};
pub use prefetcher::{MultiModalPrefetcher, PrefetchReport};
