//! Bounded, time-expiring route cache.
//!
//! Results are keyed by [`RequestFingerprint`](crate::route::RequestFingerprint).
//! Entries expire lazily after a TTL and the oldest insertion is evicted
//! once the entry count exceeds capacity.

mod config;
mod memory;
mod stats;

pub use config::{CacheConfig, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
pub use memory::RouteCache;
pub use stats::CacheStats;
