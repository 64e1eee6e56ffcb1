//! In-memory route cache with TTL and oldest-insertion eviction.

use super::{CacheConfig, CacheStats};
use crate::route::{RequestFingerprint, RouteResult};
use crate::time::{Clock, SystemClock};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Entry in the route cache.
#[derive(Debug, Clone)]
struct CacheEntry {
    result: RouteResult,
    inserted_at_ms: u64,
    /// Monotonic insertion counter, breaks timestamp ties
    seq: u64,
}

impl CacheEntry {
    fn is_fresh(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.inserted_at_ms) < ttl_ms
    }

    fn age_key(&self) -> (u64, u64) {
        (self.inserted_at_ms, self.seq)
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<RequestFingerprint, CacheEntry>,
    next_seq: u64,
    stats: CacheStats,
}

impl Inner {
    fn evict_oldest(&mut self) -> Option<RequestFingerprint> {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.age_key())
            .map(|(key, _)| *key)?;
        self.entries.remove(&oldest);
        self.stats.evictions += 1;
        Some(oldest)
    }
}

/// Bounded, time-expiring cache of resolved routes.
///
/// Expired entries are misses but stay in the map until they are evicted,
/// overwritten or purged. Operations never fail.
#[derive(Debug)]
pub struct RouteCache {
    inner: Mutex<Inner>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl RouteCache {
    /// Creates a cache reading the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a cache reading `clock`.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            config,
            clock,
        }
    }

    /// Cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the cached result if it is younger than the TTL.
    pub fn get(&self, key: &RequestFingerprint) -> Option<RouteResult> {
        let now = self.clock.now_ms();
        let ttl = self.config.ttl_ms();
        let mut inner = self.inner.lock();

        let lookup = inner
            .entries
            .get(key)
            .map(|entry| entry.is_fresh(now, ttl).then(|| entry.result.clone()));

        match lookup {
            Some(Some(result)) => {
                inner.stats.hits += 1;
                trace!(fingerprint = %key, "Route cache hit");
                Some(result)
            }
            Some(None) => {
                inner.stats.misses += 1;
                inner.stats.expired += 1;
                trace!(fingerprint = %key, "Route cache entry expired");
                None
            }
            None => {
                inner.stats.misses += 1;
                None
            }
        }
    }

    /// Inserts or overwrites the result for `key`.
    ///
    /// Overwriting refreshes the insertion time. When the entry count exceeds
    /// capacity the oldest insertions are evicted.
    pub fn put(&self, key: RequestFingerprint, result: RouteResult) {
        let now = self.clock.now_ms();
        let capacity = self.config.effective_capacity();
        let mut inner = self.inner.lock();

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(
            key,
            CacheEntry {
                result,
                inserted_at_ms: now,
                seq,
            },
        );
        inner.stats.inserts += 1;

        while inner.entries.len() > capacity {
            match inner.evict_oldest() {
                Some(evicted) => debug!(fingerprint = %evicted, "Evicted route from cache"),
                None => break,
            }
        }
    }

    /// True if a fresh entry without an error is cached for `key`.
    ///
    /// Does not count towards hit/miss statistics.
    pub fn contains_usable(&self, key: &RequestFingerprint) -> bool {
        let now = self.clock.now_ms();
        let ttl = self.config.ttl_ms();
        self.inner
            .lock()
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_fresh(now, ttl) && entry.result.error.is_none())
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let ttl = self.config.ttl_ms();
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| entry.is_fresh(now, ttl));
        before - inner.entries.len()
    }

    /// Removes the entry for `key`, returning its result regardless of age.
    pub fn remove(&self, key: &RequestFingerprint) -> Option<RouteResult> {
        self.inner.lock().entries.remove(key).map(|e| e.result)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            entry_count: inner.entries.len(),
            ..inner.stats
        }
    }
}
