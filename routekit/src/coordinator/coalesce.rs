//! Single-flight registry for route requests.
//!
//! When several callers ask for the same fingerprint at once, only the first
//! (the leader) does the work; the rest subscribe to its outcome.
//!
//! ```text
//! resolve A ─┐
//!            │                              Provider
//! resolve B ─┼──► InFlightRegistry ───────► (one call)
//!            │        │                        │
//! resolve C ─┘        ▼                        ▼
//!               [B, C subscribe]◄──── leader broadcasts outcome
//! ```
//!
//! A leader that goes away without completing (its future was dropped or
//! its caller cancelled) closes the channel; followers see `Closed` and
//! start over.

use super::error::RouteError;
use crate::route::{RequestFingerprint, RouteResult};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What a leader hands its followers.
pub type ResolveOutcome = Result<RouteResult, RouteError>;

#[derive(Debug)]
struct InFlightEntry {
    sender: broadcast::Sender<ResolveOutcome>,
    cancel: CancellationToken,
}

/// Statistics for monitoring coalescing effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoalescerStats {
    /// Registrations that became leaders
    pub leaders: u64,
    /// Registrations that joined an existing leader
    pub coalesced: u64,
    /// Leaders dropped without completing
    pub abandoned: u64,
}

impl CoalescerStats {
    /// Returns the coalescing ratio (0.0 to 1.0)
    pub fn coalescing_ratio(&self) -> f64 {
        let total = self.leaders + self.coalesced;
        if total == 0 {
            0.0
        } else {
            self.coalesced as f64 / total as f64
        }
    }
}

/// Fingerprints currently being resolved.
#[derive(Debug, Default)]
pub struct InFlightRegistry {
    entries: DashMap<RequestFingerprint, InFlightEntry>,
    leaders: AtomicU64,
    coalesced: AtomicU64,
    abandoned: AtomicU64,
}

/// Result of [`InFlightRegistry::register`].
#[derive(Debug)]
pub enum Registration<'a> {
    /// Caller must resolve and then call [`InFlightGuard::complete`].
    Leader(InFlightGuard<'a>),
    /// Caller waits on this receiver.
    Follower(broadcast::Receiver<ResolveOutcome>),
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the in-flight resolution of `fingerprint`, or starts one.
    pub fn register(&self, fingerprint: RequestFingerprint) -> Registration<'_> {
        match self.entries.entry(fingerprint) {
            Entry::Occupied(entry) => {
                self.coalesced.fetch_add(1, Ordering::Relaxed);
                debug!(fingerprint = %fingerprint, "Joining in-flight route request");
                Registration::Follower(entry.get().sender.subscribe())
            }
            Entry::Vacant(slot) => {
                // One message per channel
                let (sender, _) = broadcast::channel(1);
                let cancel = CancellationToken::new();
                slot.insert(InFlightEntry {
                    sender: sender.clone(),
                    cancel: cancel.clone(),
                });
                self.leaders.fetch_add(1, Ordering::Relaxed);
                Registration::Leader(InFlightGuard {
                    registry: self,
                    fingerprint,
                    sender,
                    cancel,
                    completed: false,
                })
            }
        }
    }

    /// Cancels the in-flight resolution of `fingerprint`.
    ///
    /// Returns `false` if nothing was in flight.
    pub fn cancel(&self, fingerprint: &RequestFingerprint) -> bool {
        match self.entries.get(fingerprint) {
            Some(entry) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// True if `fingerprint` is being resolved.
    pub fn contains(&self, fingerprint: &RequestFingerprint) -> bool {
        self.entries.contains_key(fingerprint)
    }

    /// Returns the number of currently in-flight requests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CoalescerStats {
        CoalescerStats {
            leaders: self.leaders.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
        }
    }

    fn remove_own(&self, fingerprint: &RequestFingerprint, sender: &broadcast::Sender<ResolveOutcome>) {
        self.entries
            .remove_if(fingerprint, |_, entry| entry.sender.same_channel(sender));
    }
}

/// Leadership of one in-flight fingerprint.
///
/// Dropping the guard without calling [`complete`](Self::complete) abandons
/// the request: the entry is removed and followers retry.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    registry: &'a InFlightRegistry,
    fingerprint: RequestFingerprint,
    sender: broadcast::Sender<ResolveOutcome>,
    cancel: CancellationToken,
    completed: bool,
}

impl InFlightGuard<'_> {
    /// Token fired by [`InFlightRegistry::cancel`].
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn fingerprint(&self) -> RequestFingerprint {
        self.fingerprint
    }

    /// Removes the entry and hands `outcome` to every follower.
    pub fn complete(mut self, outcome: ResolveOutcome) {
        self.registry.remove_own(&self.fingerprint, &self.sender);
        let waiters = self.sender.receiver_count();
        // No receivers is fine
        let _ = self.sender.send(outcome);
        if waiters > 0 {
            debug!(
                fingerprint = %self.fingerprint,
                waiters = waiters,
                "Broadcast route outcome to coalesced waiters"
            );
        }
        self.completed = true;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.registry.remove_own(&self.fingerprint, &self.sender);
            self.registry.abandoned.fetch_add(1, Ordering::Relaxed);
            debug!(fingerprint = %self.fingerprint, "In-flight route request abandoned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::route::{RouteRequest, TravelMode};
    use std::sync::Arc;
    use tokio::sync::broadcast::error::RecvError;

    fn fingerprint(mode: TravelMode) -> RequestFingerprint {
        RouteRequest::new(Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0), mode).fingerprint()
    }

    fn result() -> RouteResult {
        RouteResult {
            coordinates: vec![Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)],
            distance_km: 300.0,
            duration_min: 360.0,
            is_approximate: false,
            mode: TravelMode::Driving,
            traffic_load: vec![0, 0],
            error: None,
        }
    }

    #[test]
    fn test_first_registration_leads() {
        let registry = InFlightRegistry::new();
        let first = registry.register(fingerprint(TravelMode::Driving));
        assert!(matches!(first, Registration::Leader(_)));
        assert!(registry.contains(&fingerprint(TravelMode::Driving)));
    }

    #[test]
    fn test_second_registration_follows() {
        let registry = InFlightRegistry::new();
        let _leader = registry.register(fingerprint(TravelMode::Driving));
        let second = registry.register(fingerprint(TravelMode::Driving));
        assert!(matches!(second, Registration::Follower(_)));

        let other_mode = registry.register(fingerprint(TravelMode::Walking));
        assert!(matches!(other_mode, Registration::Leader(_)));
    }

    #[tokio::test]
    async fn test_followers_receive_outcome() {
        let registry = Arc::new(InFlightRegistry::new());
        let fp = fingerprint(TravelMode::Driving);

        let Registration::Leader(guard) = registry.register(fp) else {
            panic!("expected leader");
        };
        let mut receivers: Vec<_> = (0..3)
            .map(|_| match registry.register(fp) {
                Registration::Follower(rx) => rx,
                Registration::Leader(_) => panic!("expected follower"),
            })
            .collect();

        guard.complete(Ok(result()));
        assert!(!registry.contains(&fp));

        for rx in receivers.iter_mut() {
            let outcome = rx.recv().await.unwrap();
            assert_eq!(outcome.unwrap().distance_km, 300.0);
        }
        assert_eq!(registry.stats().coalesced, 3);
    }

    #[tokio::test]
    async fn test_dropped_leader_closes_channel() {
        let registry = InFlightRegistry::new();
        let fp = fingerprint(TravelMode::Driving);

        let leader = registry.register(fp);
        let Registration::Follower(mut rx) = registry.register(fp) else {
            panic!("expected follower");
        };

        drop(leader);
        assert!(matches!(rx.recv().await, Err(RecvError::Closed)));
        assert!(!registry.contains(&fp));
        assert_eq!(registry.stats().abandoned, 1);

        // Next caller leads again
        assert!(matches!(registry.register(fp), Registration::Leader(_)));
    }

    #[test]
    fn test_cancel_fires_leader_token() {
        let registry = InFlightRegistry::new();
        let fp = fingerprint(TravelMode::Driving);
        assert!(!registry.cancel(&fp));

        let Registration::Leader(guard) = registry.register(fp) else {
            panic!("expected leader");
        };
        assert!(registry.cancel(&fp));
        assert!(guard.token().is_cancelled());
    }

    #[test]
    fn test_stale_guard_does_not_remove_newer_entry() {
        let registry = InFlightRegistry::new();
        let fp = fingerprint(TravelMode::Driving);

        let Registration::Leader(first) = registry.register(fp) else {
            panic!("expected leader");
        };
        first.complete(Ok(result()));

        let Registration::Leader(_second) = registry.register(fp) else {
            panic!("expected leader");
        };
        // A completed guard is gone; the new entry must survive
        assert!(registry.contains(&fp));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_coalescing_ratio() {
        let stats = CoalescerStats {
            leaders: 1,
            coalesced: 9,
            abandoned: 0,
        };
        assert!((stats.coalescing_ratio() - 0.9).abs() < f64::EPSILON);
    }
}
