//! Per-mode loading indicators.

use crate::route::TravelMode;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// Which modes currently have a request outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingByMode([bool; 4]);

impl LoadingByMode {
    pub fn is_loading(&self, mode: TravelMode) -> bool {
        self.0[mode.index()]
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|&loading| loading)
    }

    /// Modes marked loading, in canonical order.
    pub fn modes(&self) -> impl Iterator<Item = TravelMode> + '_ {
        TravelMode::ALL
            .into_iter()
            .filter(move |mode| self.is_loading(*mode))
    }
}

impl Serialize for LoadingByMode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(TravelMode::ALL.len()))?;
        for mode in TravelMode::ALL {
            map.serialize_entry(mode.as_str(), &self.is_loading(mode))?;
        }
        map.end()
    }
}

#[derive(Debug)]
struct Shared {
    outstanding: Mutex<[usize; 4]>,
    sender: watch::Sender<LoadingByMode>,
}

/// Shared, observable [`LoadingByMode`].
///
/// Each mode counts its outstanding requests and reads as loading while
/// the count is non-zero. Cloning shares the same state.
#[derive(Debug, Clone)]
pub struct LoadingIndicators {
    shared: Arc<Shared>,
}

impl Default for LoadingIndicators {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingIndicators {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(LoadingByMode::default());
        Self {
            shared: Arc::new(Shared {
                outstanding: Mutex::new([0; 4]),
                sender,
            }),
        }
    }

    /// Marks one request for `mode` as outstanding until the guard drops.
    pub fn begin(&self, mode: TravelMode) -> LoadingGuard {
        self.adjust(mode, true);
        LoadingGuard {
            indicators: self.clone(),
            mode,
        }
    }

    /// Number of outstanding requests for `mode`.
    pub fn outstanding(&self, mode: TravelMode) -> usize {
        self.shared.outstanding.lock()[mode.index()]
    }

    /// Current snapshot.
    pub fn get(&self) -> LoadingByMode {
        *self.shared.sender.borrow()
    }

    /// Receiver notified on every change.
    pub fn watch(&self) -> watch::Receiver<LoadingByMode> {
        self.shared.sender.subscribe()
    }

    // Watchers are only woken when a mode flips between idle and loading.
    fn adjust(&self, mode: TravelMode, starting: bool) {
        let mut outstanding = self.shared.outstanding.lock();
        let count = &mut outstanding[mode.index()];
        if starting {
            *count += 1;
        } else {
            *count = count.saturating_sub(1);
        }
        let loading = *count > 0;

        self.shared.sender.send_if_modified(|state| {
            let slot = &mut state.0[mode.index()];
            if *slot == loading {
                false
            } else {
                *slot = loading;
                true
            }
        });
    }
}

/// One outstanding request for a mode; see [`LoadingIndicators::begin`].
#[derive(Debug)]
#[must_use = "the mode stops loading as soon as the guard is dropped"]
pub struct LoadingGuard {
    indicators: LoadingIndicators,
    mode: TravelMode,
}

impl LoadingGuard {
    pub fn mode(&self) -> TravelMode {
        self.mode
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.indicators.adjust(self.mode, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_and_drop() {
        let indicators = LoadingIndicators::new();
        assert!(!indicators.get().any());

        let guard = indicators.begin(TravelMode::Walking);
        let snapshot = indicators.get();
        assert!(snapshot.is_loading(TravelMode::Walking));
        assert!(!snapshot.is_loading(TravelMode::Driving));
        assert_eq!(snapshot.modes().collect::<Vec<_>>(), vec![TravelMode::Walking]);

        drop(guard);
        assert!(!indicators.get().any());
    }

    #[test]
    fn test_overlapping_requests_keep_mode_loading() {
        let indicators = LoadingIndicators::new();

        let first = indicators.begin(TravelMode::Walking);
        let second = indicators.begin(TravelMode::Walking);
        assert_eq!(indicators.outstanding(TravelMode::Walking), 2);

        drop(first);
        assert!(indicators.get().is_loading(TravelMode::Walking));

        drop(second);
        assert!(!indicators.get().is_loading(TravelMode::Walking));
        assert_eq!(indicators.outstanding(TravelMode::Walking), 0);
    }

    #[tokio::test]
    async fn test_watchers_see_flips_only() {
        let indicators = LoadingIndicators::new();
        let mut rx = indicators.watch();

        let first = indicators.begin(TravelMode::Transit);
        assert!(rx.has_changed().unwrap());
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading(TravelMode::Transit));

        let second = indicators.begin(TravelMode::Transit);
        drop(first);
        assert!(!rx.has_changed().unwrap());

        drop(second);
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_loading(TravelMode::Transit));
    }

    #[test]
    fn test_clones_share_state() {
        let a = LoadingIndicators::new();
        let b = a.clone();
        let _guard = a.begin(TravelMode::Bicycling);
        assert!(b.get().is_loading(TravelMode::Bicycling));
    }

    #[test]
    fn test_serializes_as_mode_map() {
        let indicators = LoadingIndicators::new();
        let _guard = indicators.begin(TravelMode::Driving);
        let json = serde_json::to_value(indicators.get()).unwrap();
        assert_eq!(json["driving"], true);
        assert_eq!(json["transit"], false);
    }
}
