//! Travel modes and their per-mode constants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the route will be travelled.
///
/// The set is fixed. [`TravelMode::ALL`] gives the canonical order, which is
/// also the order the prefetcher walks the non-active modes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    /// Every mode in canonical order.
    pub const ALL: [TravelMode; 4] = [
        TravelMode::Driving,
        TravelMode::Walking,
        TravelMode::Bicycling,
        TravelMode::Transit,
    ];

    /// Nominal speed in km/h, used only to estimate durations when the
    /// provider gives none.
    pub fn nominal_speed_kmh(&self) -> f64 {
        match self {
            TravelMode::Driving => 50.0,
            TravelMode::Bicycling => 15.0,
            TravelMode::Walking => 5.0,
            TravelMode::Transit => 30.0,
        }
    }

    /// Lowercase identifier used in fingerprints, config and the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }

    /// Position in [`TravelMode::ALL`].
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            TravelMode::Driving => 0,
            TravelMode::Walking => 1,
            TravelMode::Bicycling => 2,
            TravelMode::Transit => 3,
        }
    }

    /// Whether synthetic traffic load applies to this mode.
    #[inline]
    pub fn has_traffic(&self) -> bool {
        matches!(self, TravelMode::Driving)
    }

    /// Every mode except `excluded`, in canonical order.
    pub fn others(excluded: TravelMode) -> impl Iterator<Item = TravelMode> {
        Self::ALL.into_iter().filter(move |m| *m != excluded)
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown travel mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown travel mode '{0}' (expected driving, walking, bicycling or transit)")]
pub struct ParseTravelModeError(pub String);

impl FromStr for TravelMode {
    type Err = ParseTravelModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "driving" | "drive" | "car" => Ok(TravelMode::Driving),
            "walking" | "walk" | "foot" => Ok(TravelMode::Walking),
            "bicycling" | "cycling" | "bike" => Ok(TravelMode::Bicycling),
            "transit" => Ok(TravelMode::Transit),
            _ => Err(ParseTravelModeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_speeds() {
        assert_eq!(TravelMode::Driving.nominal_speed_kmh(), 50.0);
        assert_eq!(TravelMode::Bicycling.nominal_speed_kmh(), 15.0);
        assert_eq!(TravelMode::Walking.nominal_speed_kmh(), 5.0);
        assert_eq!(TravelMode::Transit.nominal_speed_kmh(), 30.0);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, mode) in TravelMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }

    #[test]
    fn test_others_excludes_and_keeps_order() {
        let others: Vec<_> = TravelMode::others(TravelMode::Walking).collect();
        assert_eq!(
            others,
            vec![
                TravelMode::Driving,
                TravelMode::Bicycling,
                TravelMode::Transit
            ]
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("DRIVING".parse::<TravelMode>(), Ok(TravelMode::Driving));
        assert_eq!("cycling".parse::<TravelMode>(), Ok(TravelMode::Bicycling));
        assert_eq!(" walk ".parse::<TravelMode>(), Ok(TravelMode::Walking));
        assert!("teleport".parse::<TravelMode>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for mode in TravelMode::ALL {
            assert_eq!(mode.to_string().parse::<TravelMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_only_driving_has_traffic() {
        assert!(TravelMode::Driving.has_traffic());
        assert!(!TravelMode::Transit.has_traffic());
    }
}
