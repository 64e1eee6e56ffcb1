//! Coordinate type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without validating it.
    ///
    /// Use [`Coordinate::validate`] before handing it to anything that talks
    /// to the network.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks that both components are finite and within range.
    pub fn validate(&self) -> Result<(), CoordError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(CoordError::NonFinite {
                lat: self.latitude,
                lon: self.longitude,
            });
        }
        if !(MIN_LAT..=MAX_LAT).contains(&self.latitude) {
            return Err(CoordError::InvalidLatitude(self.latitude));
        }
        if !(MIN_LON..=MAX_LON).contains(&self.longitude) {
            return Err(CoordError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }

    /// Returns true if [`Coordinate::validate`] would succeed.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Returns true if both axes differ by no more than `tolerance` degrees.
    #[inline]
    pub fn approx_eq(&self, other: &Coordinate, tolerance: f64) -> bool {
        (self.latitude - other.latitude).abs() <= tolerance
            && (self.longitude - other.longitude).abs() <= tolerance
    }

    /// Linear interpolation on latitude/longitude.
    ///
    /// `t = 0.0` yields `self`, `t = 1.0` yields `other`. Good enough for the
    /// short, city-scale distances routes are requested over; it is not a
    /// great-circle interpolation.
    #[inline]
    pub fn lerp(&self, other: &Coordinate, t: f64) -> Coordinate {
        Coordinate {
            latitude: self.latitude + (other.latitude - self.latitude) * t,
            longitude: self.longitude + (other.longitude - self.longitude) * t,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Errors raised by coordinate validation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordError {
    /// NaN or infinite component
    #[error("Non-finite coordinate ({lat}, {lon})")]
    NonFinite { lat: f64, lon: f64 },

    /// Latitude outside -90..=90
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude outside -180..=180
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}
