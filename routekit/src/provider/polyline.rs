//! Encoded polyline codec (precision 5).
//!
//! Each coordinate is stored as the delta from the previous one, scaled by
//! 1e5, zig-zag encoded and split into 5-bit chunks offset by 63 so the
//! output is printable ASCII.

use crate::geo::Coordinate;
use thiserror::Error;

const PRECISION: f64 = 1e5;

/// Errors raised while decoding a polyline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// Byte outside the `?`..`~` alphabet
    #[error("Invalid polyline character {byte:#04x} at offset {offset}")]
    InvalidCharacter { byte: u8, offset: usize },

    /// Input ended in the middle of a value or between lat and lng
    #[error("Polyline truncated at offset {0}")]
    Truncated(usize),

    /// A value or running total that does not fit in 64 bits
    #[error("Polyline value overflows at offset {0}")]
    Overflow(usize),
}

/// Decodes `encoded` into coordinates.
///
/// ```
/// use routekit::provider::polyline;
///
/// let points = polyline::decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
/// assert_eq!(points.len(), 3);
/// assert!((points[0].latitude - 38.5).abs() < 1e-9);
/// ```
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::with_capacity(bytes.len() / 4);
    let mut offset = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while offset < bytes.len() {
        lat = accumulate(lat, next_value(bytes, &mut offset)?, offset)?;
        if offset >= bytes.len() {
            return Err(PolylineError::Truncated(offset));
        }
        lng = accumulate(lng, next_value(bytes, &mut offset)?, offset)?;
        points.push(Coordinate::new(
            lat as f64 / PRECISION,
            lng as f64 / PRECISION,
        ));
    }

    Ok(points)
}

fn accumulate(total: i64, delta: i64, offset: usize) -> Result<i64, PolylineError> {
    total
        .checked_add(delta)
        .ok_or(PolylineError::Overflow(offset))
}

fn next_value(bytes: &[u8], offset: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(PolylineError::Truncated(*offset));
        };
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                byte,
                offset: *offset,
            });
        }
        if shift > 60 {
            return Err(PolylineError::Overflow(*offset));
        }
        *offset += 1;

        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encodes coordinates at precision 5.
pub fn encode(points: &[Coordinate]) -> String {
    let mut out = String::with_capacity(points.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.latitude * PRECISION).round() as i64;
        let lng = (point.longitude * PRECISION).round() as i64;
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn push_value(out: &mut String, delta: i64) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= 0x20 {
        out.push(char::from(((0x20 | (value & 0x1f)) + 63) as u8));
        value >>= 5;
    }
    out.push(char::from((value + 63) as u8));
}
