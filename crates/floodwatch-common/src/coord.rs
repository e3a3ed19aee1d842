//! Geographic coordinates.

use crate::{CoordinateError, Result};
use serde::{Deserialize, Serialize};

/// Largest valid absolute latitude in degrees.
pub const MAX_LATITUDE: f64 = 90.0;

/// Largest valid absolute longitude in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// A validated (latitude, longitude) pair in degrees.
///
/// Fields are private so a `Coordinate` is always finite and in range.
/// Deserialization goes through [`Coordinate::new`], which means an
/// out-of-range location inside a JSON payload fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

/// Unvalidated wire form of a coordinate.
#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Create a coordinate, checking that both values are finite and in range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NonFinite {
                lat: latitude,
                lon: longitude,
            });
        }
        if latitude.abs() > MAX_LATITUDE {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if longitude.abs() > MAX_LONGITUDE {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees, -90 to +90.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, -180 to +180.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ns = if self.latitude < 0.0 { 'S' } else { 'N' };
        let ew = if self.longitude < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.4}°{}, {:.4}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}
