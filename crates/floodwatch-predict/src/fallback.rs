//! Demo-mode assessment synthesis.
//!
//! When the prediction service is unavailable the requester substitutes a
//! locally generated assessment: a uniformly drawn risk label and five
//! independently drawn readings, each uniform over a fixed plausible range.

use crate::{PredictError, Result};
use floodwatch_common::{Coordinate, EnvironmentalReading, RiskAssessment, RiskLevel};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A closed interval a fallback reading is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl ValueRange {
    /// Create a range. Not validated until [`FallbackRanges::validate`].
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check whether a value lies within the range (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        let ordered = self.min.is_finite() && self.max.is_finite() && self.min <= self.max;
        if !ordered || self.min < 0.0 {
            return Err(PredictError::InvalidFallbackRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Uniform draw from `min..max`. Degenerate, reversed or non-finite
    /// ranges yield `min`.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min.is_finite() && self.max.is_finite() && self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// Ranges for each of the five fallback readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackRanges {
    /// Rainfall in millimetres.
    pub rainfall: ValueRange,
    /// Elevation in metres.
    pub elevation: ValueRange,
    /// Soil moisture in percent.
    pub soil_moisture: ValueRange,
    /// Water level in metres.
    pub water_level: ValueRange,
    /// River distance in kilometres.
    pub river_distance: ValueRange,
}

impl Default for FallbackRanges {
    fn default() -> Self {
        Self {
            rainfall: ValueRange::new(0.0, 150.0),
            elevation: ValueRange::new(0.0, 500.0),
            soil_moisture: ValueRange::new(0.0, 100.0),
            water_level: ValueRange::new(0.0, 10.0),
            river_distance: ValueRange::new(0.0, 50.0),
        }
    }
}

impl FallbackRanges {
    /// Check every range is finite, non-negative and ordered.
    pub fn validate(&self) -> Result<()> {
        self.rainfall.validate("rainfall")?;
        self.elevation.validate("elevation")?;
        self.soil_moisture.validate("soil_moisture")?;
        self.water_level.validate("water_level")?;
        self.river_distance.validate("river_distance")?;
        Ok(())
    }

    /// Check whether every reading falls inside its range.
    pub fn contains(&self, reading: &EnvironmentalReading) -> bool {
        self.rainfall.contains(reading.rainfall)
            && self.elevation.contains(reading.elevation)
            && self.soil_moisture.contains(reading.soil_moisture)
            && self.water_level.contains(reading.water_level)
            && self.river_distance.contains(reading.river_distance)
    }

    /// Draw one reading per field, independently.
    pub fn sample_reading<R: Rng + ?Sized>(&self, rng: &mut R) -> EnvironmentalReading {
        EnvironmentalReading {
            rainfall: self.rainfall.sample(rng),
            elevation: self.elevation.sample(rng),
            soil_moisture: self.soil_moisture.sample(rng),
            water_level: self.water_level.sample(rng),
            river_distance: self.river_distance.sample(rng),
        }
    }
}

/// Synthesize a demo assessment for `coordinate`.
///
/// The location is always the requested coordinate; only the risk label and
/// readings are random.
///
/// Never panics, even for ranges that would fail [`FallbackRanges::validate`]:
/// a range that cannot be sampled contributes its `min`.
pub fn synthesize<R: Rng + ?Sized>(
    coordinate: Coordinate,
    ranges: &FallbackRanges,
    rng: &mut R,
) -> RiskAssessment {
    let flood_risk = *RiskLevel::ALL.choose(rng).unwrap_or(&RiskLevel::Low);
    RiskAssessment {
        location: coordinate,
        environmental_data: ranges.sample_reading(rng),
        flood_risk,
    }
}
