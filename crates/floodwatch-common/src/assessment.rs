//! Risk assessment types.

use crate::{Coordinate, UnknownRiskLevel};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Flood risk classification.
///
/// Serialized with the exact labels `Low`, `Medium` and `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Low flood risk.
    Low,
    /// Medium flood risk.
    Medium,
    /// High flood risk.
    High,
}

impl RiskLevel {
    /// All risk levels, in increasing order of severity.
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Returns the wire label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = UnknownRiskLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownRiskLevel(s.to_string()))
    }
}

/// The five environmental metrics reported for a location.
///
/// Values are passed through from the prediction service untouched; no
/// cross-field or sign constraints are enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalReading {
    /// Rainfall in millimetres.
    pub rainfall: f64,
    /// Elevation in metres.
    pub elevation: f64,
    /// Soil moisture in percent.
    pub soil_moisture: f64,
    /// Water level in metres.
    pub water_level: f64,
    /// Distance to the nearest river in kilometres.
    pub river_distance: f64,
}

impl EnvironmentalReading {
    /// Returns the readings as `(name, value, unit)` triples in display order.
    pub fn entries(&self) -> [(&'static str, f64, &'static str); 5] {
        [
            ("Rainfall", self.rainfall, "mm"),
            ("Elevation", self.elevation, "m"),
            ("Soil moisture", self.soil_moisture, "%"),
            ("Water level", self.water_level, "m"),
            ("River distance", self.river_distance, "km"),
        ]
    }
}

/// A flood-risk assessment for a single location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// The location the assessment is for.
    pub location: Coordinate,
    /// Environmental readings at the location.
    pub environmental_data: EnvironmentalReading,
    /// Risk classification.
    pub flood_risk: RiskLevel,
}
