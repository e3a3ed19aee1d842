//! # floodwatch-common
//!
//! Data model shared by the flood-risk assessment pipeline.
//!
//! A [`RiskAssessment`] bundles the [`Coordinate`] that was asked about, the
//! five-metric [`EnvironmentalReading`] for that spot and a [`RiskLevel`]
//! classification. The JSON shape of these types is the wire format of the
//! prediction service:
//!
//! ```json
//! {
//!   "location": { "latitude": 10.5, "longitude": 76.2 },
//!   "environmental_data": {
//!     "rainfall": 120, "elevation": 15, "soil_moisture": 80,
//!     "water_level": 3.2, "river_distance": 1.5
//!   },
//!   "flood_risk": "High"
//! }
//! ```
//!
//! ## Example
//!
//! ```
//! use floodwatch_common::{Coordinate, RiskLevel};
//!
//! let coord = Coordinate::new(10.5, 76.2)?;
//! assert_eq!(coord.latitude(), 10.5);
//! assert_eq!("High".parse::<RiskLevel>()?, RiskLevel::High);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod assessment;
mod coord;
mod error;

pub use assessment::{EnvironmentalReading, RiskAssessment, RiskLevel};
pub use coord::{Coordinate, MAX_LATITUDE, MAX_LONGITUDE};
pub use error::{CoordinateError, UnknownRiskLevel};

/// Result type for coordinate construction.
pub type Result<T> = std::result::Result<T, CoordinateError>;
