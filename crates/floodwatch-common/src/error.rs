//! Error types for the data model.

use thiserror::Error;

/// Errors that can occur when constructing a [`Coordinate`](crate::Coordinate).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude or longitude is NaN or infinite.
    #[error("Coordinate ({lat}, {lon}) is not finite")]
    NonFinite {
        /// Requested latitude.
        lat: f64,
        /// Requested longitude.
        lon: f64,
    },

    /// Latitude is outside [-90, 90].
    #[error("Latitude {0} out of range (must be -90 to 90)")]
    LatitudeOutOfRange(f64),

    /// Longitude is outside [-180, 180].
    #[error("Longitude {0} out of range (must be -180 to 180)")]
    LongitudeOutOfRange(f64),
}

/// A risk label that is not one of `Low`, `Medium` or `High`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown flood risk level {0:?} (expected Low, Medium or High)")]
pub struct UnknownRiskLevel(pub String);
