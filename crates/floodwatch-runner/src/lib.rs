//! # floodwatch-runner
//!
//! Front end for the flood-risk assessment pipeline: turns map clicks into
//! assessment requests and shows whichever result lands last.
//!
//! - [`selector`]: the location selector ([`MapClick`] to request task)
//! - [`board`]: the display surface holding the current assessment
//! - [`render`]: terminal and JSON output
//! - [`config`]: YAML configuration with command-line overrides
//! - [`logging`]: tracing subscriber setup

pub mod board;
pub mod config;
mod error;
pub mod logging;
pub mod render;
pub mod selector;

pub use board::{AssessmentBoard, DisplayedAssessment};
pub use config::{FloodwatchConfig, Overrides};
pub use error::RunnerError;
pub use selector::{ClickHandle, LocationSelector, MapClick};

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;
