//! Error types for the runner.

use floodwatch_common::CoordinateError;
use floodwatch_predict::PredictError;
use thiserror::Error;

/// Errors that abort the command-line front end.
///
/// None of these come from the assessment pipeline itself, which always
/// produces an assessment; they cover setup and user input.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// I/O error reading a config or click file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML config file does not parse.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// The requester could not be set up.
    #[error(transparent)]
    Predict(#[from] PredictError),

    /// A coordinate given on the command line is invalid.
    #[error("Invalid coordinate: {0}")]
    Coordinate(#[from] CoordinateError),

    /// A line in a click file is not `lat,lon`.
    #[error("Invalid click on line {line}: {reason}")]
    InvalidClickLine {
        /// 1-based line number.
        line: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// The tracing subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
