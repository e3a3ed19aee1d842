//! Error types for the prediction client.

use thiserror::Error;

/// Errors that can occur when setting up an [`AssessmentRequester`](crate::AssessmentRequester).
#[derive(Debug, Error)]
pub enum PredictError {
    /// The configured base URL cannot be used.
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// The URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A fallback range is not a finite, non-negative, ordered interval.
    #[error("Invalid fallback range for {field}: {min}..{max}")]
    InvalidFallbackRange {
        /// Name of the reading the range applies to.
        field: &'static str,
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// The prediction service did not produce a usable assessment.
///
/// HTTP error statuses, transport failures and malformed bodies all collapse
/// into this one condition. The reason is kept for logging only.
#[derive(Debug, Clone, Error)]
#[error("Assessment unavailable: {reason}")]
pub struct AssessmentUnavailable {
    reason: String,
}

impl AssessmentUnavailable {
    /// Create the condition with a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why the service was considered unavailable.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<reqwest::Error> for AssessmentUnavailable {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "connection failed"
        } else if err.is_status() {
            "error status"
        } else if err.is_decode() {
            "malformed body"
        } else {
            "request failed"
        };
        Self::new(format!("{kind}: {err}"))
    }
}
