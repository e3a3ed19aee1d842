//! # floodwatch-predict
//!
//! Client for the remote flood-risk prediction service.
//!
//! The [`AssessmentRequester`] sends a coordinate to
//! `POST <base_url>/predict-by-location` and returns the service's
//! [`RiskAssessment`](floodwatch_common::RiskAssessment). When the service is
//! unreachable, answers with an error status, or returns a body that does not
//! parse, the failure is not propagated: a demo assessment with random values
//! is synthesized instead (see [`fallback`]).
//!
//! ## Example
//!
//! ```no_run
//! use floodwatch_common::Coordinate;
//! use floodwatch_predict::AssessmentRequester;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let requester = AssessmentRequester::with_base_url("http://127.0.0.1:8000")?;
//! let outcome = requester
//!     .request_assessment(Coordinate::new(10.5, 76.2)?)
//!     .await;
//!
//! if outcome.is_demo() {
//!     println!("Service unavailable, showing demo values");
//! }
//! println!("Flood risk: {}", outcome.assessment().flood_risk);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod fallback;
mod requester;

pub use error::{AssessmentUnavailable, PredictError};
pub use fallback::{FallbackRanges, ValueRange};
pub use requester::{
    AssessmentOutcome, AssessmentRequester, AssessmentSource, FallbackConfig, RequestState,
    RequestStats, ServiceConfig, DEFAULT_BASE_URL, PREDICT_PATH,
};

/// Result type for requester setup.
pub type Result<T> = std::result::Result<T, PredictError>;
