//! Assessment requester for the remote prediction service.
//!
//! Each call issues exactly one `POST /predict-by-location` with the
//! coordinate as JSON body and awaits one response:
//!
//! - 2xx with a well-formed [`RiskAssessment`] body: served as-is
//! - anything else (error status, transport failure, timeout, malformed body):
//!   treated uniformly as [`AssessmentUnavailable`] and replaced with a
//!   synthesized demo assessment
//!
//! No retries, no caching, no cancellation. Concurrent calls are independent;
//! whichever finishes last determines [`AssessmentRequester::state`].

use crate::fallback::{synthesize, FallbackRanges};
use crate::{AssessmentUnavailable, PredictError, Result};
use floodwatch_common::{Coordinate, RiskAssessment};
use floodwatch_metrics::metric_defs::{
    ASSESSMENT_IN_FLIGHT, ASSESSMENT_LATENCY, ASSESSMENT_REQUESTS, OUTCOME_LABEL,
};
use floodwatch_metrics::metrics::{counter, gauge, histogram};
use floodwatch_metrics::Outcome;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Path of the prediction endpoint, relative to the base URL.
pub const PREDICT_PATH: &str = "predict-by-location";

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Where and how to reach the prediction service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the service; a path prefix is kept.
    pub base_url: String,
    /// Whole-request timeout in milliseconds. `None` leaves the transport default.
    pub timeout_ms: Option<u64>,
    /// Ignore proxy settings from the environment.
    pub no_proxy: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: None,
            no_proxy: false,
        }
    }
}

impl ServiceConfig {
    /// Resolve the full URL of the prediction endpoint.
    pub fn endpoint(&self) -> Result<Url> {
        let invalid = |reason: String| PredictError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };

        // Trailing slash so `join` appends instead of replacing the last segment.
        let base = format!("{}/", self.base_url.trim_end_matches('/'));
        let base = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", base.scheme())));
        }
        base.join(PREDICT_PATH).map_err(|e| invalid(e.to_string()))
    }

    /// The configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// How demo assessments are generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Seed for the fallback RNG. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Ranges the five readings are drawn from.
    pub ranges: FallbackRanges,
}

/// Lifecycle of the most recent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    /// No request has been made yet.
    #[default]
    Idle,
    /// Waiting for the prediction service.
    Requesting,
    /// The service answered with a usable assessment.
    Succeeded,
    /// The service was unavailable; a demo assessment was returned.
    Substituted,
}

impl RequestState {
    /// Whether the request has finished. Terminal states behave like `Idle`
    /// for the next call.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Succeeded | RequestState::Substituted)
    }
}

/// Result of [`AssessmentRequester::request_assessment`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssessmentOutcome {
    /// Passed through unchanged from the prediction service.
    Served(RiskAssessment),
    /// Synthesized locally because the service was unavailable.
    Substituted(RiskAssessment),
}

impl AssessmentOutcome {
    /// The assessment, whichever way it was obtained.
    pub fn assessment(&self) -> &RiskAssessment {
        match self {
            AssessmentOutcome::Served(a) | AssessmentOutcome::Substituted(a) => a,
        }
    }

    /// Consume the outcome, returning the assessment.
    pub fn into_assessment(self) -> RiskAssessment {
        match self {
            AssessmentOutcome::Served(a) | AssessmentOutcome::Substituted(a) => a,
        }
    }

    /// Whether this is a demo substitute.
    pub fn is_demo(&self) -> bool {
        matches!(self, AssessmentOutcome::Substituted(_))
    }

    /// The terminal request state this outcome corresponds to.
    pub fn state(&self) -> RequestState {
        match self {
            AssessmentOutcome::Served(_) => RequestState::Succeeded,
            AssessmentOutcome::Substituted(_) => RequestState::Substituted,
        }
    }

    fn metric_label(&self) -> Outcome {
        match self {
            AssessmentOutcome::Served(_) => Outcome::Served,
            AssessmentOutcome::Substituted(_) => Outcome::Substituted,
        }
    }
}

/// Anything that turns a coordinate into an assessment outcome.
///
/// [`AssessmentRequester`] is the production implementation; the location
/// selector is generic over this so it can be driven without a network.
pub trait AssessmentSource: Send + Sync {
    /// Produce an outcome for `coordinate`. Never fails.
    fn assess(&self, coordinate: Coordinate) -> impl Future<Output = AssessmentOutcome> + Send;
}

/// Cumulative outcome counts for a requester.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestStats {
    /// Assessments passed through from the service.
    pub served: usize,
    /// Demo assessments synthesized.
    pub substituted: usize,
}

/// Client for the prediction service with demo-mode fallback.
///
/// Safe to share between tasks through an `Arc`.
pub struct AssessmentRequester {
    /// Full URL of the prediction endpoint.
    endpoint: Url,
    /// HTTP client.
    client: reqwest::Client,
    /// Ranges for demo readings.
    ranges: FallbackRanges,
    /// RNG for demo assessments.
    rng: Mutex<ChaCha8Rng>,
    /// State after the most recent transition.
    state: Mutex<RequestState>,
    served: AtomicUsize,
    substituted: AtomicUsize,
}

impl std::fmt::Debug for AssessmentRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentRequester")
            .field("endpoint", &self.endpoint.as_str())
            .field("state", &self.state())
            .finish()
    }
}

impl AssessmentRequester {
    /// Create a requester.
    ///
    /// Fails only on configuration problems: an unusable base URL, an invalid
    /// fallback range, or an HTTP client that cannot be built.
    pub fn new(service: &ServiceConfig, fallback: &FallbackConfig) -> Result<Self> {
        fallback.ranges.validate()?;
        let endpoint = service.endpoint()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = service.timeout() {
            builder = builder.timeout(timeout);
        }
        if service.no_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        let rng = match fallback.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            endpoint,
            client,
            ranges: fallback.ranges,
            rng: Mutex::new(rng),
            state: Mutex::new(RequestState::Idle),
            served: AtomicUsize::new(0),
            substituted: AtomicUsize::new(0),
        })
    }

    /// Create a requester for `base_url` with default fallback settings.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let service = ServiceConfig {
            base_url: base_url.into(),
            ..ServiceConfig::default()
        };
        Self::new(&service, &FallbackConfig::default())
    }

    /// Full URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Ranges demo readings are drawn from.
    pub fn fallback_ranges(&self) -> &FallbackRanges {
        &self.ranges
    }

    /// State after the most recent transition of any call.
    pub fn state(&self) -> RequestState {
        *self.state.lock()
    }

    /// Outcome counts since creation.
    pub fn stats(&self) -> RequestStats {
        RequestStats {
            served: self.served.load(Ordering::Relaxed),
            substituted: self.substituted.load(Ordering::Relaxed),
        }
    }

    /// Ask the service for an assessment, substituting a demo assessment if
    /// it is unavailable. Never returns an error.
    pub async fn request_assessment(&self, coordinate: Coordinate) -> AssessmentOutcome {
        *self.state.lock() = RequestState::Requesting;
        gauge!(ASSESSMENT_IN_FLIGHT.name).increment(1.0);
        let started = Instant::now();

        let outcome = match self.fetch(coordinate).await {
            Ok(assessment) => {
                if assessment.location != coordinate {
                    warn!(
                        requested = %coordinate,
                        served = %assessment.location,
                        "Prediction service answered for a different location"
                    );
                }
                debug!(%coordinate, risk = %assessment.flood_risk, "Assessment served");
                AssessmentOutcome::Served(assessment)
            }
            Err(unavailable) => {
                warn!(
                    %coordinate,
                    reason = unavailable.reason(),
                    "Prediction service unavailable, substituting demo assessment"
                );
                AssessmentOutcome::Substituted(self.synthesize(coordinate))
            }
        };

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let label = outcome.metric_label().as_str();
        gauge!(ASSESSMENT_IN_FLIGHT.name).decrement(1.0);
        counter!(ASSESSMENT_REQUESTS.name, OUTCOME_LABEL => label).increment(1);
        histogram!(ASSESSMENT_LATENCY.name, OUTCOME_LABEL => label).record(elapsed_ms);

        match outcome {
            AssessmentOutcome::Served(_) => self.served.fetch_add(1, Ordering::Relaxed),
            AssessmentOutcome::Substituted(_) => self.substituted.fetch_add(1, Ordering::Relaxed),
        };
        *self.state.lock() = outcome.state();

        outcome
    }

    /// Perform the single request without substitution.
    pub async fn fetch(
        &self,
        coordinate: Coordinate,
    ) -> std::result::Result<RiskAssessment, AssessmentUnavailable> {
        debug!(%coordinate, endpoint = %self.endpoint, "Requesting assessment");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&coordinate)
            .send()
            .await?;

        // Only 2xx counts; reqwest leaves unfollowed 3xx responses alone.
        let status = response.status();
        if !status.is_success() {
            return Err(AssessmentUnavailable::new(format!("error status: {}", status)));
        }

        Ok(response.json::<RiskAssessment>().await?)
    }

    /// Build a demo assessment for `coordinate`.
    pub fn synthesize(&self, coordinate: Coordinate) -> RiskAssessment {
        let mut rng = self.rng.lock();
        synthesize(coordinate, &self.ranges, &mut *rng)
    }
}

impl AssessmentSource for AssessmentRequester {
    fn assess(&self, coordinate: Coordinate) -> impl Future<Output = AssessmentOutcome> + Send {
        self.request_assessment(coordinate)
    }
}
