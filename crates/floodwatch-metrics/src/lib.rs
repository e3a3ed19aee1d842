//! Metrics for the flood-risk assessment pipeline.
//!
//! Every metric the pipeline emits is declared here as a const [`Metric`] so
//! names, units and label keys live in one place. The `metrics` crate is
//! re-exported; without an installed recorder all calls are no-ops.
//!
//! # Example
//!
//! ```rust
//! use floodwatch_metrics::{metric_defs, Outcome};
//!
//! floodwatch_metrics::describe_metrics();
//!
//! metrics::counter!(
//!     metric_defs::ASSESSMENT_REQUESTS.name,
//!     metric_defs::OUTCOME_LABEL => Outcome::Served.as_str()
//! )
//! .increment(1);
//! ```

pub use metrics;

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

/// The kind of metric (counter, gauge, or histogram).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// A monotonically increasing counter.
    Counter,
    /// A gauge that can go up and down.
    Gauge,
    /// A histogram for recording distributions.
    Histogram,
}

/// A metric declaration with its metadata.
///
/// ```rust
/// use floodwatch_metrics::{Metric, MetricKind};
/// use metrics::Unit;
///
/// const CLICKS: Metric = Metric::counter("floodwatch.example.clicks")
///     .with_description("Example clicks")
///     .with_unit(Unit::Count);
///
/// assert_eq!(CLICKS.kind, MetricKind::Counter);
/// ```
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric name (e.g., "floodwatch.assessment.requests").
    pub name: &'static str,
    /// The kind of metric (counter, gauge, histogram).
    pub kind: MetricKind,
    /// Human-readable description of the metric.
    pub description: &'static str,
    /// The unit of measurement (optional).
    pub unit: Option<Unit>,
}

impl Metric {
    const fn new(name: &'static str, kind: MetricKind) -> Self {
        Self {
            name,
            kind,
            description: "",
            unit: None,
        }
    }

    /// Creates a new counter metric with the given name.
    pub const fn counter(name: &'static str) -> Self {
        Self::new(name, MetricKind::Counter)
    }

    /// Creates a new gauge metric with the given name.
    pub const fn gauge(name: &'static str) -> Self {
        Self::new(name, MetricKind::Gauge)
    }

    /// Creates a new histogram metric with the given name.
    pub const fn histogram(name: &'static str) -> Self {
        Self::new(name, MetricKind::Histogram)
    }

    /// Sets the description for the metric.
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the unit for the metric.
    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Registers this metric's description with the metrics recorder.
    pub fn describe(&self) {
        match (self.kind, self.unit) {
            (MetricKind::Counter, Some(unit)) => {
                describe_counter!(self.name, unit, self.description);
            }
            (MetricKind::Counter, None) => {
                describe_counter!(self.name, self.description);
            }
            (MetricKind::Gauge, Some(unit)) => {
                describe_gauge!(self.name, unit, self.description);
            }
            (MetricKind::Gauge, None) => {
                describe_gauge!(self.name, self.description);
            }
            (MetricKind::Histogram, Some(unit)) => {
                describe_histogram!(self.name, unit, self.description);
            }
            (MetricKind::Histogram, None) => {
                describe_histogram!(self.name, self.description);
            }
        }
    }
}

/// Value of the `outcome` label on assessment metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The prediction service answered with a usable assessment.
    Served,
    /// The service was unavailable and a demo assessment was synthesized.
    Substituted,
}

impl Outcome {
    /// Returns the label value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Outcome::Served => "served",
            Outcome::Substituted => "substituted",
        }
    }
}

/// All metric definitions for the pipeline.
pub mod metric_defs {
    use super::{Metric, Unit};

    /// Label key carried by per-outcome assessment metrics; values come
    /// from [`Outcome::as_str`](super::Outcome::as_str).
    pub const OUTCOME_LABEL: &str = "outcome";

    /// Assessment requests, by outcome.
    ///
    /// Labels: outcome
    pub const ASSESSMENT_REQUESTS: Metric = Metric::counter("floodwatch.assessment.requests")
        .with_description("Assessment requests completed, by outcome")
        .with_unit(Unit::Count);

    /// Wall-clock time from sending the request to having an outcome.
    ///
    /// Labels: outcome
    pub const ASSESSMENT_LATENCY: Metric = Metric::histogram("floodwatch.assessment.latency_ms")
        .with_description("Time to obtain an assessment in milliseconds")
        .with_unit(Unit::Milliseconds);

    /// Requests currently awaiting the prediction service.
    pub const ASSESSMENT_IN_FLIGHT: Metric = Metric::gauge("floodwatch.assessment.in_flight")
        .with_description("Assessment requests currently in flight")
        .with_unit(Unit::Count);

    /// Map clicks handled by the location selector.
    pub const SELECTOR_CLICKS: Metric = Metric::counter("floodwatch.selector.clicks")
        .with_description("Map clicks forwarded to the assessment requester")
        .with_unit(Unit::Count);

    /// Publications that replaced a newer click's result with an older one.
    pub const BOARD_STALE_PUBLICATIONS: Metric =
        Metric::counter("floodwatch.board.stale_publications")
            .with_description("Late completions that overwrote a newer click's result")
            .with_unit(Unit::Count);

    /// All metric definitions.
    pub const ALL: &[&Metric] = &[
        &ASSESSMENT_REQUESTS,
        &ASSESSMENT_LATENCY,
        &ASSESSMENT_IN_FLIGHT,
        &SELECTOR_CLICKS,
        &BOARD_STALE_PUBLICATIONS,
    ];
}

/// Describes all pipeline metrics. Call once after installing a recorder.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}
