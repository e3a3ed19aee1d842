//! Location selector: turns raw map clicks into assessment requests.
//!
//! Each accepted click gets a sequence number and exactly one request task.
//! Earlier requests are never cancelled; every task publishes to the
//! [`AssessmentBoard`] when it finishes, in whatever order that happens.

use crate::board::AssessmentBoard;
use crate::{Result, RunnerError};
use floodwatch_common::{Coordinate, CoordinateError, MAX_LATITUDE, MAX_LONGITUDE};
use floodwatch_metrics::metric_defs::SELECTOR_CLICKS;
use floodwatch_metrics::metrics::counter;
use floodwatch_predict::{AssessmentOutcome, AssessmentSource};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A raw click event as reported by a map widget.
///
/// Longitude may lie outside [-180, 180] when the map has been panned
/// across the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapClick {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees, possibly unwrapped.
    pub lng: f64,
}

impl MapClick {
    /// Create a click event.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Convert to a coordinate, wrapping longitude and clamping latitude.
    ///
    /// Only non-finite input is rejected.
    pub fn normalize(&self) -> std::result::Result<Coordinate, CoordinateError> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Coordinate::new(self.lat, self.lng);
        }
        let lat = self.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        Coordinate::new(lat, wrap_longitude(self.lng))
    }
}

/// Wrap a finite longitude into [-180, 180]. In-range values are unchanged.
pub fn wrap_longitude(lng: f64) -> f64 {
    if (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&lng) {
        return lng;
    }
    (lng + MAX_LONGITUDE).rem_euclid(2.0 * MAX_LONGITUDE) - MAX_LONGITUDE
}

/// Parse one line of a click file.
///
/// Lines are `lat,lon` (whitespace allowed). Blank lines and lines starting
/// with `#` yield `None`. `line_no` is 1-based and only used for errors.
pub fn parse_click_line(line_no: usize, line: &str) -> Result<Option<MapClick>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let invalid = |reason: String| RunnerError::InvalidClickLine {
        line: line_no,
        reason,
    };
    let (lat, lng) = line
        .split_once(',')
        .ok_or_else(|| invalid(format!("expected `lat,lon`, got {:?}", line)))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| invalid(format!("latitude {:?}: {}", lat.trim(), e)))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| invalid(format!("longitude {:?}: {}", lng.trim(), e)))?;

    Ok(Some(MapClick::new(lat, lng)))
}

/// Parse a whole click file.
pub fn parse_clicks(text: &str) -> Result<Vec<MapClick>> {
    let mut clicks = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(click) = parse_click_line(idx + 1, line)? {
            clicks.push(click);
        }
    }
    Ok(clicks)
}

/// A request fired for one click.
#[derive(Debug)]
pub struct ClickHandle {
    /// Sequence number of the click (first click is 1).
    pub click: u64,
    /// Coordinate the request was made for.
    pub coordinate: Coordinate,
    task: JoinHandle<AssessmentOutcome>,
}

impl ClickHandle {
    /// Wait for the request to finish and its result to be published.
    ///
    /// Returns `None` only if the task was aborted or panicked; the failure
    /// is logged and nothing is published for this click.
    pub async fn join(self) -> Option<AssessmentOutcome> {
        match self.task.await {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                warn!(
                    click = self.click,
                    coordinate = %self.coordinate,
                    %err,
                    "Assessment task failed"
                );
                None
            }
        }
    }
}

/// Forwards map clicks to an assessment source and the results to a board.
pub struct LocationSelector<S> {
    source: Arc<S>,
    board: AssessmentBoard,
    clicks: AtomicU64,
}

impl<S> std::fmt::Debug for LocationSelector<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationSelector")
            .field("clicks", &self.clicks.load(Ordering::Relaxed))
            .finish()
    }
}

impl<S: AssessmentSource + 'static> LocationSelector<S> {
    /// Create a selector publishing to `board`.
    pub fn new(source: Arc<S>, board: AssessmentBoard) -> Self {
        Self {
            source,
            board,
            clicks: AtomicU64::new(0),
        }
    }

    /// The board results are published to.
    pub fn board(&self) -> &AssessmentBoard {
        &self.board
    }

    /// Number of clicks accepted so far.
    pub fn click_count(&self) -> u64 {
        self.clicks.load(Ordering::SeqCst)
    }

    /// Handle a map click by spawning one request on the current runtime.
    ///
    /// Returns immediately. Returns `None` if the click cannot be turned into
    /// a coordinate, in which case nothing is requested.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn on_click(&self, click: MapClick) -> Option<ClickHandle> {
        let coordinate = match click.normalize() {
            Ok(coordinate) => coordinate,
            Err(err) => {
                warn!(?click, %err, "Ignoring map click");
                return None;
            }
        };

        let seq = self.clicks.fetch_add(1, Ordering::SeqCst) + 1;
        self.board.note_click(seq);
        counter!(SELECTOR_CLICKS.name).increment(1);
        debug!(click = seq, %coordinate, "Map click");

        let source = Arc::clone(&self.source);
        let board = self.board.clone();
        let task = tokio::spawn(async move {
            let outcome = source.assess(coordinate).await;
            board.publish(seq, outcome);
            outcome
        });

        Some(ClickHandle {
            click: seq,
            coordinate,
            task,
        })
    }
}
