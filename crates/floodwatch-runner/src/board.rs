//! The assessment board: the display surface that holds the current result.
//!
//! Every completed request publishes its outcome here and replaces whatever
//! was shown before. Publications are not ordered by click: if an earlier
//! click's request finishes after a later one, the earlier result overwrites
//! the later one. The board keeps track of the newest click so such a stale
//! result can be recognised, but it never discards a publication.

use chrono::{DateTime, Utc};
use floodwatch_common::RiskAssessment;
use floodwatch_metrics::metric_defs::BOARD_STALE_PUBLICATIONS;
use floodwatch_metrics::metrics::counter;
use floodwatch_predict::AssessmentOutcome;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// What the board currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedAssessment {
    /// Sequence number of the click this result belongs to.
    pub click: u64,
    /// The assessment itself.
    pub assessment: RiskAssessment,
    /// Whether the assessment is a demo substitute.
    pub demo: bool,
    /// When the result landed on the board.
    pub received_at: DateTime<Utc>,
}

impl DisplayedAssessment {
    /// Build from a click number and a requester outcome.
    pub fn from_outcome(click: u64, outcome: AssessmentOutcome) -> Self {
        Self {
            click,
            demo: outcome.is_demo(),
            assessment: outcome.into_assessment(),
            received_at: Utc::now(),
        }
    }
}

/// Shared display surface. Cheap to clone; clones see the same state.
#[derive(Debug, Clone)]
pub struct AssessmentBoard {
    current: Arc<watch::Sender<Option<DisplayedAssessment>>>,
    latest_click: Arc<AtomicU64>,
}

impl Default for AssessmentBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl AssessmentBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            current: Arc::new(tx),
            latest_click: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record that click `click` has been made.
    pub fn note_click(&self, click: u64) {
        self.latest_click.fetch_max(click, Ordering::SeqCst);
    }

    /// Newest click recorded so far (0 if none).
    pub fn latest_click(&self) -> u64 {
        self.latest_click.load(Ordering::SeqCst)
    }

    /// Replace the displayed assessment with the outcome of `click`.
    ///
    /// Returns `true` if the published result is stale, i.e. a newer click
    /// has already been made.
    pub fn publish(&self, click: u64, outcome: AssessmentOutcome) -> bool {
        let displayed = DisplayedAssessment::from_outcome(click, outcome);
        let stale = click < self.latest_click();

        info!(
            click,
            location = %displayed.assessment.location,
            risk = %displayed.assessment.flood_risk,
            demo = displayed.demo,
            "Assessment displayed"
        );
        if stale {
            counter!(BOARD_STALE_PUBLICATIONS.name).increment(1);
            debug!(click, latest = self.latest_click(), "Late result replaced a newer click");
        }

        self.current.send_replace(Some(displayed));
        stale
    }

    /// The assessment currently shown, if any.
    pub fn current(&self) -> Option<DisplayedAssessment> {
        self.current.borrow().clone()
    }

    /// Whether the shown assessment belongs to an older click than the newest.
    pub fn is_stale(&self) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|shown| shown.click < self.latest_click())
    }

    /// Watch for replacements of the displayed assessment.
    pub fn subscribe(&self) -> watch::Receiver<Option<DisplayedAssessment>> {
        self.current.subscribe()
    }
}
