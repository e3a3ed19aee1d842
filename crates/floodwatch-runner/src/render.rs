//! Terminal rendering of the displayed assessment.

use crate::board::DisplayedAssessment;
use floodwatch_common::{RiskAssessment, RiskLevel};
use serde::Serialize;

/// Notice shown alongside demo substitutes.
pub const DEMO_NOTICE: &str =
    "Demo mode: prediction service unavailable, showing simulated values";

/// Short advice line per risk level.
fn advice(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Minimal flood risk. Normal precautions apply.",
        RiskLevel::Medium => "Moderate flood risk. Monitor local warnings.",
        RiskLevel::High => "Significant flood risk. Prepare to act on warnings.",
    }
}

/// Render a text panel for the displayed assessment.
pub fn render_panel(displayed: &DisplayedAssessment) -> String {
    let assessment = &displayed.assessment;
    let mut out = String::new();

    out.push_str(&format!(
        "Flood risk: {}  ({})\n",
        assessment.flood_risk, assessment.location
    ));
    out.push_str(&format!("  {}\n", advice(assessment.flood_risk)));
    for (name, value, unit) in assessment.environmental_data.entries() {
        out.push_str(&format!("  {:<15} {:>8.2} {}\n", name, value, unit));
    }
    out.push_str(&format!(
        "  click #{} at {}\n",
        displayed.click,
        displayed.received_at.format("%H:%M:%S UTC")
    ));
    if displayed.demo {
        out.push_str(&format!("  ! {}\n", DEMO_NOTICE));
    }
    out
}

#[derive(Serialize)]
struct JsonView<'a> {
    click: u64,
    demo: bool,
    #[serde(flatten)]
    assessment: &'a RiskAssessment,
}

/// Render the displayed assessment as one line of JSON.
///
/// The object has the service's response shape plus `click` and `demo`.
pub fn render_json(displayed: &DisplayedAssessment) -> serde_json::Result<String> {
    serde_json::to_string(&JsonView {
        click: displayed.click,
        demo: displayed.demo,
        assessment: &displayed.assessment,
    })
}
