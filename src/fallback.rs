use log::warn;

use crate::model::{AnalysisOutcome, AnalysisResult, FallbackReason, UiState};

const INSIGHT: &str =
    "Live analysis isn't available right now, so this is a general note rather than a review of your product.";
const WHY_IT_MATTERS: &str = "• Your ingredient list was not analyzed this time\n• Long lists often signal heavy processing\n• Added sugars and colorings are worth a closer look";
const TRADE_OFFS: &str =
    "• Packaged foods are convenient and shelf-stable\n• Many trade freshness for sweeteners or additives";
const UNCERTAINTY: &str =
    "No live analysis was performed, so nothing here is specific to the ingredients you submitted.";
const GUIDANCE: &str = "Try again in a moment for a personalized read of this label.";
const CONTEXTUAL_EXPLANATION: &str =
    "The analysis service could not be reached, so a generic placeholder is shown instead.";
const EXPECTATION_VS_REALITY: &str =
    "You expected a tailored breakdown; this is a generic placeholder until analysis is available again.";

/// The canned, schema-valid result. Identical on every call.
pub fn fallback_result() -> AnalysisResult {
    AnalysisResult {
        high_level_insight: INSIGHT.to_string(),
        why_it_matters: WHY_IT_MATTERS.to_string(),
        trade_offs: TRADE_OFFS.to_string(),
        uncertainty: UNCERTAINTY.to_string(),
        guidance: GUIDANCE.to_string(),
        primary_recommendation: GUIDANCE.to_string(),
        contextual_explanation: CONTEXTUAL_EXPLANATION.to_string(),
        expectation_vs_reality: EXPECTATION_VS_REALITY.to_string(),
        ui_state: Some(UiState::Yellow),
    }
}

/// Converts downstream faults into a degraded but valid outcome.
pub struct FallbackPolicy;

impl FallbackPolicy {
    pub fn recover(reason: FallbackReason) -> AnalysisOutcome {
        warn!("Falling back to canned analysis: {}", reason);
        AnalysisOutcome::Fallback {
            result: fallback_result(),
            reason,
        }
    }
}
