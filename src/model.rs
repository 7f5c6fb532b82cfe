use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{MalformedResponse, ServiceError};

/// A single user submission. Lives for one orchestration call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Typed, pasted or transcribed ingredient text
    pub raw_text: Option<String>,
    /// Photo of an ingredient label
    pub image_bytes: Option<Vec<u8>>,
}

impl AnalysisRequest {
    pub fn from_text(text: impl Into<String>) -> Self {
        AnalysisRequest {
            raw_text: Some(text.into()),
            image_bytes: None,
        }
    }

    pub fn from_image(bytes: Vec<u8>) -> Self {
        AnalysisRequest {
            raw_text: None,
            image_bytes: Some(bytes),
        }
    }

    /// Attach user text alongside an image
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.raw_text = Some(text.into());
        self
    }

    /// Whether the request carries anything non-empty at all
    pub fn has_input(&self) -> bool {
        let has_text = self
            .raw_text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        let has_image = self.image_bytes.as_ref().is_some_and(|b| !b.is_empty());
        has_text || has_image
    }
}

/// Traffic-light classification carried through for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UiState {
    Green,
    Yellow,
    Red,
}

impl UiState {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "green" => Some(UiState::Green),
            "yellow" => Some(UiState::Yellow),
            "red" => Some(UiState::Red),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UiState::Green => "green",
            UiState::Yellow => "yellow",
            UiState::Red => "red",
        }
    }
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result shapes the reasoning service has been asked to produce over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// `highLevelInsight`, `whyItMatters`, `tradeOffs`, `uncertainty`, `guidance`
    V1,
    /// V1 core plus `primaryRecommendation`, `contextualExplanation`,
    /// `expectationVsReality` and `uiState`
    V2,
}

/// Structured analysis handed back to the caller.
///
/// Every text field decodes to an empty string when the service omits it, so a
/// renderer never sees a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient_text")]
    pub high_level_insight: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub why_it_matters: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub trade_offs: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub uncertainty: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub guidance: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub primary_recommendation: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub contextual_explanation: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub expectation_vs_reality: String,
    #[serde(
        default,
        deserialize_with = "lenient_ui_state",
        skip_serializing_if = "Option::is_none"
    )]
    pub ui_state: Option<UiState>,
}

/// Renderable sections of an [`AnalysisResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    HighLevelInsight,
    WhyItMatters,
    TradeOffs,
    Uncertainty,
    Guidance,
    PrimaryRecommendation,
    ContextualExplanation,
    ExpectationVsReality,
}

impl Field {
    pub const V1: [Field; 5] = [
        Field::HighLevelInsight,
        Field::WhyItMatters,
        Field::TradeOffs,
        Field::Uncertainty,
        Field::Guidance,
    ];

    pub const V2: [Field; 7] = [
        Field::HighLevelInsight,
        Field::WhyItMatters,
        Field::TradeOffs,
        Field::Uncertainty,
        Field::PrimaryRecommendation,
        Field::ContextualExplanation,
        Field::ExpectationVsReality,
    ];

    /// JSON key on the wire
    pub fn key(&self) -> &'static str {
        match self {
            Field::HighLevelInsight => "highLevelInsight",
            Field::WhyItMatters => "whyItMatters",
            Field::TradeOffs => "tradeOffs",
            Field::Uncertainty => "uncertainty",
            Field::Guidance => "guidance",
            Field::PrimaryRecommendation => "primaryRecommendation",
            Field::ContextualExplanation => "contextualExplanation",
            Field::ExpectationVsReality => "expectationVsReality",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Field::HighLevelInsight => "What might matter to you",
            Field::WhyItMatters => "Why it matters",
            Field::TradeOffs => "Trade-offs",
            Field::Uncertainty => "What we're not sure about",
            Field::Guidance => "Gentle guidance",
            Field::PrimaryRecommendation => "Our recommendation",
            Field::ContextualExplanation => "In context",
            Field::ExpectationVsReality => "Expectation vs. reality",
        }
    }
}

impl AnalysisResult {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::HighLevelInsight => &self.high_level_insight,
            Field::WhyItMatters => &self.why_it_matters,
            Field::TradeOffs => &self.trade_offs,
            Field::Uncertainty => &self.uncertainty,
            Field::Guidance => &self.guidance,
            Field::PrimaryRecommendation => &self.primary_recommendation,
            Field::ContextualExplanation => &self.contextual_explanation,
            Field::ExpectationVsReality => &self.expectation_vs_reality,
        }
    }

    /// V2 when any of the richer fields is populated
    pub fn schema_version(&self) -> SchemaVersion {
        let has_v2 = !self.primary_recommendation.trim().is_empty()
            || !self.contextual_explanation.trim().is_empty()
            || !self.expectation_vs_reality.trim().is_empty()
            || self.ui_state.is_some();
        if has_v2 {
            SchemaVersion::V2
        } else {
            SchemaVersion::V1
        }
    }

    /// The closing advice regardless of which shape the service produced.
    pub fn recommendation(&self) -> &str {
        if self.guidance.trim().is_empty() {
            &self.primary_recommendation
        } else {
            &self.guidance
        }
    }

    /// Sections a renderer asked for, skipping the ones that came back empty.
    pub fn sections(&self, wanted: &[Field]) -> Vec<(Field, &str)> {
        wanted
            .iter()
            .map(|f| (*f, self.field(*f)))
            .filter(|(_, text)| !text.trim().is_empty())
            .collect()
    }
}

/// Split a bullet-delimited field into its items.
pub fn bullets(text: &str) -> Vec<String> {
    text.split(['\n', '•'])
        .map(|item| item.trim().trim_start_matches(['-', '*']).trim())
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Why a live analysis was replaced by the canned one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    MissingCredential,
    Service(ServiceError),
    Malformed(MalformedResponse),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::MissingCredential => f.write_str("no reasoning service credential"),
            FallbackReason::Service(e) => write!(f, "{e}"),
            FallbackReason::Malformed(e) => write!(f, "{e}"),
        }
    }
}

/// Outcome of a completed analysis. Callers that don't care about the
/// difference can just take the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Analyzed(AnalysisResult),
    Fallback {
        result: AnalysisResult,
        reason: FallbackReason,
    },
}

impl AnalysisOutcome {
    pub fn result(&self) -> &AnalysisResult {
        match self {
            AnalysisOutcome::Analyzed(result) => result,
            AnalysisOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn into_result(self) -> AnalysisResult {
        match self {
            AnalysisOutcome::Analyzed(result) => result,
            AnalysisOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AnalysisOutcome::Fallback { .. })
    }
}

/// Rejection body returned at the submission boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

// Models sometimes return bullet lists as arrays or numbers as bare values.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    })
}

fn lenient_ui_state<'de, D>(deserializer: D) -> Result<Option<UiState>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(UiState::parse))
}
