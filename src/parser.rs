//! Turns the reasoning service's free-form reply into an [`AnalysisResult`].
//!
//! The service is told to emit bare JSON but sometimes adds code fences or a
//! sentence of prose around it, so the object is located by its outermost
//! braces before decoding.

use log::debug;

use crate::error::MalformedResponse;
use crate::model::AnalysisResult;

/// Remove every markdown code fence marker, wherever it appears.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```JSON", "").replace("```", "")
}

/// First `{` through last `}`, inclusive.
pub fn extract_json_candidate(cleaned: &str) -> Result<&str, MalformedResponse> {
    let start = cleaned
        .find('{')
        .ok_or_else(|| MalformedResponse("no opening brace in response".to_string()))?;
    let end = cleaned
        .rfind('}')
        .ok_or_else(|| MalformedResponse("no closing brace in response".to_string()))?;

    if end < start {
        return Err(MalformedResponse(
            "closing brace precedes opening brace".to_string(),
        ));
    }

    Ok(&cleaned[start..=end])
}

/// Sanitize and decode a raw reply. Which keys are present is not checked here.
pub fn parse_response(raw: &str) -> Result<AnalysisResult, MalformedResponse> {
    let cleaned = strip_code_fences(raw);
    let candidate = extract_json_candidate(&cleaned)?;
    debug!("Decoding {} bytes of JSON candidate", candidate.len());

    serde_json::from_str(candidate).map_err(|e| MalformedResponse(format!("invalid JSON: {e}")))
}
