use crate::config::TextPrecedence;
use crate::error::AnalysisError;

pub const UNREADABLE_IMAGE: &str = "Could not extract readable text from image.";
pub const NO_INPUT: &str = "Please provide ingredient text or a valid image.";

/// Decide which text gets analyzed, or reject the submission.
///
/// OCR output only counts once its trimmed length reaches `min_ocr_chars`;
/// typed text counts whenever it is not blank and is passed on as-is.
pub fn resolve_text(
    raw_text: Option<&str>,
    ocr_text: Option<&str>,
    image_supplied: bool,
    precedence: TextPrecedence,
    min_ocr_chars: usize,
) -> Result<String, AnalysisError> {
    let usable_ocr = ocr_text
        .map(str::trim)
        .filter(|text| text.chars().count() >= min_ocr_chars && !text.is_empty());
    let typed = raw_text.filter(|text| !text.trim().is_empty());

    let chosen = match precedence {
        TextPrecedence::OcrFirst => usable_ocr.or(typed),
        TextPrecedence::TextFirst => typed.or(usable_ocr),
    };

    match chosen {
        Some(text) => Ok(text.to_string()),
        None if image_supplied => {
            Err(AnalysisError::InputRejected(UNREADABLE_IMAGE.to_string()))
        }
        None => Err(AnalysisError::InputRejected(NO_INPUT.to_string())),
    }
}
