//! Ingredient analysis pipeline.
//!
//! Takes ingredient text (typed, transcribed or read from a label photo),
//! asks a reasoning service for a structured health read, and always hands
//! back a renderable [`AnalysisResult`]. Service faults degrade to a canned
//! fallback; only unusable input is reported as an error.

pub mod builder;
pub mod config;
pub mod error;
pub mod fallback;
pub mod model;
pub mod ocr;
pub mod parser;
pub mod pipelines;
pub mod prompt;
pub mod providers;
pub mod transcript;

pub use builder::{AnalyzerBuilder, IngredientAnalyzer, Provider};
pub use config::{AnalysisConfig, TextPrecedence};
pub use error::{AnalysisError, MalformedResponse, OcrError, ServiceError};
pub use fallback::{fallback_result, FallbackPolicy};
pub use model::{
    bullets, AnalysisOutcome, AnalysisRequest, AnalysisResult, ErrorPayload, FallbackReason,
    Field, SchemaVersion, UiState,
};
pub use parser::parse_response;
pub use pipelines::Analyzer;
pub use prompt::{build_prompt, PromptTemplate};
pub use transcript::TranscriptBuffer;

/// Analyze ingredient text using `config.toml` and the environment.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = ingredient_copilot::analyze_text("Sugar, Palm Oil, Red 40").await?;
/// println!("{}", outcome.result().high_level_insight);
/// # Ok(())
/// # }
/// ```
pub async fn analyze_text(text: &str) -> Result<AnalysisOutcome, AnalysisError> {
    let analyzer = Analyzer::from_config(&AnalysisConfig::load()?)?;
    analyzer.analyze(&AnalysisRequest::from_text(text)).await
}

/// Analyze a label photo, with optional typed text as a fallback.
pub async fn analyze_image(
    image: Vec<u8>,
    text: Option<&str>,
) -> Result<AnalysisOutcome, AnalysisError> {
    let analyzer = Analyzer::from_config(&AnalysisConfig::load()?)?;
    let mut request = AnalysisRequest::from_image(image);
    if let Some(text) = text {
        request = request.with_text(text);
    }
    analyzer.analyze(&request).await
}
