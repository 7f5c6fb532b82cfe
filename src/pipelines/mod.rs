pub mod image;
pub mod text;

use log::{debug, info};
use std::fmt;
use std::path::Path;

use crate::config::{default_min_ocr_chars, AnalysisConfig, TextPrecedence};
use crate::error::{AnalysisError, MalformedResponse, ProviderSetupError};
use crate::fallback::FallbackPolicy;
use crate::model::{AnalysisOutcome, AnalysisRequest, FallbackReason};
use crate::ocr::{DisabledOcr, GoogleVisionOcr, OcrEngine};
use crate::parser::parse_response;
use crate::prompt::{build_prompt, PromptTemplate};
use crate::providers::{LlmProvider, ProviderFactory};

/// Orchestration stages, used for tracing a request through the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Received,
    TextResolved,
    Rejected,
    Analyzed,
    Completed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::TextResolved => "text-resolved",
            Stage::Rejected => "rejected",
            Stage::Analyzed => "analyzed",
            Stage::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Runs one submission from raw input to a finished analysis.
///
/// Holds no mutable state, so a single instance can serve concurrent requests.
pub struct Analyzer {
    template: PromptTemplate,
    provider: Option<Box<dyn LlmProvider>>,
    ocr: Box<dyn OcrEngine>,
    precedence: TextPrecedence,
    min_ocr_chars: usize,
}

impl Analyzer {
    /// `provider` is `None` when no reasoning service credential is available;
    /// every analysis then completes with the fallback result.
    pub fn new(
        template: PromptTemplate,
        provider: Option<Box<dyn LlmProvider>>,
        ocr: Box<dyn OcrEngine>,
    ) -> Self {
        Analyzer {
            template,
            provider,
            ocr,
            precedence: TextPrecedence::default(),
            min_ocr_chars: default_min_ocr_chars(),
        }
    }

    pub fn with_precedence(mut self, precedence: TextPrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn with_min_ocr_chars(mut self, min_ocr_chars: usize) -> Self {
        self.min_ocr_chars = min_ocr_chars;
        self
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Wire the analyzer from configuration.
    ///
    /// A missing credential or disabled provider is not an error: the analyzer
    /// is built without a provider. An unknown provider name is.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let template = match &config.prompt_template_path {
            Some(path) => PromptTemplate::from_file(Path::new(path))?,
            None => PromptTemplate::default(),
        };

        let provider = match ProviderFactory::get_default_provider(config) {
            Ok(provider) => {
                info!(
                    "Using {} ({}) for analysis",
                    provider.provider_name(),
                    provider.model()
                );
                Some(provider)
            }
            Err(e @ ProviderSetupError::MissingCredential(_))
            | Err(e @ ProviderSetupError::Disabled(_)) => {
                info!("{}; analyses will return the fallback result", e);
                None
            }
            Err(e) => return Err(e.into()),
        };

        let ocr: Box<dyn OcrEngine> = if config.ocr.enabled {
            match GoogleVisionOcr::new(&config.ocr, config.timeout) {
                Ok(ocr) => Box::new(ocr),
                Err(e) => {
                    info!("{}; images will not be read", e);
                    Box::new(DisabledOcr)
                }
            }
        } else {
            Box::new(DisabledOcr)
        };

        Ok(Analyzer::new(template, provider, ocr)
            .with_precedence(config.input.precedence)
            .with_min_ocr_chars(config.input.min_ocr_chars))
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Resolve the text to analyze, running OCR first when an image is attached.
    pub async fn resolve_input(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        debug!("Request {}", Stage::Received);

        if !request.has_input() {
            info!("Request {}: empty submission", Stage::Rejected);
            return Err(AnalysisError::InputRejected(text::NO_INPUT.to_string()));
        }

        let ocr_text = match request.image_bytes.as_deref() {
            Some(bytes) => image::resolve_ocr_text(self.ocr.as_ref(), bytes).await,
            None => None,
        };

        let resolved = text::resolve_text(
            request.raw_text.as_deref(),
            ocr_text.as_deref(),
            request.image_bytes.is_some(),
            self.precedence,
            self.min_ocr_chars,
        );

        match &resolved {
            Ok(text) => debug!("Request {}: {} characters", Stage::TextResolved, text.len()),
            Err(e) => info!("Request {}: {}", Stage::Rejected, e),
        }

        resolved
    }

    /// Run the full pipeline. `InputRejected` is the only error returned.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let text = self.resolve_input(request).await?;
        Ok(self.analyze_text(&text).await)
    }

    /// Analyze already-resolved text. Never fails.
    pub async fn analyze_text(&self, text: &str) -> AnalysisOutcome {
        let Some(provider) = self.provider.as_deref() else {
            return FallbackPolicy::recover(FallbackReason::MissingCredential);
        };

        let prompt = build_prompt(&self.template, text);
        info!("Sending to {}...", provider.provider_name());

        let raw = match provider.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => return FallbackPolicy::recover(FallbackReason::Service(e)),
        };
        debug!("Request {}: {} bytes of reply", Stage::Analyzed, raw.len());

        match parse_response(&raw) {
            // The headline insight is required
            Ok(result) if result.high_level_insight.trim().is_empty() => {
                FallbackPolicy::recover(FallbackReason::Malformed(MalformedResponse(
                    "reply has no highLevelInsight".to_string(),
                )))
            }
            Ok(result) => {
                debug!("Request {}", Stage::Completed);
                AnalysisOutcome::Analyzed(result)
            }
            Err(e) => FallbackPolicy::recover(FallbackReason::Malformed(e)),
        }
    }
}
