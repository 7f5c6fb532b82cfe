use std::time::Duration;

use crate::pipelines::text::NO_INPUT;
use crate::{
    AnalysisConfig, AnalysisError, AnalysisOutcome, AnalysisRequest, Analyzer, PromptTemplate,
    TextPrecedence, TranscriptBuffer,
};

/// Image attached to a submission
#[derive(Debug, Clone)]
enum ImageInput {
    Bytes(Vec<u8>),
    Path(String),
}

/// Reasoning service to use
#[derive(Debug, Clone, Copy)]
pub enum Provider {
    Google,
    OpenAI,
}

impl Provider {
    /// Convert to provider name string used by the factory
    fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::OpenAI => "openai",
        }
    }
}

/// Builder for configuring and running a single analysis
#[derive(Debug, Default)]
pub struct AnalyzerBuilder {
    text: Option<String>,
    image: Option<ImageInput>,
    config: Option<AnalysisConfig>,
    provider: Option<Provider>,
    timeout: Option<Duration>,
    api_key: Option<String>,
    model: Option<String>,
    precedence: Option<TextPrecedence>,
    min_ocr_chars: Option<usize>,
    template: Option<PromptTemplate>,
}

impl AnalyzerBuilder {
    /// Set the ingredient text to analyze
    ///
    /// # Example
    /// ```
    /// use ingredient_copilot::IngredientAnalyzer;
    ///
    /// let builder = IngredientAnalyzer::builder()
    ///     .text("Sugar, Palm Oil, Red 40");
    /// ```
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Attach a photo of an ingredient label
    ///
    /// The image is run through OCR first (Google Cloud Vision). Text that
    /// clears the length threshold replaces any typed text unless
    /// [`TextPrecedence::TextFirst`] is selected.
    pub fn image_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.image = Some(ImageInput::Bytes(bytes));
        self
    }

    /// Attach a photo from disk
    ///
    /// # Example
    /// ```
    /// use ingredient_copilot::IngredientAnalyzer;
    ///
    /// let builder = IngredientAnalyzer::builder()
    ///     .image_path("/path/to/label.jpg");
    /// ```
    pub fn image_path(mut self, path: impl Into<String>) -> Self {
        self.image = Some(ImageInput::Path(path.into()));
        self
    }

    /// Use the finalized segments of a live transcript as the text
    pub fn transcript(mut self, transcript: &TranscriptBuffer) -> Self {
        self.text = Some(transcript.committed_text());
        self
    }

    /// Use this configuration instead of loading `config.toml` and the environment
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Select the reasoning service
    ///
    /// # Example
    /// ```
    /// use ingredient_copilot::{IngredientAnalyzer, Provider};
    ///
    /// let builder = IngredientAnalyzer::builder()
    ///     .text("Oats, honey")
    ///     .provider(Provider::OpenAI);
    /// ```
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set a timeout for outbound requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the API key for the reasoning service
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the reasoning service
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn precedence(mut self, precedence: TextPrecedence) -> Self {
        self.precedence = Some(precedence);
        self
    }

    pub fn min_ocr_chars(mut self, min_ocr_chars: usize) -> Self {
        self.min_ocr_chars = Some(min_ocr_chars);
        self
    }

    /// Replace the built-in analysis instructions
    pub fn template(mut self, template: PromptTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Build and execute the analysis
    ///
    /// # Errors
    /// Returns `AnalysisError` if:
    /// - Nothing usable could be resolved from the input (`InputRejected`)
    /// - The configuration cannot be loaded or names an unknown provider
    /// - An image path cannot be read
    ///
    /// Reasoning service failures are not errors; they produce
    /// [`AnalysisOutcome::Fallback`].
    ///
    /// # Example
    /// ```no_run
    /// # use ingredient_copilot::IngredientAnalyzer;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let outcome = IngredientAnalyzer::builder()
    ///     .text("Sugar, Palm Oil, Red 40")
    ///     .build()
    ///     .await?;
    /// println!("{}", outcome.result().high_level_insight);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<AnalysisOutcome, AnalysisError> {
        let image_bytes = match self.image {
            Some(ImageInput::Bytes(bytes)) => Some(bytes),
            Some(ImageInput::Path(path)) => Some(tokio::fs::read(&path).await?),
            None => None,
        };

        let request = AnalysisRequest {
            raw_text: self.text,
            image_bytes,
        };
        if !request.has_input() {
            return Err(AnalysisError::InputRejected(NO_INPUT.to_string()));
        }

        let mut config = match self.config {
            Some(config) => config,
            None => AnalysisConfig::load()?,
        };

        if let Some(provider) = self.provider {
            config.default_provider = provider.as_str().to_string();
        }
        if self.api_key.is_some() || self.model.is_some() {
            let entry = config
                .providers
                .entry(config.default_provider.clone())
                .or_default();
            if let Some(key) = self.api_key {
                entry.api_key = Some(key);
            }
            if let Some(model) = self.model {
                entry.model = Some(model);
            }
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(precedence) = self.precedence {
            config.input.precedence = precedence;
        }
        if let Some(min_ocr_chars) = self.min_ocr_chars {
            config.input.min_ocr_chars = min_ocr_chars;
        }

        let mut analyzer = Analyzer::from_config(&config)?;
        if let Some(template) = self.template {
            analyzer = analyzer.with_template(template);
        }

        analyzer.analyze(&request).await
    }
}

/// Main entry point for the builder API
pub struct IngredientAnalyzer;

impl IngredientAnalyzer {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use ingredient_copilot::IngredientAnalyzer;
    ///
    /// let builder = IngredientAnalyzer::builder();
    /// ```
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::default()
    }
}
