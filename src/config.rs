use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Provider used for analysis
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// OCR collaborator settings
    #[serde(default)]
    pub ocr: OcrConfig,
    /// Input resolution policy
    #[serde(default)]
    pub input: InputConfig,
    /// Request timeout, given in whole seconds in config files
    #[serde(default = "default_timeout", deserialize_with = "seconds")]
    pub timeout: Duration,
    /// Optional file replacing the built-in analysis instructions
    #[serde(default)]
    pub prompt_template_path: Option<String>,
}

/// Configuration for a specific reasoning service provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider may be used
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier override (e.g., "gemini-1.5-flash", "gpt-4o-mini")
    #[serde(default)]
    pub model: Option<String>,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

impl ProviderConfig {
    /// Credential from config first, then the first set environment variable.
    /// Blank values count as absent.
    pub fn resolve_api_key(&self, env_vars: &[&str]) -> Option<String> {
        let present = |key: &String| !key.trim().is_empty();
        self.api_key.clone().filter(present).or_else(|| {
            env_vars
                .iter()
                .find_map(|name| std::env::var(name).ok().filter(present))
        })
    }
}

/// OCR collaborator settings
#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Google Cloud Vision key (falls back to GOOGLE_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Which text wins when a submission carries both an image and typed text
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextPrecedence {
    /// OCR text that clears the length threshold replaces the typed text
    #[default]
    OcrFirst,
    /// Typed text wins; OCR is only used when no text was typed
    TextFirst,
}

/// Input resolution policy
#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// Minimum trimmed character count for OCR output to count as usable
    #[serde(default = "default_min_ocr_chars")]
    pub min_ocr_chars: usize,
    #[serde(default)]
    pub precedence: TextPrecedence,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            min_ocr_chars: default_min_ocr_chars(),
            precedence: TextPrecedence::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            ocr: OcrConfig::default(),
            input: InputConfig::default(),
            timeout: default_timeout(),
            prompt_template_path: None,
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "google".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn seconds<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

pub(crate) fn default_min_ocr_chars() -> usize {
    5
}

impl AnalysisConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with INGREDIENT_COPILOT__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: INGREDIENT_COPILOT__PROVIDERS__GOOGLE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Settings for the named provider; an unconfigured provider gets defaults
    /// so that an environment credential alone is enough to enable it.
    pub fn provider_config(&self, name: &str) -> ProviderConfig {
        self.providers.get(name).cloned().unwrap_or_default()
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<AnalysisConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: INGREDIENT_COPILOT__INPUT__MIN_OCR_CHARS
        .add_source(
            Environment::with_prefix("INGREDIENT_COPILOT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
