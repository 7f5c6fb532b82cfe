use crate::config::{AnalysisConfig, ProviderConfig};
use crate::error::ProviderSetupError;
use crate::providers::{GoogleProvider, LlmProvider, OpenAIProvider};
use std::time::Duration;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, ProviderSetupError> {
        if !config.enabled {
            return Err(ProviderSetupError::Disabled(provider_name.to_string()));
        }

        match provider_name {
            "google" | "gemini" => Ok(Box::new(GoogleProvider::new(config, timeout)?)),
            "openai" => Ok(Box::new(OpenAIProvider::new(config, timeout)?)),
            _ => Err(ProviderSetupError::UnknownProvider(
                provider_name.to_string(),
            )),
        }
    }

    /// Get the default provider from configuration
    pub fn get_default_provider(
        config: &AnalysisConfig,
    ) -> Result<Box<dyn LlmProvider>, ProviderSetupError> {
        let provider_name = &config.default_provider;
        Self::create(
            provider_name,
            &config.provider_config(provider_name),
            config.timeout,
        )
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "openai"]
    }
}
