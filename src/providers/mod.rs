mod factory;
mod google;
mod open_ai;

pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use crate::error::ServiceError;

/// Unified trait for reasoning service clients.
///
/// One call to [`LlmProvider::generate`] is one outbound request; retrying is
/// never done here.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Model identifier requests are sent to
    fn model(&self) -> &str;

    /// Send a fully composed prompt and return the raw reply text unmodified
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Read a JSON body, classifying non-success statuses.
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!("Reasoning service returned {}: {}", status, body);
        return Err(ServiceError::from_status(
            status.as_u16(),
            error_message(&body),
        ));
    }

    Ok(response.json::<Value>().await?)
}

// Both Gemini and OpenAI nest the human-readable message under error.message
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error": {"code": 429, "message": "Quota exceeded"}}"#),
            "Quota exceeded"
        );
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }
}
