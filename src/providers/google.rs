use crate::config::ProviderConfig;
use crate::error::{ProviderSetupError, ServiceError};
use crate::providers::{read_json, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const GOOGLE_API_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderSetupError> {
        let api_key = config
            .resolve_api_key(&["GEMINI_API_KEY", "GOOGLE_API_KEY"])
            .ok_or_else(|| ProviderSetupError::MissingCredential("GEMINI_API_KEY".to_string()))?;

        let model = config
            .model
            .clone()
            .or_else(|| std::env::var("GEMINI_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| GOOGLE_API_URL.to_string());

        Ok(GoogleProvider {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url,
            model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        GoogleProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: 0.4,
            max_tokens: 1024,
        }
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "contents": [{
                    "parts": [{ "text": prompt }]
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens
                }
            }))
            .send()
            .await?;

        let response_body = read_json(response).await?;
        debug!("{:?}", response_body);

        let text = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                ServiceError::Unavailable(
                    "Failed to extract content from Google Gemini response".to_string(),
                )
            })?;

        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_generate() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "fake_api_key".into()))
            .match_body(Matcher::Regex("Analyze: sugar".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {
                            "parts": [{ "text": "{\"highLevelInsight\": \"Mostly sugar.\"}" }]
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let provider = GoogleProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            DEFAULT_MODEL.to_string(),
        );

        let result = provider.generate("Analyze: sugar").await.unwrap();
        assert_eq!(result, "{\"highLevelInsight\": \"Mostly sugar.\"}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_model_not_found_is_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-0:generateContent")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error": {"code": 404, "message": "models/gemini-0 is not found"}}"#)
            .create_async()
            .await;

        let provider = GoogleProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "gemini-0".to_string(),
        );

        match provider.generate("prompt").await {
            Err(ServiceError::Rejected { status, message }) => {
                assert_eq!(status, 404);
                assert!(message.contains("not found"));
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_candidates_is_unavailable() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let provider = GoogleProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            DEFAULT_MODEL.to_string(),
        );

        let result = provider.generate("prompt").await;
        assert!(matches!(result, Err(ServiceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_connection_error_hides_api_key() {
        let provider = GoogleProvider::with_base_url(
            "SECRET-KEY-123".to_string(),
            "http://127.0.0.1:1".to_string(),
            DEFAULT_MODEL.to_string(),
        );

        match provider.generate("prompt").await {
            Err(err @ ServiceError::Unavailable(_)) => {
                assert!(!err.to_string().contains("SECRET-KEY-123"));
            }
            other => panic!("Expected unavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_provider_name_and_model() {
        let config = ProviderConfig {
            api_key: Some("test-key".to_string()),
            model: Some("gemini-2.0-flash".to_string()),
            ..Default::default()
        };

        let provider = GoogleProvider::new(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.provider_name(), "google");
        assert_eq!(provider.model(), "gemini-2.0-flash");
    }
}
