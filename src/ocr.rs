use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::OcrConfig;
use crate::error::OcrError;

const GOOGLE_VISION_URL: &str = "https://vision.googleapis.com";

/// Image-to-text collaborator. Output is best effort and may be noisy.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn extract_text(&self, image: &[u8]) -> Result<String, OcrError>;
}

/// OCR backed by the Google Cloud Vision `TEXT_DETECTION` feature
pub struct GoogleVisionOcr {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleVisionOcr {
    /// Create from configuration, falling back to the GOOGLE_API_KEY environment variable
    pub fn new(config: &OcrConfig, timeout: Duration) -> Result<Self, OcrError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                OcrError::NotConfigured("GOOGLE_API_KEY not found in config or environment".into())
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| GOOGLE_VISION_URL.to_string());

        let client = Client::builder().timeout(timeout).build()?;

        Ok(GoogleVisionOcr {
            client,
            api_key,
            base_url,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        GoogleVisionOcr {
            client: Client::new(),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl OcrEngine for GoogleVisionOcr {
    async fn extract_text(&self, image: &[u8]) -> Result<String, OcrError> {
        let url = format!(
            "{}/v1/images:annotate?key={}",
            self.base_url, self.api_key
        );

        let request_body = json!({
            "requests": [{
                "image": {
                    "content": STANDARD.encode(image)
                },
                "features": [{
                    "type": "TEXT_DETECTION"
                }]
            }]
        });

        debug!("Sending OCR request to Google Vision API ({} bytes)", image.len());

        let response = self
            .client
            .post(&url)
            .header("Accept-Encoding", "identity")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(OcrError::Service { status, message });
        }

        let response_body: Value = response.json().await?;

        // All detected text is in the full-text annotation of the first response
        let text = response_body["responses"][0]["fullTextAnnotation"]["text"]
            .as_str()
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(OcrError::NoText);
        }

        debug!("Extracted text from image: {} characters", text.chars().count());

        Ok(text.to_string())
    }
}

/// Stand-in used when no OCR credential is configured
pub struct DisabledOcr;

#[async_trait]
impl OcrEngine for DisabledOcr {
    async fn extract_text(&self, _image: &[u8]) -> Result<String, OcrError> {
        Err(OcrError::NotConfigured("OCR is disabled".to_string()))
    }
}
