use crate::ocr::OcrEngine;
use log::{debug, warn};

/// Run OCR on an uploaded image. Any failure just means the image gave us no text.
pub async fn resolve_ocr_text(ocr: &dyn OcrEngine, image: &[u8]) -> Option<String> {
    if image.is_empty() {
        debug!("Empty image payload, skipping OCR");
        return None;
    }

    match ocr.extract_text(image).await {
        Ok(text) => {
            let preview: String = text.chars().take(100).collect();
            debug!("OCR result: {}...", preview);
            Some(text.trim().to_string())
        }
        Err(e) => {
            warn!("OCR failed, treating image as unreadable: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::ocr::DisabledOcr;
    use async_trait::async_trait;

    struct FixedOcr(&'static str);

    #[async_trait]
    impl OcrEngine for FixedOcr {
        async fn extract_text(&self, _image: &[u8]) -> Result<String, OcrError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_ocr_text_is_trimmed() {
        let text = resolve_ocr_text(&FixedOcr("  Sugar, Salt \n"), b"img").await;
        assert_eq!(text.as_deref(), Some("Sugar, Salt"));
    }

    #[tokio::test]
    async fn test_ocr_failure_is_none() {
        assert_eq!(resolve_ocr_text(&DisabledOcr, b"img").await, None);
    }

    #[tokio::test]
    async fn test_empty_image_skips_ocr() {
        assert_eq!(resolve_ocr_text(&FixedOcr("Sugar"), b"").await, None);
    }
}
