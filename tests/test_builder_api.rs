use ingredient_copilot::config::{OcrConfig, ProviderConfig};
use ingredient_copilot::{
    fallback_result, AnalysisConfig, AnalysisError, AnalysisOutcome, FallbackReason,
    IngredientAnalyzer, Provider, ServiceError, TranscriptBuffer, UiState,
};
use ingredient_copilot::pipelines::text::NO_INPUT;
use mockito::{Matcher, Server};
use std::collections::HashMap;
use std::time::{Duration, Instant};

fn openai_config(base_url: String) -> AnalysisConfig {
    let mut providers = HashMap::new();
    providers.insert(
        "openai".to_string(),
        ProviderConfig {
            api_key: Some("test-key".to_string()),
            base_url: Some(base_url),
            ..Default::default()
        },
    );

    AnalysisConfig {
        default_provider: "openai".to_string(),
        providers,
        ocr: OcrConfig {
            enabled: false,
            api_key: None,
            base_url: None,
        },
        ..Default::default()
    }
}

fn chat_reply(content: &str) -> String {
    serde_json::json!({
        "choices": [{ "message": { "content": content } }]
    })
    .to_string()
}

#[tokio::test]
async fn test_builder_text_to_analysis() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("Sugar, Palm Oil, Red 40".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_reply(
            r#"{"highLevelInsight": "Sweet and highly processed.", "whyItMatters": "• Added sugar\n• Artificial color", "uiState": "red"}"#,
        ))
        .create_async()
        .await;

    let outcome = IngredientAnalyzer::builder()
        .text("Sugar, Palm Oil, Red 40")
        .config(openai_config(server.url()))
        .build()
        .await
        .unwrap();

    mock.assert_async().await;
    match outcome {
        AnalysisOutcome::Analyzed(result) => {
            assert_eq!(result.high_level_insight, "Sweet and highly processed.");
            assert_eq!(result.ui_state, Some(UiState::Red));
            assert_eq!(result.trade_offs, "");
        }
        AnalysisOutcome::Fallback { reason, .. } => panic!("Unexpected fallback: {}", reason),
    }
}

#[tokio::test]
async fn test_builder_image_runs_ocr_before_analysis() {
    let mut server = Server::new_async().await;
    let ocr_mock = server
        .mock("POST", "/v1/images:annotate")
        .match_query(Matcher::UrlEncoded("key".into(), "vision-key".into()))
        .with_status(200)
        .with_body(
            r#"{"responses": [{"fullTextAnnotation": {"text": "Ingredients: rolled oats, honey, almonds"}}]}"#,
        )
        .create_async()
        .await;
    let llm_mock = server
        .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex("rolled oats, honey, almonds".to_string()))
        .with_status(200)
        .with_body(
            serde_json::json!({
                "candidates": [{ "content": { "parts": [{
                    "text": "{\"highLevelInsight\": \"A simple whole-food mix.\"}"
                }] } }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        ProviderConfig {
            api_key: Some("gemini-key".to_string()),
            model: Some("gemini-1.5-flash".to_string()),
            base_url: Some(server.url()),
            ..Default::default()
        },
    );
    let config = AnalysisConfig {
        providers,
        ocr: OcrConfig {
            enabled: true,
            api_key: Some("vision-key".to_string()),
            base_url: Some(server.url()),
        },
        ..Default::default()
    };

    let outcome = IngredientAnalyzer::builder()
        .image_bytes(b"fake jpeg".to_vec())
        .text("ignored")
        .provider(Provider::Google)
        .config(config)
        .build()
        .await
        .unwrap();

    ocr_mock.assert_async().await;
    llm_mock.assert_async().await;
    assert_eq!(
        outcome.result().high_level_insight,
        "A simple whole-food mix."
    );
}

#[tokio::test]
async fn test_builder_server_error_falls_back() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let outcome = IngredientAnalyzer::builder()
        .text("Water, salt")
        .config(openai_config(server.url()))
        .build()
        .await
        .unwrap();

    assert_eq!(outcome.result(), &fallback_result());
    assert!(matches!(
        outcome,
        AnalysisOutcome::Fallback {
            reason: FallbackReason::Service(ServiceError::Unavailable(_)),
            ..
        }
    ));
}

#[tokio::test]
async fn test_builder_disabled_provider_falls_back() {
    let mut config = openai_config("http://localhost:1".to_string());
    if let Some(openai) = config.providers.get_mut("openai") {
        openai.enabled = false;
    }

    let outcome = IngredientAnalyzer::builder()
        .text("Water, salt")
        .config(config)
        .build()
        .await
        .unwrap();

    assert!(outcome.is_fallback());
    assert_eq!(outcome.into_result().ui_state, Some(UiState::Yellow));
}

#[tokio::test]
async fn test_builder_api_key_and_model_overrides() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer override-key")
        .match_body(Matcher::PartialJson(
            serde_json::json!({ "model": "gpt-4o" }),
        ))
        .with_status(200)
        .with_body(chat_reply(r#"{"highLevelInsight": "ok"}"#))
        .create_async()
        .await;

    let outcome = IngredientAnalyzer::builder()
        .text("Rice")
        .config(openai_config(server.url()))
        .api_key("override-key")
        .model("gpt-4o")
        .build()
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(!outcome.is_fallback());
}

#[tokio::test]
async fn test_builder_transcript_input() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("oat milk, sunflower oil".to_string()))
        .with_status(200)
        .with_body(chat_reply(r#"{"highLevelInsight": "Plant based."}"#))
        .create_async()
        .await;

    let mut transcript = TranscriptBuffer::new();
    transcript.push_interim("oat");
    transcript.push_final("oat milk,");
    transcript.push_final("sunflower oil");

    let outcome = IngredientAnalyzer::builder()
        .transcript(&transcript)
        .config(openai_config(server.url()))
        .build()
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(outcome.result().high_level_insight, "Plant based.");
}

#[tokio::test]
async fn test_builder_without_input() {
    let result = IngredientAnalyzer::builder()
        .config(AnalysisConfig::default())
        .build()
        .await;

    match result {
        Err(AnalysisError::InputRejected(msg)) => assert_eq!(msg, NO_INPUT),
        other => panic!("Expected InputRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_builder_sub_second_timeout() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        std::future::pending::<()>().await;
    });

    let started = Instant::now();
    let outcome = IngredientAnalyzer::builder()
        .text("Water, salt")
        .config(openai_config(format!("http://{addr}")))
        .timeout(Duration::from_millis(200))
        .build()
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_millis(900));
    assert!(matches!(
        outcome,
        AnalysisOutcome::Fallback {
            reason: FallbackReason::Service(ServiceError::Timeout),
            ..
        }
    ));
}

#[tokio::test]
async fn test_builder_blank_text_is_rejected() {
    let result = IngredientAnalyzer::builder()
        .text("   ")
        .config(openai_config("http://localhost:1".to_string()))
        .build()
        .await;

    assert!(matches!(result, Err(AnalysisError::InputRejected(_))));
}

#[tokio::test]
async fn test_builder_missing_image_file() {
    let result = IngredientAnalyzer::builder()
        .image_path("/nonexistent/label.jpg")
        .config(openai_config("http://localhost:1".to_string()))
        .build()
        .await;

    assert!(matches!(result, Err(AnalysisError::Io(_))));
}
