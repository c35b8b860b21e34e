//! # OpenRouter Provider Tests
//!
//! Run the provider against a wiremock server speaking the OpenAI-compatible
//! chat-completions wire format.

use paraflow::{AiProvider, GenerationParams, ProviderError};
use paraflow::providers::ai::openrouter::OpenRouterProvider;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn params() -> GenerationParams {
    GenerationParams {
        model: None,
        temperature: 0.6,
        max_tokens: 500,
    }
}

fn provider_for(server: &MockServer) -> OpenRouterProvider {
    OpenRouterProvider::new(
        Some(format!("{}/v1/chat/completions", server.uri())),
        "test-key".to_string(),
        Some("test/model".to_string()),
    )
    .unwrap()
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

#[tokio::test]
async fn generate_returns_the_trimmed_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "test/model",
            "temperature": 0.6,
            "max_tokens": 500,
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("  Rewritten text.  ")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let result = provider
        .generate("You are an expert paraphrasing assistant.", "Please paraphrase this.", &params())
        .await
        .unwrap();
    assert_eq!(result, "Rewritten text.");
}

#[tokio::test]
async fn request_carries_system_and_user_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "system", "content": "system instructions" },
                { "role": "user", "content": "user text" },
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    provider
        .generate("system instructions", "user text", &params())
        .await
        .unwrap();
}

#[tokio::test]
async fn per_call_model_overrides_the_configured_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "model": "override/model" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let params = GenerationParams {
        model: Some("override/model".to_string()),
        ..params()
    };
    provider.generate("s", "u", &params).await.unwrap();
}

#[tokio::test]
async fn api_error_status_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limit exceeded"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider.generate("s", "u", &params()).await.unwrap_err();
    match err {
        ProviderError::Api(message) => assert!(message.contains("rate limit exceeded")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_choices_is_an_empty_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider.generate("s", "u", &params()).await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse));
}

#[tokio::test]
async fn blank_api_key_is_rejected_at_construction() {
    let err = OpenRouterProvider::new(None, "   ".to_string(), None).unwrap_err();
    assert!(matches!(err, ProviderError::MissingApiKey));
}
