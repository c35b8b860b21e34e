use crate::{
    errors::ProviderError,
    providers::ai::{AiProvider, GenerationParams},
};
use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

// --- OpenRouter provider implementation ---

/// A provider for the OpenRouter chat-completions API, or any endpoint that
/// speaks the same wire format.
#[derive(Clone, Debug)]
pub struct OpenRouterProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
    model: Option<String>,
}

impl OpenRouterProvider {
    /// Creates a new `OpenRouterProvider`.
    ///
    /// `api_url` overrides the real OpenRouter endpoint, which is what the
    /// tests use to point the provider at a mock server.
    pub fn new(
        api_url: Option<String>,
        api_key: String,
        model: Option<String>,
    ) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }

        // OpenRouter uses these headers for app attribution on its dashboard.
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "HTTP-Referer",
            header::HeaderValue::from_static("https://doc-paraphraser-service"),
        );
        headers.insert(
            "X-Title",
            header::HeaderValue::from_static("Document Paraphraser Service"),
        );

        let client = ReqwestClient::builder()
            .default_headers(headers)
            .build()
            .map_err(ProviderError::ReqwestClientBuild)?;

        Ok(Self {
            client,
            api_url: api_url.unwrap_or_else(|| OPENROUTER_API_URL.to_string()),
            api_key,
            model,
        })
    }
}

#[async_trait]
impl AiProvider for OpenRouterProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let model = params
            .model
            .as_deref()
            .or(self.model.as_deref())
            .unwrap_or(DEFAULT_MODEL);

        let request_body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(ProviderError::Request)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(error_text));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(ProviderError::Deserialization)?;

        let content = chat_response
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(content)
    }
}
