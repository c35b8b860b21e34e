pub mod openrouter;

use crate::errors::ProviderError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// Per-call generation parameters derived from the job's style settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Model override for this call; `None` uses the provider's configured
    /// or built-in default.
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A trait for interacting with an AI provider.
///
/// This trait defines a common interface for rewriting text with different
/// Large Language Models behind a chat-completion style API.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    ///
    /// The result should be a string containing the AI's response.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;
}

dyn_clone::clone_trait_object!(AiProvider);
