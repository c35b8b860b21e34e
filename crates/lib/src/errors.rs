use thiserror::Error;

/// Errors produced while talking to an AI provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    Request(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    Deserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    Api(String),
    #[error("AI provider returned an empty response")]
    EmptyResponse,
    #[error("API key is missing")]
    MissingApiKey,
}
