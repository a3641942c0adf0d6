use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::Message;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    pub content: String,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("Could not reach the completion service: {0}")]
    Network(String),

    #[error("Completion service rejected the credential: {0}")]
    Auth(String),

    #[error("Completion service rate limit reached: {0}")]
    RateLimit(String),

    #[error("Completion service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Completion service returned no answer")]
    EmptyResponse,
}

impl CompletionError {
    /// Stable machine-readable name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::Network(_) => "network",
            CompletionError::Auth(_) => "auth",
            CompletionError::RateLimit(_) => "rate_limit",
            CompletionError::Api { .. } => "api",
            CompletionError::MalformedResponse(_) => "malformed_response",
            CompletionError::EmptyResponse => "empty_response",
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError>;
}
