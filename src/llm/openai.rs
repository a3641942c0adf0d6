// OpenAI chat completions adapter
// Talks to any OpenAI-compatible `/chat/completions` endpoint over reqwest.
// Non-streaming; the first choice is the answer.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error};

use crate::llm::provider::{
    Completion, CompletionClient, CompletionError, CompletionRequest, TokenUsage,
};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
}

// Response types for the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAIClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, OPENAI_API_BASE)
    }

    /// Point the client at another OpenAI-compatible endpoint.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn classify_failure(status: StatusCode, body: &str) -> CompletionError {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Auth(message),
            StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimit(message),
            _ => CompletionError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        if !status.is_success() {
            let failure = Self::classify_failure(status, &body);
            error!(status = status.as_u16(), kind = failure.kind(), "Chat completion failed");
            return Err(failure);
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::EmptyResponse)?;
        let content = choice.message.content.ok_or(CompletionError::EmptyResponse)?;

        Ok(Completion {
            content,
            finish_reason: choice.finish_reason,
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;
    use mockito::Matcher;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![
                Message::system("You are a helpful AI assistant."),
                Message::user("hello"),
            ],
            temperature: 0.7,
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = OpenAIClient::with_base_url("k", "http://localhost:9999/v1/");
        assert_eq!(client.endpoint(), "http://localhost:9999/v1/chat/completions");
        assert_eq!(
            OpenAIClient::new("k").endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o",
                "temperature": 0.7,
                "messages": [
                    {"role": "system", "content": "You are a helpful AI assistant."},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [
                        {"index": 0, "message": {"role": "assistant", "content": "Hi there"}, "finish_reason": "stop"},
                        {"index": 1, "message": {"role": "assistant", "content": "Ignored"}, "finish_reason": "stop"}
                    ],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = OpenAIClient::with_base_url("test-key", &server.url());
        let completion = client.complete(&request()).await.unwrap();

        assert_eq!(completion.content, "Hi there");
        assert_eq!(completion.finish_reason.as_deref(), Some("stop"));
        assert_eq!(completion.usage.unwrap().total_tokens, 15);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_auth_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#)
            .create_async()
            .await;

        let client = OpenAIClient::with_base_url("bad-key", &server.url());
        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(err, CompletionError::Auth("Incorrect API key provided".to_string()));
        assert_eq!(err.kind(), "auth");
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let client = OpenAIClient::with_base_url("k", &server.url());
        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(err, CompletionError::RateLimit("slow down".to_string()));
    }

    #[tokio::test]
    async fn test_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body(r#"{"error": {"message": "The server had an error"}}"#)
            .create_async()
            .await;

        let client = OpenAIClient::with_base_url("k", &server.url());
        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(
            err,
            CompletionError::Api {
                status: 500,
                message: "The server had an error".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let client = OpenAIClient::with_base_url("k", &server.url());
        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
    }

    #[tokio::test]
    async fn test_no_choices() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let client = OpenAIClient::with_base_url("k", &server.url());
        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(err, CompletionError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        // Port 9 (discard) is closed on test hosts; the connect fails fast.
        let client = OpenAIClient::with_base_url("k", "http://127.0.0.1:9");
        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(err.kind(), "network");
    }
}
