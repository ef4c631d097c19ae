//! Anthropic Messages API client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AiError, AiErrorKind};
use crate::provider::{Completion, CompletionProvider, CompletionRequest, TokenUsage};

const API_VERSION: &str = "2023-06-01";

/// Caller-facing message for failures whose detail stays in the logs.
const REQUEST_FAILED: &str = "AI provider request failed";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    model: String,
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

impl MessageResponse {
    /// Concatenate all text blocks, skipping any non-text content.
    fn into_completion(self) -> Completion {
        let text = self
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        Completion {
            text,
            model: self.model,
            usage: TokenUsage::new(self.usage.input_tokens, self.usage.output_tokens),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Anthropic Messages endpoint.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to build AI provider HTTP client");
                AiError::new(AiErrorKind::Unknown, REQUEST_FAILED)
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    /// Classify a reqwest failure. The raw error names the provider URL, so
    /// it goes to the log only.
    fn transport_error(err: reqwest::Error) -> AiError {
        if err.is_timeout() {
            tracing::warn!(error = %err, "AI provider request timed out");
            AiError::new(AiErrorKind::Timeout, "AI provider timed out")
        } else {
            tracing::warn!(error = %err, "AI provider request failed");
            AiError::new(AiErrorKind::Unknown, REQUEST_FAILED)
        }
    }

    async fn error_from_response(response: reqwest::Response) -> AiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(parsed) => AiError::from_response(
                status,
                Some(&parsed.error.kind),
                Some(&parsed.error.message),
            ),
            Err(_) => AiError::from_response(status, None, None),
        }
    }
}

#[async_trait]
impl CompletionProvider for AnthropicClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, AiError> {
        let body = MessageRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            system: &request.system,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let parsed: MessageResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                Self::transport_error(e)
            } else {
                tracing::warn!(error = %e, "AI provider response could not be parsed");
                AiError::new(AiErrorKind::Unknown, REQUEST_FAILED)
            }
        })?;
        Ok(parsed.into_completion())
    }
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_joins_text_blocks() {
        let raw = r#"{
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-test",
            "content": [
                {"type": "text", "text": "Hello"},
                {"type": "tool_use", "id": "t1", "name": "x", "input": {}},
                {"type": "text", "text": ", world"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 5}
        }"#;
        let completion = serde_json::from_str::<MessageResponse>(raw)
            .unwrap()
            .into_completion();

        assert_eq!(completion.text, "Hello, world");
        assert_eq!(completion.model, "claude-test");
        assert_eq!(completion.usage, TokenUsage::new(12, 5));
    }

    #[test]
    fn request_body_shape() {
        let body = MessageRequest {
            model: "m",
            max_tokens: 2000,
            system: "be brief",
            messages: [Message {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "m",
                "max_tokens": 2000,
                "system": "be brief",
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn error_body_parses_type_and_message() {
        let raw = r#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#;
        let parsed: ApiErrorBody = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.error.kind, "rate_limit_error");
        assert_eq!(parsed.error.message, "slow down");
    }

    #[test]
    fn debug_redacts_key() {
        let client = AnthropicClient::new(
            "sk-ant-secret",
            "m",
            "http://localhost",
            Duration::from_secs(1),
        )
        .unwrap();
        let out = format!("{client:?}");
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains("sk-ant-secret"));
    }

    #[tokio::test]
    async fn unreachable_provider_does_not_leak_url() {
        let client = AnthropicClient::new(
            "sk-test",
            "claude-test",
            "http://127.0.0.1:1/internal-proxy/v1",
            Duration::from_secs(5),
        )
        .unwrap();

        let err = client
            .complete(CompletionRequest {
                system: "s".to_string(),
                prompt: "p".to_string(),
                max_tokens: 10,
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind, AiErrorKind::Unknown);
        assert_eq!(err.message, "AI provider request failed");
        assert!(!err.message.contains("127.0.0.1"));
        assert!(!err.message.contains("internal-proxy"));
    }
}
