//! The seam between the gateway and a concrete text-generation backend.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AiError;

/// One single-turn completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens.saturating_add(output_tokens),
        }
    }
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub text: String,
    /// Model that produced the text, as reported by the provider.
    pub model: String,
    pub usage: TokenUsage,
}

/// A backend able to answer [`CompletionRequest`]s.
///
/// Implementations make exactly one outbound call per request and never
/// retry. Every failure is returned as a classified [`AiError`].
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, AiError>;
}
