//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?limit=` for conversation history. Clamped to `1..=100` by
/// [`coder_core::chat::clamp_conversation_limit`].
#[derive(Debug, Deserialize)]
pub struct ConversationParams {
    pub limit: Option<i64>,
}
