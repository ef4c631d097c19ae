//! Conversation entity model and insert input.

use coder_core::types::{EntityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One prompt/response exchange from the append-only `conversations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Conversation {
    pub id: EntityId,
    pub project_id: EntityId,
    pub user_id: String,
    pub message: String,
    pub response: String,
    pub ai_model: String,
    pub tokens_used: i32,
    pub created_at: Timestamp,
}

/// Input for appending a conversation entry.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub message: String,
    pub response: String,
    pub ai_model: String,
    pub tokens_used: i32,
}
