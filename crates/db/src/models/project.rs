//! Project entity model and insert input.

use coder_core::types::{EntityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: EntityId,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub template_used: Option<String>,
    /// `"active"` or `"deleted"`, see [`coder_core::project::ProjectStatus`].
    pub status: String,
    pub settings: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project with its child counts, as returned by the listing query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub file_count: i64,
    pub conversation_count: i64,
    pub last_conversation_at: Option<Timestamp>,
}

/// Input for inserting a project. `user_id` is the caller identity, never
/// a client-supplied body field.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub user_id: String,
    pub name: String,
    /// Empty when the caller gave none.
    pub description: String,
    pub template_used: Option<String>,
    pub settings: Option<serde_json::Value>,
}
