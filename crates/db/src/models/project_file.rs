//! Project file entity model.

use coder_core::types::{EntityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A file row from the `project_files` table, unique on
/// `(project_id, file_path)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectFile {
    pub id: EntityId,
    pub project_id: EntityId,
    pub file_path: String,
    pub file_name: String,
    pub content: String,
    pub file_type: String,
    /// Byte length of `content`, recomputed on every save.
    pub size_bytes: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
