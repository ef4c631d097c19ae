//! Repository for the append-only `conversations` table.

use std::time::Instant;

use coder_core::types::EntityId;
use sqlx::PgPool;

use crate::log_query;
use crate::models::conversation::{Conversation, NewConversation};
use crate::repositories::project_repo::ProjectRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, user_id, message, response, ai_model, tokens_used, created_at";

/// [`COLUMNS`] qualified with the `c` alias for joined queries.
const C_COLUMNS: &str = "c.id, c.project_id, c.user_id, c.message, c.response, c.ai_model, \
     c.tokens_used, c.created_at";

/// Provides append and history operations for conversations.
pub struct ConversationRepo;

impl ConversationRepo {
    /// Append an exchange to an active project owned by `user_id` and
    /// advance the project's `updated_at`, both in one transaction.
    ///
    /// Returns `None` (and writes nothing) if the project is not reachable.
    pub async fn save(
        pool: &PgPool,
        project_id: EntityId,
        user_id: &str,
        input: &NewConversation,
    ) -> Result<Option<Conversation>, sqlx::Error> {
        let query = format!(
            "INSERT INTO conversations
                (project_id, user_id, message, response, ai_model, tokens_used)
             SELECT p.id, p.user_id, $3, $4, $5, $6
             FROM projects p
             WHERE p.id = $1 AND p.user_id = $2 AND p.status = 'active'
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let started = Instant::now();
        let saved = sqlx::query_as::<_, Conversation>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(&input.message)
            .bind(&input.response)
            .bind(&input.ai_model)
            .bind(input.tokens_used)
            .fetch_optional(&mut *tx)
            .await?;
        log_query(&query, started, u64::from(saved.is_some()));

        let Some(saved) = saved else {
            tx.rollback().await?;
            return Ok(None);
        };

        ProjectRepo::touch(&mut *tx, project_id).await?;
        tx.commit().await?;
        Ok(Some(saved))
    }

    /// The most recent `limit` exchanges of a project, returned oldest first.
    ///
    /// The query reads newest-first so `LIMIT` keeps the latest rows; the
    /// page is reversed before returning. `limit` is clamped by the caller.
    pub async fn list_recent(
        pool: &PgPool,
        project_id: EntityId,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<Conversation>, sqlx::Error> {
        let query = format!(
            "SELECT {C_COLUMNS}
             FROM conversations c
             JOIN projects p ON p.id = c.project_id
             WHERE c.project_id = $1 AND p.user_id = $2 AND p.status = 'active'
             ORDER BY c.created_at DESC
             LIMIT $3"
        );
        let started = Instant::now();
        let mut rows = sqlx::query_as::<_, Conversation>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        log_query(&query, started, rows.len() as u64);

        rows.reverse();
        Ok(rows)
    }
}
