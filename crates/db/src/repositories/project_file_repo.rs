//! Repository for the `project_files` table.
//!
//! Files are keyed by `(project_id, file_path)`. Every public method joins
//! through `projects` so a caller can only reach files of an active project
//! they own.

use std::time::Instant;

use coder_core::files::FileWrite;
use coder_core::types::EntityId;
use sqlx::{PgConnection, PgPool};

use crate::log_query;
use crate::models::project_file::ProjectFile;
use crate::repositories::project_repo::ProjectRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, file_path, file_name, content, file_type, size_bytes, \
     created_at, updated_at";

/// [`COLUMNS`] qualified with the `f` alias for joined queries.
const F_COLUMNS: &str = "f.id, f.project_id, f.file_path, f.file_name, f.content, f.file_type, \
     f.size_bytes, f.created_at, f.updated_at";

/// Conflict clause shared by both upsert paths. `size_bytes` is always
/// taken from the incoming row, which the repository derives from content.
const ON_CONFLICT: &str = "ON CONFLICT (project_id, file_path) DO UPDATE SET
        file_name = EXCLUDED.file_name,
        content = EXCLUDED.content,
        file_type = EXCLUDED.file_type,
        size_bytes = EXCLUDED.size_bytes,
        updated_at = NOW()";

/// Byte length of `content` as stored in `size_bytes`.
pub fn content_size(content: &str) -> i64 {
    i64::try_from(content.len()).unwrap_or(i64::MAX)
}

/// Provides CRUD operations for project files.
pub struct ProjectFileRepo;

impl ProjectFileRepo {
    /// Insert or overwrite a file in an active project owned by `user_id`,
    /// and advance the project's `updated_at` in the same transaction.
    ///
    /// Returns `None` (and writes nothing) if the project is not reachable.
    pub async fn save(
        pool: &PgPool,
        project_id: EntityId,
        user_id: &str,
        file: &FileWrite,
    ) -> Result<Option<ProjectFile>, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_files
                (project_id, file_path, file_name, content, file_type, size_bytes)
             SELECT p.id, $3, $4, $5, $6, $7
             FROM projects p
             WHERE p.id = $1 AND p.user_id = $2 AND p.status = 'active'
             {ON_CONFLICT}
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let started = Instant::now();
        let saved = sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(&file.file_path)
            .bind(&file.file_name)
            .bind(&file.content)
            .bind(&file.file_type)
            .bind(content_size(&file.content))
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

    /// Upsert without an ownership check, on the caller's connection.
    ///
    /// Only for callers that created the project in the same transaction.
    pub(crate) async fn upsert_unchecked(
        conn: &mut PgConnection,
        project_id: EntityId,
        file: &FileWrite,
    ) -> Result<ProjectFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_files
                (project_id, file_path, file_name, content, file_type, size_bytes)
             VALUES ($1, $2, $3, $4, $5, $6)
             {ON_CONFLICT}
             RETURNING {COLUMNS}"
        );
        let started = Instant::now();
        let saved = sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .bind(&file.file_path)
            .bind(&file.file_name)
            .bind(&file.content)
            .bind(&file.file_type)
            .bind(content_size(&file.content))
            .fetch_one(&mut *conn)
            .await?;
        log_query(&query, started, 1);
        Ok(saved)
    }

    /// List all files of a project, ordered by path.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: EntityId,
        user_id: &str,
    ) -> Result<Vec<ProjectFile>, sqlx::Error> {
        let query = format!(
            "SELECT {F_COLUMNS}
             FROM project_files f
             JOIN projects p ON p.id = f.project_id
             WHERE f.project_id = $1 AND p.user_id = $2 AND p.status = 'active'
             ORDER BY f.file_path ASC"
        );
        let started = Instant::now();
        let files = sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        log_query(&query, started, files.len() as u64);
        Ok(files)
    }

    /// Find one file by path.
    pub async fn find(
        pool: &PgPool,
        project_id: EntityId,
        file_path: &str,
        user_id: &str,
    ) -> Result<Option<ProjectFile>, sqlx::Error> {
        let query = format!(
            "SELECT {F_COLUMNS}
             FROM project_files f
             JOIN projects p ON p.id = f.project_id
             WHERE f.project_id = $1 AND f.file_path = $2
               AND p.user_id = $3 AND p.status = 'active'"
        );
        let started = Instant::now();
        let file = sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .bind(file_path)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        log_query(&query, started, u64::from(file.is_some()));
        Ok(file)
    }

    /// Permanently remove one file and advance the project's `updated_at`.
    ///
    /// Returns the removed row, or `None` if it was not reachable.
    pub async fn delete(
        pool: &PgPool,
        project_id: EntityId,
        file_path: &str,
        user_id: &str,
    ) -> Result<Option<ProjectFile>, sqlx::Error> {
        let query = format!(
            "DELETE FROM project_files f
             USING projects p
             WHERE p.id = f.project_id
               AND f.project_id = $1 AND f.file_path = $2
               AND p.user_id = $3 AND p.status = 'active'
             RETURNING {F_COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let started = Instant::now();
        let removed = sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .bind(file_path)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        log_query(&query, started, u64::from(removed.is_some()));

        let Some(removed) = removed else {
            tx.rollback().await?;
            return Ok(None);
        };

        ProjectRepo::touch(&mut *tx, project_id).await?;
        tx.commit().await?;
        Ok(Some(removed))
    }
}
