//! Repository for the `projects` table.
//!
//! Every read and write is scoped by `user_id` and `status = 'active'`.
//! A project owned by someone else, a deleted project, and an unknown id
//! all produce the same `None`.

use std::time::Instant;

use coder_core::files::FileWrite;
use coder_core::project::ProjectChange;
use coder_core::types::EntityId;
use sqlx::{PgConnection, PgPool};

use crate::error::RepoError;
use crate::log_query;
use crate::models::project::{CreateProject, Project, ProjectSummary};
use crate::repositories::project_file_repo::ProjectFileRepo;
use crate::update::{bind_values, BindValue, UpdateBuilder, UpdateStatement};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, name, description, template_used, status, settings, created_at, updated_at";

/// [`COLUMNS`] qualified with the `p` alias for joined queries.
const P_COLUMNS: &str = "p.id, p.user_id, p.name, p.description, p.template_used, p.status, \
     p.settings, p.created_at, p.updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new active project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::insert(&mut *conn, input).await
    }

    /// Insert a project and its scaffold files in one transaction.
    pub async fn create_with_files(
        pool: &PgPool,
        input: &CreateProject,
        files: &[FileWrite],
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let project = Self::insert(&mut *tx, input).await?;
        for file in files {
            ProjectFileRepo::upsert_unchecked(&mut *tx, project.id, file).await?;
        }
        tx.commit().await?;

        tracing::debug!(
            project_id = %project.id,
            files = files.len(),
            "Created project with scaffold files"
        );
        Ok(project)
    }

    async fn insert(conn: &mut PgConnection, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (user_id, name, description, template_used, settings)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let started = Instant::now();
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.template_used)
            .bind(&input.settings)
            .fetch_one(&mut *conn)
            .await?;
        log_query(&query, started, 1);
        Ok(project)
    }

    /// List the caller's active projects, most recently updated first, each
    /// with its file count, conversation count, and latest conversation time.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {P_COLUMNS},
                    COUNT(DISTINCT f.id) AS file_count,
                    COUNT(DISTINCT c.id) AS conversation_count,
                    MAX(c.created_at) AS last_conversation_at
             FROM projects p
             LEFT JOIN project_files f ON f.project_id = p.id
             LEFT JOIN conversations c ON c.project_id = p.id
             WHERE p.user_id = $1 AND p.status = 'active'
             GROUP BY p.id
             ORDER BY p.updated_at DESC"
        );
        let started = Instant::now();
        let rows = sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        log_query(&query, started, rows.len() as u64);
        Ok(rows)
    }

    /// Find an active project owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: EntityId,
        user_id: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE id = $1 AND user_id = $2 AND status = 'active'"
        );
        let started = Instant::now();
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        log_query(&query, started, u64::from(project.is_some()));
        Ok(project)
    }

    /// Find a project by id regardless of owner or status.
    ///
    /// Not reachable from any HTTP path; used for operator tooling and
    /// tests that verify soft-deleted rows are retained.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: EntityId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply allow-listed changes to an active project owned by `user_id`.
    ///
    /// `updated_at` is always advanced. An empty `changes` slice fails with
    /// [`RepoError::EmptyUpdate`] before any statement is issued. Returns
    /// `None` if no matching row exists.
    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        user_id: &str,
        changes: &[ProjectChange],
    ) -> Result<Option<Project>, RepoError> {
        let UpdateStatement { sql, binds } = UpdateBuilder::new("projects")
            .set_all(changes)
            .touch("updated_at")
            .filter("id", BindValue::Uuid(id))
            .filter("user_id", BindValue::Text(user_id.to_string()))
            .filter_fixed("status = 'active'")
            .returning(COLUMNS)
            .build()?;

        let started = Instant::now();
        let project = bind_values(sqlx::query_as::<_, Project>(&sql), binds)
            .fetch_optional(pool)
            .await?;
        log_query(&sql, started, u64::from(project.is_some()));
        Ok(project)
    }

    /// Soft-delete an active project owned by `user_id`, returning the row in
    /// its new `deleted` state. Files and conversations are left untouched.
    pub async fn soft_delete(
        pool: &PgPool,
        id: EntityId,
        user_id: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status = 'deleted', updated_at = GREATEST(updated_at, NOW())
             WHERE id = $1 AND user_id = $2 AND status = 'active'
             RETURNING {COLUMNS}"
        );
        let started = Instant::now();
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        log_query(&query, started, u64::from(project.is_some()));
        Ok(project)
    }

    /// Advance a project's `updated_at` after a child write. Runs on the
    /// caller's connection so it joins the caller's transaction.
    ///
    /// `NOW()` is the transaction start time, so a transaction that began
    /// earlier but commits later must not overwrite a newer value.
    pub(crate) async fn touch(conn: &mut PgConnection, id: EntityId) -> Result<(), sqlx::Error> {
        let query = "UPDATE projects SET updated_at = GREATEST(updated_at, NOW()) WHERE id = $1";
        let started = Instant::now();
        let result = sqlx::query(query).bind(id).execute(&mut *conn).await?;
        log_query(query, started, result.rows_affected());
        Ok(())
    }
}
