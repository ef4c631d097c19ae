//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use coder_core::error::CoreError;
use coder_core::project::{CreateProjectRequest, UpdateProjectRequest};
use coder_core::templates;
use coder_db::models::project::{CreateProject, Project, ProjectSummary};
use coder_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::{owned_project, project_id};
use crate::middleware::user::RequestUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects
///
/// With a `template`, the project and its starter files are created in one
/// transaction.
pub async fn create(
    State(state): State<AppState>,
    user: RequestUser,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.check()?;

    let scaffold = input
        .template
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(|t| templates::scaffold(t, &input.name))
        .transpose()?;

    let mut create = CreateProject {
        user_id: user.user_id,
        name: input.name.trim().to_string(),
        description: input.description.unwrap_or_default(),
        template_used: None,
        settings: input.settings,
    };

    let project = match scaffold {
        Some((template, files)) => {
            create.template_used = Some(template.to_string());
            ProjectRepo::create_with_files(&state.pool, &create, &files).await?
        }
        None => ProjectRepo::create(&state.pool, &create).await?,
    };

    tracing::info!(
        project_id = %project.id,
        user_id = %project.user_id,
        template = project.template_used.as_deref().unwrap_or("none"),
        "Project created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    user: RequestUser,
) -> AppResult<Json<DataResponse<Vec<ProjectSummary>>>> {
    let projects = ProjectRepo::list_for_user(&state.pool, &user.user_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: RequestUser,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Project>>> {
    let id = project_id(&id)?;
    let project = owned_project(&state, id, &user.user_id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
///
/// Only `name`, `description`, `status`, and `settings` are applied; other
/// keys in the body are ignored.
pub async fn update(
    State(state): State<AppState>,
    user: RequestUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateProjectRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let id = project_id(&id)?;
    let changes = input.into_changes()?;

    let project = ProjectRepo::update(&state.pool, id, &user.user_id, &changes)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Project", id)))?;

    tracing::info!(project_id = %id, fields = changes.len(), "Project updated");
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Soft delete; files and conversation history are retained.
pub async fn delete(
    State(state): State<AppState>,
    user: RequestUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = project_id(&id)?;
    match ProjectRepo::soft_delete(&state.pool, id, &user.user_id).await? {
        Some(_) => {
            tracing::info!(project_id = %id, "Project deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::Core(CoreError::not_found("Project", id))),
    }
}
