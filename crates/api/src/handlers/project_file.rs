//! Handlers for files nested under `/projects/{id}/files`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use coder_core::error::CoreError;
use coder_core::files::SaveFileRequest;
use coder_core::validation::validate_file_path;
use coder_db::models::project_file::ProjectFile;
use coder_db::repositories::ProjectFileRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::{owned_project, project_id};
use crate::middleware::user::RequestUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/files
pub async fn list(
    State(state): State<AppState>,
    user: RequestUser,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<ProjectFile>>>> {
    let id = project_id(&id)?;
    owned_project(&state, id, &user.user_id).await?;

    let files = ProjectFileRepo::list_for_project(&state.pool, id, &user.user_id).await?;
    Ok(Json(DataResponse { data: files }))
}

/// POST /api/v1/projects/{id}/files
///
/// Creates the file or overwrites the one already stored at `file_path`.
pub async fn save(
    State(state): State<AppState>,
    user: RequestUser,
    Path(id): Path<String>,
    Json(input): Json<SaveFileRequest>,
) -> AppResult<Json<DataResponse<ProjectFile>>> {
    let id = project_id(&id)?;
    let write = input.into_write()?;

    let file = ProjectFileRepo::save(&state.pool, id, &user.user_id, &write)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Project", id)))?;

    tracing::debug!(
        project_id = %id,
        file_path = %file.file_path,
        size_bytes = file.size_bytes,
        "Project file saved"
    );
    Ok(Json(DataResponse { data: file }))
}

/// GET /api/v1/projects/{id}/files/{*path}
pub async fn get_by_path(
    State(state): State<AppState>,
    user: RequestUser,
    Path((id, path)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<ProjectFile>>> {
    let id = project_id(&id)?;
    validate_file_path(&path)?;

    let file = ProjectFileRepo::find(&state.pool, id, &path, &user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("File", &path)))?;
    Ok(Json(DataResponse { data: file }))
}

/// DELETE /api/v1/projects/{id}/files/{*path}
pub async fn delete(
    State(state): State<AppState>,
    user: RequestUser,
    Path((id, path)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let id = project_id(&id)?;
    validate_file_path(&path)?;

    match ProjectFileRepo::delete(&state.pool, id, &path, &user.user_id).await? {
        Some(_) => {
            tracing::debug!(project_id = %id, file_path = %path, "Project file deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::Core(CoreError::not_found("File", &path))),
    }
}
