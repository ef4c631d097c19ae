pub mod chat;
pub mod conversation;
pub mod project;
pub mod project_file;

use coder_core::error::CoreError;
use coder_core::types::EntityId;
use coder_core::validation::parse_entity_id;
use coder_db::models::project::Project;
use coder_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Parse the `{id}` path segment of a project route.
pub(crate) fn project_id(raw: &str) -> AppResult<EntityId> {
    Ok(parse_entity_id(raw, "project id")?)
}

/// Load an active project owned by `user_id`, or fail with 404.
///
/// Unknown, deleted, and foreign projects are indistinguishable here.
pub(crate) async fn owned_project(
    state: &AppState,
    id: EntityId,
    user_id: &str,
) -> AppResult<Project> {
    ProjectRepo::find_for_user(&state.pool, id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Project", id)))
}
