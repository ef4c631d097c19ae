//! Handler for `/projects/{id}/conversations`.

use axum::extract::{Path, Query, State};
use axum::Json;
use coder_core::chat::clamp_conversation_limit;
use coder_db::models::conversation::Conversation;
use coder_db::repositories::ConversationRepo;

use crate::error::AppResult;
use crate::handlers::{owned_project, project_id};
use crate::middleware::user::RequestUser;
use crate::query::ConversationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/conversations?limit=
///
/// The most recent exchanges, oldest first.
pub async fn list(
    State(state): State<AppState>,
    user: RequestUser,
    Path(id): Path<String>,
    Query(params): Query<ConversationParams>,
) -> AppResult<Json<DataResponse<Vec<Conversation>>>> {
    let id = project_id(&id)?;
    owned_project(&state, id, &user.user_id).await?;

    let limit = clamp_conversation_limit(params.limit);
    let history = ConversationRepo::list_recent(&state.pool, id, &user.user_id, limit).await?;
    Ok(Json(DataResponse { data: history }))
}
