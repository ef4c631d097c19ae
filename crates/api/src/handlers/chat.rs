//! Handlers for the `/chat` capability endpoints.
//!
//! Each endpoint validates input, checks project ownership when a project
//! is named, makes one AI gateway call, and records the exchange against
//! the project once the call has succeeded.

use axum::extract::State;
use axum::Json;
use coder_ai::{AiError, AiStatus, Completion, TokenUsage};
use coder_core::chat::{
    build_explain_prompt, build_generation_prompt, build_improve_prompt, build_tests_prompt,
    ChatMessageRequest, ContextFile, ExplainCodeRequest, GenerateTestsRequest,
    ImproveCodeRequest, ProjectContext,
};
use coder_core::types::EntityId;
use coder_db::models::conversation::NewConversation;
use coder_db::repositories::{ConversationRepo, ProjectFileRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::{owned_project, project_id};
use crate::middleware::user::RequestUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Payload returned by every capability endpoint.
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub model: String,
    pub usage: TokenUsage,
    /// Id of the stored exchange; absent when no project was named.
    pub conversation_id: Option<EntityId>,
}

/// GET /api/v1/chat/status
pub async fn status(State(state): State<AppState>) -> Json<DataResponse<AiStatus>> {
    Json(DataResponse {
        data: state.ai.status(),
    })
}

/// POST /api/v1/chat/message
///
/// Generate code within a project, optionally with its files as context.
pub async fn message(
    State(state): State<AppState>,
    user: RequestUser,
    Json(input): Json<ChatMessageRequest>,
) -> AppResult<Json<DataResponse<ChatReply>>> {
    input.check()?;
    let id = project_id(&input.project_id)?;
    ensure_configured(&state)?;

    let project = owned_project(&state, id, &user.user_id).await?;
    let files = if input.include_context {
        ProjectFileRepo::list_for_project(&state.pool, id, &user.user_id).await?
    } else {
        Vec::new()
    };

    let context: Vec<ContextFile<'_>> = files
        .iter()
        .map(|f| ContextFile {
            file_path: &f.file_path,
            file_type: &f.file_type,
            content: &f.content,
        })
        .collect();
    let prompt = build_generation_prompt(
        &input.message,
        ProjectContext {
            name: &project.name,
            description: &project.description,
            template_used: project.template_used.as_deref(),
        },
        &context,
    );

    let completion = state.ai.generate_code(prompt).await?;
    let reply = record(&state, Some(id), &user, input.message, completion).await?;
    Ok(Json(DataResponse { data: reply }))
}

/// POST /api/v1/chat/explain
pub async fn explain(
    State(state): State<AppState>,
    user: RequestUser,
    Json(input): Json<ExplainCodeRequest>,
) -> AppResult<Json<DataResponse<ChatReply>>> {
    input.check()?;
    let project = scoped_project(&state, &user, input.project_id.as_deref()).await?;

    let prompt = build_explain_prompt(&input.code, input.language.as_deref());
    let completion = state.ai.explain_code(prompt).await?;

    let summary = exchange_message("Explain code", input.language.as_deref(), &input.code);
    let reply = record(&state, project, &user, summary, completion).await?;
    Ok(Json(DataResponse { data: reply }))
}

/// POST /api/v1/chat/improve
pub async fn improve(
    State(state): State<AppState>,
    user: RequestUser,
    Json(input): Json<ImproveCodeRequest>,
) -> AppResult<Json<DataResponse<ChatReply>>> {
    input.check()?;
    let project = scoped_project(&state, &user, input.project_id.as_deref()).await?;

    let prompt = build_improve_prompt(
        &input.code,
        input.language.as_deref(),
        input.focus.as_deref(),
    );
    let completion = state.ai.suggest_improvements(prompt).await?;

    let summary = exchange_message("Suggest improvements", input.language.as_deref(), &input.code);
    let reply = record(&state, project, &user, summary, completion).await?;
    Ok(Json(DataResponse { data: reply }))
}

/// POST /api/v1/chat/tests
pub async fn tests(
    State(state): State<AppState>,
    user: RequestUser,
    Json(input): Json<GenerateTestsRequest>,
) -> AppResult<Json<DataResponse<ChatReply>>> {
    input.check()?;
    let project = scoped_project(&state, &user, input.project_id.as_deref()).await?;

    let prompt = build_tests_prompt(
        &input.code,
        input.language.as_deref(),
        input.framework.as_deref(),
    );
    let completion = state.ai.generate_tests(prompt).await?;

    let summary = exchange_message("Generate tests", input.language.as_deref(), &input.code);
    let reply = record(&state, project, &user, summary, completion).await?;
    Ok(Json(DataResponse { data: reply }))
}

// ---- private helpers ----

fn ensure_configured(state: &AppState) -> AppResult<()> {
    if state.ai.is_configured() {
        Ok(())
    } else {
        Err(AiError::not_configured().into())
    }
}

/// Resolve and ownership-check an optional `project_id`, failing fast when
/// the gateway is disabled so no database work is wasted.
async fn scoped_project(
    state: &AppState,
    user: &RequestUser,
    raw: Option<&str>,
) -> AppResult<Option<EntityId>> {
    let id = raw
        .filter(|s| !s.trim().is_empty())
        .map(project_id)
        .transpose()?;
    ensure_configured(state)?;

    if let Some(id) = id {
        owned_project(state, id, &user.user_id).await?;
    }
    Ok(id)
}

/// Text stored as the `message` of a code-capability exchange.
fn exchange_message(label: &str, language: Option<&str>, code: &str) -> String {
    match language.map(str::trim).filter(|l| !l.is_empty()) {
        Some(lang) => format!("{label} ({lang}):\n{code}"),
        None => format!("{label}:\n{code}"),
    }
}

/// Store the exchange when a project is named and build the reply.
///
/// If the project disappeared while the provider was answering, the reply
/// is still returned without a conversation id.
async fn record(
    state: &AppState,
    project: Option<EntityId>,
    user: &RequestUser,
    message: String,
    completion: Completion,
) -> AppResult<ChatReply> {
    let conversation_id = match project {
        Some(project_id) => {
            let entry = NewConversation {
                message,
                response: completion.text.clone(),
                ai_model: completion.model.clone(),
                tokens_used: i32::try_from(completion.usage.total_tokens).unwrap_or(i32::MAX),
            };
            let saved =
                ConversationRepo::save(&state.pool, project_id, &user.user_id, &entry).await?;
            if saved.is_none() {
                tracing::warn!(%project_id, "Project no longer available, exchange not stored");
            }
            saved.map(|c| c.id)
        }
        None => None,
    };

    Ok(ChatReply {
        response: completion.text,
        model: completion.model,
        usage: completion.usage,
        conversation_id,
    })
}
