//! Caller identity extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use coder_core::error::CoreError;
use coder_core::types::UserId;
use coder_core::validation::validate_user_id;

use crate::error::AppError;
use crate::state::AppState;

/// Caller identity taken from the configured identity header
/// (`x-user-id` by default).
///
/// The value is trusted as-is once it passes length checks; it is scoped
/// into every query so one caller can never reach another's projects.
///
/// ```ignore
/// async fn my_handler(user: RequestUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequestUser {
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for RequestUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = state.config.user_id_header.as_str();
        let raw = parts
            .headers
            .get(header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing {header} header"
                )))
            })?;

        validate_user_id(raw)?;

        Ok(RequestUser {
            user_id: raw.to_string(),
        })
    }
}
