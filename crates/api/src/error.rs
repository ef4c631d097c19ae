use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coder_ai::{AiError, AiErrorKind};
use coder_core::error::CoreError;
use coder_db::RepoError;
use serde_json::json;

const GENERIC_MESSAGE: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, storage and AI failures, and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `coder_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A classified failure from the AI gateway.
    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    /// The request did not finish within the configured deadline.
    #[error("Request timed out")]
    RequestTimeout,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Database(db) => AppError::Database(db),
            RepoError::EmptyUpdate(empty) => {
                AppError::Core(CoreError::Validation(empty.to_string()))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- AI gateway errors ---
            AppError::Ai(err) => classify_ai_error(err),

            // --- HTTP-level errors ---
            AppError::RequestTimeout => (
                StatusCode::REQUEST_TIMEOUT,
                "REQUEST_TIMEOUT",
                "Request timed out".to_string(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - A pool checkout timeout maps to 503.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::PoolTimedOut => {
            tracing::error!("Database pool exhausted, checkout timed out");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                "Service is busy, please retry".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                GENERIC_MESSAGE.to_string(),
            )
        }
    }
}

/// Classify an AI gateway failure. Provider credential problems are the
/// server's fault, not the caller's, so they surface as 502.
fn classify_ai_error(err: &AiError) -> (StatusCode, &'static str, String) {
    let (status, code) = match err.kind {
        AiErrorKind::NotConfigured => (StatusCode::SERVICE_UNAVAILABLE, "AI_NOT_CONFIGURED"),
        AiErrorKind::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "AI_RATE_LIMITED"),
        AiErrorKind::InvalidRequest => (StatusCode::BAD_REQUEST, "AI_INVALID_REQUEST"),
        AiErrorKind::Unauthenticated => (StatusCode::BAD_GATEWAY, "AI_UNAUTHENTICATED"),
        AiErrorKind::Timeout => (StatusCode::GATEWAY_TIMEOUT, "AI_TIMEOUT"),
        AiErrorKind::Unknown => (StatusCode::BAD_GATEWAY, "AI_ERROR"),
    };
    (status, code, err.message.clone())
}
