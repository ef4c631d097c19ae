//! Route definitions for the `/chat` capability endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// GET    /status     -> status
/// POST   /message    -> message
/// POST   /explain    -> explain
/// POST   /improve    -> improve
/// POST   /tests      -> tests
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(chat::status))
        .route("/message", post(chat::message))
        .route("/explain", post(chat::explain))
        .route("/improve", post(chat::improve))
        .route("/tests", post(chat::tests))
}
