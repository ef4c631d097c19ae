pub mod chat;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                   list, create
/// /projects/{id}                              get, update, delete
/// /projects/{id}/files                        list, save (upsert)
/// /projects/{id}/files/{*path}                get, delete
/// /projects/{id}/conversations                history (?limit=)
///
/// /chat/status                                AI gateway status
/// /chat/message                               generate code (project scoped)
/// /chat/explain                               explain code
/// /chat/improve                               suggest improvements
/// /chat/tests                                 generate tests
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/chat", chat::router())
}
