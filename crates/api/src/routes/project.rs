//! Route definitions for the `/projects` resource and its files and
//! conversation history.

use axum::routing::get;
use axum::Router;

use crate::handlers::{conversation, project, project_file};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
///
/// GET    /{id}/files                -> project_file::list
/// POST   /{id}/files                -> project_file::save
/// GET    /{id}/files/{*path}        -> project_file::get_by_path
/// DELETE /{id}/files/{*path}        -> project_file::delete
///
/// GET    /{id}/conversations        -> conversation::list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route(
            "/{id}/files",
            get(project_file::list).post(project_file::save),
        )
        .route(
            "/{id}/files/{*path}",
            get(project_file::get_by_path).delete(project_file::delete),
        )
        .route("/{id}/conversations", get(conversation::list))
}
