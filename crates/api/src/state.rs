use std::sync::Arc;

use coder_ai::AiGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Built once in `main` and cloned per request; every field is a handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: coder_db::DbPool,
    /// Server configuration (CORS, timeouts, identity header).
    pub config: Arc<ServerConfig>,
    /// AI gateway; disabled when no provider key was configured.
    pub ai: Arc<AiGateway>,
}
