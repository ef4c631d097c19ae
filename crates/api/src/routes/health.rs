use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use coder_ai::AiStatus;
use coder_db::HealthReport;
use serde::Serialize;

use crate::state::AppState;

/// Liveness response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving requests.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// Readiness response payload.
#[derive(Serialize)]
pub struct ReadinessResponse {
    /// `"ready"` or `"not_ready"`.
    pub status: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
}

/// Detailed health payload for operators.
#[derive(Serialize)]
pub struct DetailedHealthResponse {
    pub status: &'static str,
    pub database: HealthReport,
    pub ai: AiStatus,
}

/// GET /health -- liveness, never touches the database.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/ready -- 503 while the database is unreachable.
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let db_healthy = coder_db::health_check(&state.pool).await.is_ok();

    let (code, status) = if db_healthy {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };
    (code, Json(ReadinessResponse { status, db_healthy }))
}

/// GET /health/detailed -- database probe, pool occupancy, and AI status.
async fn detailed(State(state): State<AppState>) -> (StatusCode, Json<DetailedHealthResponse>) {
    let database = coder_db::health_report(&state.pool).await;

    let (code, status) = if database.is_healthy() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    (
        code,
        Json(DetailedHealthResponse {
            status,
            database,
            ai: state.ai.status(),
        }),
    )
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness))
        .route("/health/detailed", get(detailed))
}
