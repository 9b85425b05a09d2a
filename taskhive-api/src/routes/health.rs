/// Liveness and readiness endpoints
///
/// `GET /health` answers 200 whenever the process is up; it never touches
/// the store. `GET /ready` additionally checks store connectivity and
/// answers 503 until the database responds.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskhive_shared::db::pool;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,
}

/// Readiness response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyResponse {
    /// Service status
    pub status: String,

    /// Database status
    pub database: String,
}

/// Liveness handler
///
/// ```text
/// GET /health
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness handler
///
/// ```text
/// GET /ready
/// ```
///
/// Returns 503 while the store is unreachable so orchestration holds traffic
/// until the pool answers.
pub async fn readiness_check(State(state): State<AppState>) -> ApiResult<Json<ReadyResponse>> {
    pool::health_check(&state.db).await.map_err(|e| {
        tracing::warn!("Readiness check failed: {}", e);
        ApiError::ServiceUnavailable("Database unavailable".to_string())
    })?;

    Ok(Json(ReadyResponse {
        status: "ready".to_string(),
        database: "connected".to_string(),
    }))
}
