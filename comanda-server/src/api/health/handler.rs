//! Health Check Handler

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
    pub environment: String,
}

/// GET /api/health - liveness plus a database round-trip
pub async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthResponse>> {
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => "up",
        Err(e) => {
            tracing::error!("Health check database probe failed: {e}");
            "down"
        }
    };

    Ok(Json(HealthResponse {
        status: if database == "up" { "ok" } else { "degraded" },
        database,
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
    }))
}
