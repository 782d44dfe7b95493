//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let database_up = state.db.health_check().await.unwrap_or(false);

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: if database_up { "ok" } else { "degraded" }.to_string(),
        database: if database_up {
            "connected"
        } else {
            "unreachable"
        }
        .to_string(),
        listeners: state.registry.listener_count(),
    }))
}
