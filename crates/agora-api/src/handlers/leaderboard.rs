//! Leaderboard handler.

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let entries = state.leaderboard_service.top_contributors().await?;
    Ok(Json(serde_json::json!({ "success": true, "data": entries })))
}
