//! Notification handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let notifications = state.notification_service.list(&auth).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": notifications }),
    ))
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let notification = state.notification_service.mark_read(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": notification }),
    ))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.notification_service.delete(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Notification deleted" } }),
    ))
}
