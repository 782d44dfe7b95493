//! Response CRUD and voting handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;
use validator::Validate;

use agora_core::error::AppError;
use agora_entity::vote::VoteKind;

use crate::dto::request::{CreateResponseRequest, UpdateResponseRequest};
use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/responses
pub async fn create_response(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateResponseRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let response = state
        .response_service
        .create(&auth, req.forum_id, req.comment)
        .await?;

    Ok(Json(
        serde_json::json!({ "success": true, "data": response }),
    ))
}

/// GET /api/forums/{id}/responses
pub async fn list_forum_responses(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(forum_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let responses = state.response_service.list_by_forum(forum_id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": responses }),
    ))
}

/// GET /api/forums/{id}/responses/count
pub async fn count_forum_responses(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(forum_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.response_service.count_by_forum(forum_id).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/responses/{id}
pub async fn update_response(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateResponseRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let response = state.response_service.update(&auth, id, req.comment).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": response }),
    ))
}

/// DELETE /api/responses/{id}
pub async fn delete_response(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.response_service.archive(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Response deleted" } }),
    ))
}

/// POST /api/responses/{id}/like
pub async fn like_response(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ledger = state
        .voting_service
        .toggle_response_vote(&auth, id, VoteKind::Like)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": ledger })))
}

/// POST /api/responses/{id}/dislike
pub async fn dislike_response(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ledger = state
        .voting_service
        .toggle_response_vote(&auth, id, VoteKind::Dislike)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": ledger })))
}

/// GET /api/responses/{id}/saved-votes
pub async fn response_saved_votes(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let votes = state.voting_service.response_saved_votes(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": votes })))
}
