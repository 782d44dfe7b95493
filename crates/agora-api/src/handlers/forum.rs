//! Forum CRUD, search, lifecycle, and voting handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use agora_core::error::AppError;
use agora_entity::forum::UpdateForum;
use agora_entity::vote::VoteKind;

use crate::dto::request::{CreateForumRequest, SearchQuery, UpdateForumRequest};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/forums
pub async fn create_forum(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateForumRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let forum = state
        .forum_service
        .create(&auth, req.title, req.description, req.tags, req.is_public)
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": forum })))
}

/// GET /api/forums?page=&per_page=
pub async fn list_forums(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page = state
        .forum_service
        .list(&params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": page })))
}

/// GET /api/forums/search?keyword=&sort=
pub async fn search_forums(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let forums = state
        .forum_service
        .search(&query.keyword, query.sort.as_deref())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": forums })))
}

/// GET /api/forums/{id}
pub async fn get_forum(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let forum = state.forum_service.get(id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": forum })))
}

/// PUT /api/forums/{id}
pub async fn update_forum(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateForumRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let data = UpdateForum {
        title: req.title,
        description: req.description,
        tags: req.tags,
        is_public: req.is_public,
    };
    let forum = state.forum_service.update(&auth, id, data).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": forum })))
}

/// PUT /api/forums/{id}/close
pub async fn close_forum(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let forum = state.forum_service.close(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": forum })))
}

/// PUT /api/forums/{id}/open
pub async fn open_forum(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let forum = state.forum_service.open(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": forum })))
}

/// DELETE /api/forums/{id}
pub async fn delete_forum(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.forum_service.archive(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Forum deleted" } }),
    ))
}

/// POST /api/forums/{id}/like
pub async fn like_forum(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ledger = state
        .voting_service
        .toggle_forum_vote(&auth, id, VoteKind::Like)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": ledger })))
}

/// POST /api/forums/{id}/dislike
pub async fn dislike_forum(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ledger = state
        .voting_service
        .toggle_forum_vote(&auth, id, VoteKind::Dislike)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": ledger })))
}

/// GET /api/forums/{id}/saved-votes
pub async fn forum_saved_votes(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let votes = state.voting_service.forum_saved_votes(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": votes })))
}
