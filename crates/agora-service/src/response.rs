//! Response CRUD under forums.

use std::sync::Arc;

use uuid::Uuid;

use agora_core::error::AppError;
use agora_core::result::AppResult;
use agora_database::repositories::{ForumRepository, ResponseRepository};
use agora_entity::notification::{NotificationKind, SourceKind};
use agora_entity::response::{CreateResponse, Response, ResponseWithAuthor};

use crate::context::RequestContext;
use crate::notify::NotificationService;

/// Manages response documents.
#[derive(Debug, Clone)]
pub struct ResponseService {
    /// Response repository.
    response_repo: Arc<ResponseRepository>,
    /// Forum repository, for parent lookups.
    forum_repo: Arc<ForumRepository>,
    /// Notification fan-out.
    notifications: NotificationService,
}

impl ResponseService {
    /// Creates a new response service.
    pub fn new(
        response_repo: Arc<ResponseRepository>,
        forum_repo: Arc<ForumRepository>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            response_repo,
            forum_repo,
            notifications,
        }
    }

    /// Creates a response under a forum and notifies the forum owner.
    ///
    /// The parent forum must exist and be open; the owner responding to
    /// their own forum produces no notification.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        forum_id: Uuid,
        comment: String,
    ) -> AppResult<Response> {
        if comment.trim().is_empty() {
            return Err(AppError::validation("Response comment cannot be empty"));
        }

        let forum = self
            .forum_repo
            .find_by_id(forum_id)
            .await?
            .filter(|f| !f.is_archived)
            .ok_or_else(|| AppError::not_found("Forum not found"))?;
        if !forum.is_open() {
            return Err(AppError::conflict("Forum is closed to new responses"));
        }

        let data = CreateResponse {
            created_by: ctx.user_id,
            forum_id,
            comment,
        };
        let response = self.response_repo.create(&data).await?;

        self.notifications.send_detached(
            forum.created_by,
            ctx.user_id,
            NotificationKind::ForumResponse,
            response.id,
            SourceKind::Response,
        );

        Ok(response)
    }

    /// Gets a live response by ID.
    pub async fn get(&self, response_id: Uuid) -> AppResult<Response> {
        self.response_repo
            .find_by_id(response_id)
            .await?
            .filter(|r| !r.is_archived)
            .ok_or_else(|| AppError::not_found("Response not found"))
    }

    /// Lists live responses under a forum, newest first.
    pub async fn list_by_forum(&self, forum_id: Uuid) -> AppResult<Vec<ResponseWithAuthor>> {
        self.forum_repo
            .find_by_id(forum_id)
            .await?
            .filter(|f| !f.is_archived)
            .ok_or_else(|| AppError::not_found("Forum not found"))?;

        self.response_repo.find_by_forum(forum_id).await
    }

    /// Counts live responses under a forum.
    pub async fn count_by_forum(&self, forum_id: Uuid) -> AppResult<i64> {
        self.response_repo.count_by_forum(forum_id).await
    }

    /// Replaces a response's comment. Owner only.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        response_id: Uuid,
        comment: String,
    ) -> AppResult<Response> {
        if comment.trim().is_empty() {
            return Err(AppError::validation("Response comment cannot be empty"));
        }

        let response = self.get(response_id).await?;
        if response.created_by != ctx.user_id {
            return Err(AppError::authorization(
                "Only the response author can edit it",
            ));
        }

        self.response_repo
            .update_comment(response_id, &comment)
            .await?
            .ok_or_else(|| AppError::not_found("Response not found"))
    }

    /// Soft-deletes a response. Owner only.
    pub async fn archive(&self, ctx: &RequestContext, response_id: Uuid) -> AppResult<()> {
        let response = self.get(response_id).await?;
        if response.created_by != ctx.user_id {
            return Err(AppError::authorization(
                "Only the response author can delete it",
            ));
        }

        if !self.response_repo.archive(response_id).await? {
            return Err(AppError::not_found("Response not found"));
        }
        tracing::info!("Response {} archived by {}", response_id, ctx.username);
        Ok(())
    }
}
