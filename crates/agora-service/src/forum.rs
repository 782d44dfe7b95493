//! Forum CRUD, search, and lifecycle.

use std::sync::Arc;

use uuid::Uuid;

use agora_core::error::AppError;
use agora_core::result::AppResult;
use agora_core::types::pagination::{PageRequest, PageResponse};
use agora_database::repositories::ForumRepository;
use agora_entity::forum::{CreateForum, Forum, ForumStatus, ForumWithAuthor, UpdateForum};

use crate::context::RequestContext;

/// Manages forum documents.
#[derive(Debug, Clone)]
pub struct ForumService {
    /// Forum repository.
    forum_repo: Arc<ForumRepository>,
}

impl ForumService {
    /// Creates a new forum service.
    pub fn new(forum_repo: Arc<ForumRepository>) -> Self {
        Self { forum_repo }
    }

    /// Creates a forum owned by the current user.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        title: String,
        description: String,
        tags: Vec<String>,
        is_public: bool,
    ) -> AppResult<Forum> {
        if title.trim().is_empty() {
            return Err(AppError::validation("Forum title cannot be empty"));
        }

        let data = CreateForum {
            created_by: ctx.user_id,
            title,
            description,
            tags,
            is_public,
        };
        let forum = self.forum_repo.create(&data).await?;
        tracing::info!("Forum {} created by {}", forum.id, ctx.username);
        Ok(forum)
    }

    /// Gets a live forum by ID.
    pub async fn get(&self, forum_id: Uuid) -> AppResult<Forum> {
        self.require_forum(forum_id).await
    }

    /// Lists live forums with their authors, newest first.
    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<ForumWithAuthor>> {
        self.forum_repo.find_all(page).await
    }

    /// Searches live forums by keyword against titles and tags.
    pub async fn search(
        &self,
        keyword: &str,
        sort: Option<&str>,
    ) -> AppResult<Vec<ForumWithAuthor>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::validation("Search keyword is required"));
        }

        self.forum_repo.search(keyword, sort == Some("liked")).await
    }

    /// Updates a forum's editable fields. Owner only.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        forum_id: Uuid,
        data: UpdateForum,
    ) -> AppResult<Forum> {
        let forum = self.require_forum(forum_id).await?;
        if forum.created_by != ctx.user_id {
            return Err(AppError::authorization("Only the forum owner can edit it"));
        }
        if let Some(title) = &data.title {
            if title.trim().is_empty() {
                return Err(AppError::validation("Forum title cannot be empty"));
            }
        }

        self.forum_repo
            .update(forum_id, &data)
            .await?
            .ok_or_else(|| AppError::not_found("Forum not found"))
    }

    /// Closes a forum to new responses. Owner only.
    pub async fn close(&self, ctx: &RequestContext, forum_id: Uuid) -> AppResult<Forum> {
        self.set_status(ctx, forum_id, ForumStatus::Closed).await
    }

    /// Reopens a forum for responses. Owner only.
    pub async fn open(&self, ctx: &RequestContext, forum_id: Uuid) -> AppResult<Forum> {
        self.set_status(ctx, forum_id, ForumStatus::Open).await
    }

    /// Soft-deletes a forum. Owner only.
    pub async fn archive(&self, ctx: &RequestContext, forum_id: Uuid) -> AppResult<()> {
        let forum = self.require_forum(forum_id).await?;
        if forum.created_by != ctx.user_id {
            return Err(AppError::authorization("Only the forum owner can delete it"));
        }

        if !self.forum_repo.archive(forum_id).await? {
            return Err(AppError::not_found("Forum not found"));
        }
        tracing::info!("Forum {} archived by {}", forum_id, ctx.username);
        Ok(())
    }

    async fn set_status(
        &self,
        ctx: &RequestContext,
        forum_id: Uuid,
        status: ForumStatus,
    ) -> AppResult<Forum> {
        let forum = self.require_forum(forum_id).await?;
        if forum.created_by != ctx.user_id {
            return Err(AppError::authorization(
                "Only the forum owner can change its status",
            ));
        }

        self.forum_repo
            .set_status(forum_id, status)
            .await?
            .ok_or_else(|| AppError::not_found("Forum not found"))
    }

    /// Loads a forum, treating archived ones as absent.
    async fn require_forum(&self, forum_id: Uuid) -> AppResult<Forum> {
        self.forum_repo
            .find_by_id(forum_id)
            .await?
            .filter(|f| !f.is_archived)
            .ok_or_else(|| AppError::not_found("Forum not found"))
    }
}
