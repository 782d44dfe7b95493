//! Notification fan-out and the notification inbox.

use std::sync::Arc;

use uuid::Uuid;

use agora_core::error::AppError;
use agora_core::result::AppResult;
use agora_database::repositories::NotificationRepository;
use agora_entity::notification::{Notification, NotificationKind, NotificationView, SourceKind};

use crate::context::RequestContext;

/// Creates activity notifications and manages each user's inbox.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification repository.
    notification_repo: Arc<NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notification_repo: Arc<NotificationRepository>) -> Self {
        Self { notification_repo }
    }

    /// Notify `recipient_id` about activity from `sender_id`.
    ///
    /// Self-directed notifications are silently skipped: users never
    /// hear about their own activity. Returns whether a row was
    /// written.
    pub async fn send(
        &self,
        recipient_id: Uuid,
        sender_id: Uuid,
        kind: NotificationKind,
        source_id: Uuid,
        source_kind: SourceKind,
    ) -> AppResult<bool> {
        if recipient_id == sender_id {
            return Ok(false);
        }

        self.notification_repo
            .create(recipient_id, sender_id, kind, source_id, source_kind)
            .await?;
        Ok(true)
    }

    /// Fire-and-forget variant of [`send`](Self::send): the insert runs
    /// on a detached task, so callers never wait on it and a failed
    /// write only produces a warning.
    pub fn send_detached(
        &self,
        recipient_id: Uuid,
        sender_id: Uuid,
        kind: NotificationKind,
        source_id: Uuid,
        source_kind: SourceKind,
    ) {
        if recipient_id == sender_id {
            return;
        }

        let repo = Arc::clone(&self.notification_repo);
        tokio::spawn(async move {
            if let Err(e) = repo
                .create(recipient_id, sender_id, kind, source_id, source_kind)
                .await
            {
                tracing::warn!(
                    "Failed to deliver {} notification to {}: {}",
                    kind,
                    recipient_id,
                    e
                );
            }
        });
    }

    /// Lists the current user's notifications, newest first, with
    /// sender and source context resolved.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<NotificationView>> {
        self.notification_repo
            .find_views_by_recipient(ctx.user_id)
            .await
    }

    /// Marks one of the current user's notifications as read.
    pub async fn mark_read(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Notification> {
        self.notification_repo
            .mark_read(id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }

    /// Deletes one of the current user's notifications.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if !self.notification_repo.delete(id, ctx.user_id).await? {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }
}
