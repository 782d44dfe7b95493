//! Notification repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use agora_core::error::{AppError, ErrorKind};
use agora_core::result::AppResult;
use agora_entity::notification::{Notification, NotificationKind, NotificationView, SourceKind};

/// Repository for notification CRUD operations.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a notification.
    ///
    /// The table enforces `recipient <> sender`; callers are expected
    /// to skip self-notifications before reaching here.
    pub async fn create(
        &self,
        recipient_id: Uuid,
        sender_id: Uuid,
        kind: NotificationKind,
        source_id: Uuid,
        source_kind: SourceKind,
    ) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (recipient_id, sender_id, kind, source_id, source_kind) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(recipient_id)
        .bind(sender_id)
        .bind(kind)
        .bind(source_id)
        .bind(source_kind)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("notifications_no_self_notify") =>
            {
                AppError::conflict("Users are not notified about their own activity".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create notification", e),
        })
    }

    /// List a user's notifications, newest first, with the sender and
    /// vote-target context resolved in one query.
    ///
    /// Forum-sourced rows join the forum directly; response-sourced
    /// rows join through the response to its parent forum. Titles fall
    /// back to "Untitled" when the source has since been deleted.
    pub async fn find_views_by_recipient(
        &self,
        recipient_id: Uuid,
    ) -> AppResult<Vec<NotificationView>> {
        sqlx::query_as::<_, NotificationView>(
            "SELECT n.*, \
                    u.username AS sender_username, \
                    u.first_name AS sender_first_name, \
                    u.last_name AS sender_last_name, \
                    COALESCE(f.id, r.forum_id) AS forum_id, \
                    COALESCE(f.title, rf.title, 'Untitled') AS forum_title, \
                    r.comment AS response_comment \
             FROM notifications n \
             JOIN users u ON u.id = n.sender_id \
             LEFT JOIN forums f ON n.source_kind = 'forum' AND f.id = n.source_id \
             LEFT JOIN responses r ON n.source_kind = 'response' AND r.id = n.source_id \
             LEFT JOIN forums rf ON rf.id = r.forum_id \
             WHERE n.recipient_id = $1 \
             ORDER BY n.created_at DESC",
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    /// Mark a notification as read, scoped to its recipient.
    pub async fn mark_read(
        &self,
        notification_id: Uuid,
        recipient_id: Uuid,
    ) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE \
             WHERE id = $1 AND recipient_id = $2 RETURNING *",
        )
        .bind(notification_id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))
    }

    /// Delete a notification, scoped to its recipient.
    pub async fn delete(&self, notification_id: Uuid, recipient_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_id = $2")
            .bind(notification_id)
            .bind(recipient_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
