//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::{NotificationKind, SourceKind};

/// A notification delivered to a user.
///
/// Created once per qualifying action; only `is_read` changes afterwards.
/// A notification never targets its own sender.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub recipient_id: Uuid,
    /// The user whose action triggered the notification.
    pub sender_id: Uuid,
    /// What happened.
    pub kind: NotificationKind,
    /// The forum or response the action targeted.
    pub source_id: Uuid,
    /// Which document type `source_id` refers to.
    pub source_kind: SourceKind,
    /// Whether the recipient has read the notification.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// A notification joined with sender display fields and resolved source
/// context, as returned by the list endpoint.
///
/// For forum sources `forum_title`/`forum_id` name the forum itself; for
/// response sources they name the parent forum and `response_comment`
/// carries the response text.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationView {
    /// The notification row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub notification: Notification,
    /// Sender's username.
    pub sender_username: String,
    /// Sender's first name.
    pub sender_first_name: String,
    /// Sender's last name.
    pub sender_last_name: String,
    /// The forum this notification traces back to, when still present.
    pub forum_id: Option<Uuid>,
    /// Resolved forum title (`"Untitled"` when the forum is gone).
    pub forum_title: String,
    /// Response text, for response-sourced notifications.
    pub response_comment: Option<String>,
}
