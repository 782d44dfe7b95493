//! Notification and source kind enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vote::VoteKind;

/// The action that triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone liked the recipient's forum.
    ForumLike,
    /// Someone disliked the recipient's forum.
    ForumDislike,
    /// Someone responded to the recipient's forum.
    ForumResponse,
    /// Someone liked the recipient's response.
    ResponseLike,
    /// Someone disliked the recipient's response.
    ResponseDislike,
}

impl NotificationKind {
    /// Kind for a vote cast on the given source.
    pub fn for_vote(source: SourceKind, vote: VoteKind) -> Self {
        match (source, vote) {
            (SourceKind::Forum, VoteKind::Like) => Self::ForumLike,
            (SourceKind::Forum, VoteKind::Dislike) => Self::ForumDislike,
            (SourceKind::Response, VoteKind::Like) => Self::ResponseLike,
            (SourceKind::Response, VoteKind::Dislike) => Self::ResponseDislike,
        }
    }

    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForumLike => "forum_like",
            Self::ForumDislike => "forum_dislike",
            Self::ForumResponse => "forum_response",
            Self::ResponseLike => "response_like",
            Self::ResponseDislike => "response_dislike",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The document type a notification points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "source_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The source is a forum.
    Forum,
    /// The source is a response.
    Response,
}

impl SourceKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forum => "forum",
            Self::Response => "response",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
