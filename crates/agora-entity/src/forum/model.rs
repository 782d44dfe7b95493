//! Forum entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ForumStatus;
use crate::vote::VoteLedger;

/// A forum: a question or discussion topic other users respond to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Forum {
    /// Unique forum identifier.
    pub id: Uuid,
    /// The user who created the forum.
    pub created_by: Uuid,
    /// Forum title.
    pub title: String,
    /// Forum body text.
    pub description: String,
    /// Free-form tags for search.
    pub tags: Vec<String>,
    /// Whether the forum is publicly visible.
    pub is_public: bool,
    /// Whether the forum accepts new responses.
    pub status: ForumStatus,
    /// Soft-delete flag; archived forums are hidden and reject votes.
    pub is_archived: bool,
    /// Like/dislike state.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub ledger: VoteLedger,
    /// When the forum was created.
    pub created_at: DateTime<Utc>,
    /// When the forum was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Forum {
    /// Whether the forum is open for responses.
    pub fn is_open(&self) -> bool {
        self.status == ForumStatus::Open && !self.is_archived
    }
}

/// A forum joined with its author's display fields, for list views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ForumWithAuthor {
    /// The forum row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub forum: Forum,
    /// Author's username.
    pub author_username: String,
    /// Author's first name.
    pub author_first_name: String,
    /// Author's last name.
    pub author_last_name: String,
}

/// Data required to create a new forum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateForum {
    /// The creating user.
    pub created_by: Uuid,
    /// Forum title.
    pub title: String,
    /// Forum body text.
    pub description: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Whether the forum is publicly visible.
    pub is_public: bool,
}

/// Owner-editable forum fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateForum {
    /// New title.
    pub title: Option<String>,
    /// New body text.
    pub description: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// New visibility.
    pub is_public: Option<bool>,
}
