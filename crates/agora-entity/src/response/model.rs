//! Response entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::vote::VoteLedger;

/// A response (answer) posted under a forum.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Response {
    /// Unique response identifier.
    pub id: Uuid,
    /// The user who wrote the response.
    pub created_by: Uuid,
    /// The parent forum.
    pub forum_id: Uuid,
    /// Response body text.
    pub comment: String,
    /// Soft-delete flag; archived responses are hidden, reject votes,
    /// and no longer count toward their author's points.
    pub is_archived: bool,
    /// Like/dislike state.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub ledger: VoteLedger,
    /// When the response was created.
    pub created_at: DateTime<Utc>,
    /// When the response was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A response joined with its author's display fields, for list views
/// and change-feed enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResponseWithAuthor {
    /// The response row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub response: Response,
    /// Author's username.
    pub author_username: String,
    /// Author's first name.
    pub author_first_name: String,
    /// Author's last name.
    pub author_last_name: String,
}

/// Data required to create a new response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    /// The responding user.
    pub created_by: Uuid,
    /// The parent forum.
    pub forum_id: Uuid,
    /// Response body text.
    pub comment: String,
}

/// Vote totals across a user's live responses, with votes the author
/// cast on their own responses excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct PointsAggregate {
    /// Likes received, minus self-likes.
    pub total_likes: i64,
    /// Dislikes received, minus self-dislikes.
    pub total_dislikes: i64,
    /// Number of non-archived responses authored.
    pub response_count: i64,
}
