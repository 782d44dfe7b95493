//! User entity model.
//!
//! Accounts are owned by the identity subsystem; Agora reads identities
//! and writes only the derived `points` / `has_badge` pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// School the account is scoped to, if any.
    pub school_id: Option<Uuid>,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Unique login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Derived reputation score; only the points engine writes this.
    pub points: i32,
    /// Derived badge flag, true once points reach the threshold.
    pub has_badge: bool,
    /// Whether the account passed verification.
    pub is_verified: bool,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name used in enriched payloads.
    pub fn display_name(&self) -> &str {
        &self.username
    }
}

/// Display fields of a user, for joins and enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    /// User identifier.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
}

/// One row of the badge-holder leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    /// User identifier.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Current reputation score.
    pub points: i32,
    /// Badge flag (always true for leaderboard rows).
    pub has_badge: bool,
}
