//! User repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use agora_core::error::{AppError, ErrorKind};
use agora_core::result::AppResult;
use agora_entity::user::{LeaderboardEntry, User};

/// Repository for user lookups and reputation updates.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Overwrite a user's points total and badge flag.
    ///
    /// Returns `false` when the user no longer exists, which callers
    /// treat as a no-op rather than an error.
    pub async fn update_points(&self, id: Uuid, points: i32, has_badge: bool) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET points = $2, has_badge = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(points)
        .bind(has_badge)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update points", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Top badge holders ordered by points.
    pub async fn leaderboard(&self, limit: i64) -> AppResult<Vec<LeaderboardEntry>> {
        sqlx::query_as::<_, LeaderboardEntry>(
            "SELECT id, username, first_name, last_name, points, has_badge \
             FROM users \
             WHERE has_badge = TRUE AND is_deleted = FALSE \
             ORDER BY points DESC, username ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load leaderboard", e))
    }
}
