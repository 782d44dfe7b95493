//! Response repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use agora_core::error::{AppError, ErrorKind};
use agora_core::result::AppResult;
use agora_entity::response::{CreateResponse, PointsAggregate, Response, ResponseWithAuthor};
use agora_entity::vote::{VoteKind, VoteMutation};

use super::VoteTargetRow;

/// Repository for response CRUD, vote-ledger operations, and the
/// per-author vote aggregate that feeds reputation scoring.
#[derive(Debug, Clone)]
pub struct ResponseRepository {
    pool: PgPool,
}

impl ResponseRepository {
    /// Create a new response repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a response by primary key, archived ones included.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Response>> {
        sqlx::query_as::<_, Response>("SELECT * FROM responses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find response by id", e)
            })
    }

    /// Create a new response.
    pub async fn create(&self, data: &CreateResponse) -> AppResult<Response> {
        sqlx::query_as::<_, Response>(
            "INSERT INTO responses (created_by, forum_id, comment) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(data.created_by)
        .bind(data.forum_id)
        .bind(&data.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create response", e))
    }

    /// List live responses under a forum with their authors, newest
    /// first.
    pub async fn find_by_forum(&self, forum_id: Uuid) -> AppResult<Vec<ResponseWithAuthor>> {
        sqlx::query_as::<_, ResponseWithAuthor>(
            "SELECT r.*, u.username AS author_username, \
                    u.first_name AS author_first_name, u.last_name AS author_last_name \
             FROM responses r JOIN users u ON u.id = r.created_by \
             WHERE r.forum_id = $1 AND r.is_archived = FALSE \
             ORDER BY r.created_at DESC",
        )
        .bind(forum_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list responses", e))
    }

    /// Count live responses under a forum.
    pub async fn count_by_forum(&self, forum_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM responses WHERE forum_id = $1 AND is_archived = FALSE",
        )
        .bind(forum_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count responses", e))
    }

    /// Replace a response's body text.
    pub async fn update_comment(&self, id: Uuid, comment: &str) -> AppResult<Option<Response>> {
        sqlx::query_as::<_, Response>(
            "UPDATE responses SET comment = $2, updated_at = NOW() \
             WHERE id = $1 AND is_archived = FALSE RETURNING *",
        )
        .bind(id)
        .bind(comment)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update response", e))
    }

    /// Soft-delete a response.
    pub async fn archive(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE responses SET is_archived = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_archived = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to archive response", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Toggle a like or dislike for `voter` on a response.
    ///
    /// Same row-locked transaction as the forum variant. Returns `None`
    /// for a missing or archived response.
    pub async fn toggle_vote(
        &self,
        id: Uuid,
        voter: Uuid,
        kind: VoteKind,
    ) -> AppResult<Option<VoteMutation>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin vote transaction", e)
        })?;

        let row = sqlx::query_as::<_, VoteTargetRow>(
            "SELECT created_by, likes, dislikes, liked_by, disliked_by \
             FROM responses WHERE id = $1 AND is_archived = FALSE FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to lock response row", e)
        })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut ledger = row.ledger;
        let cast = ledger.toggle(kind, voter);

        sqlx::query(
            "UPDATE responses SET likes = $2, dislikes = $3, liked_by = $4, disliked_by = $5, \
                                  updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(ledger.likes)
        .bind(ledger.dislikes)
        .bind(&ledger.liked_by)
        .bind(&ledger.disliked_by)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to write response vote ledger", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit vote transaction", e)
        })?;

        Ok(Some(VoteMutation {
            ledger,
            cast,
            owner_id: row.created_by,
        }))
    }

    /// Vote totals across a user's live responses, excluding votes the
    /// author cast on their own responses so self-votes never score.
    pub async fn points_aggregate(&self, user_id: Uuid) -> AppResult<PointsAggregate> {
        sqlx::query_as::<_, PointsAggregate>(
            "SELECT COALESCE(SUM(cardinality(array_remove(liked_by, created_by))), 0) AS total_likes, \
                    COALESCE(SUM(cardinality(array_remove(disliked_by, created_by))), 0) AS total_dislikes, \
                    COUNT(*) AS response_count \
             FROM responses WHERE created_by = $1 AND is_archived = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to aggregate response votes", e)
        })
    }
}
