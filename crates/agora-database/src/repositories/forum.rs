//! Forum repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use agora_core::error::{AppError, ErrorKind};
use agora_core::result::AppResult;
use agora_core::types::pagination::{PageRequest, PageResponse};
use agora_entity::forum::{CreateForum, Forum, ForumStatus, ForumWithAuthor, UpdateForum};
use agora_entity::vote::{VoteKind, VoteMutation};

use super::VoteTargetRow;

const WITH_AUTHOR: &str = "SELECT f.*, u.username AS author_username, \
     u.first_name AS author_first_name, u.last_name AS author_last_name \
     FROM forums f JOIN users u ON u.id = f.created_by";

/// Repository for forum CRUD, search, and vote-ledger operations.
#[derive(Debug, Clone)]
pub struct ForumRepository {
    pool: PgPool,
}

impl ForumRepository {
    /// Create a new forum repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a forum by primary key, archived ones included.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Forum>> {
        sqlx::query_as::<_, Forum>("SELECT * FROM forums WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find forum by id", e)
            })
    }

    /// Create a new forum.
    pub async fn create(&self, data: &CreateForum) -> AppResult<Forum> {
        sqlx::query_as::<_, Forum>(
            "INSERT INTO forums (created_by, title, description, tags, is_public) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(data.created_by)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.tags)
        .bind(data.is_public)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create forum", e))
    }

    /// List live forums with their authors, newest first.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<ForumWithAuthor>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM forums WHERE is_archived = FALSE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count forums", e)
                })?;

        let sql = format!(
            "{WITH_AUTHOR} WHERE f.is_archived = FALSE \
             ORDER BY f.created_at DESC LIMIT $1 OFFSET $2"
        );
        let forums = sqlx::query_as::<_, ForumWithAuthor>(&sql)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list forums", e))?;

        Ok(PageResponse::new(
            forums,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Search live forums by keyword against title and tags.
    ///
    /// `sort_by_likes` orders most-liked first; otherwise newest first.
    pub async fn search(
        &self,
        keyword: &str,
        sort_by_likes: bool,
    ) -> AppResult<Vec<ForumWithAuthor>> {
        let order = if sort_by_likes {
            "f.likes DESC, f.created_at DESC"
        } else {
            "f.created_at DESC"
        };
        let sql = format!(
            "{WITH_AUTHOR} WHERE f.is_archived = FALSE \
             AND (f.title ILIKE $1 \
                  OR EXISTS (SELECT 1 FROM unnest(f.tags) AS tag WHERE tag ILIKE $1)) \
             ORDER BY {order}"
        );

        sqlx::query_as::<_, ForumWithAuthor>(&sql)
            .bind(format!("%{keyword}%"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search forums", e))
    }

    /// Update a forum's editable fields.
    pub async fn update(&self, id: Uuid, data: &UpdateForum) -> AppResult<Option<Forum>> {
        sqlx::query_as::<_, Forum>(
            "UPDATE forums SET title = COALESCE($2, title), \
                               description = COALESCE($3, description), \
                               tags = COALESCE($4, tags), \
                               is_public = COALESCE($5, is_public), \
                               updated_at = NOW() \
             WHERE id = $1 AND is_archived = FALSE RETURNING *",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.tags)
        .bind(data.is_public)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update forum", e))
    }

    /// Open or close a forum for new responses.
    pub async fn set_status(&self, id: Uuid, status: ForumStatus) -> AppResult<Option<Forum>> {
        sqlx::query_as::<_, Forum>(
            "UPDATE forums SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND is_archived = FALSE RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update forum status", e))
    }

    /// Soft-delete a forum.
    pub async fn archive(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE forums SET is_archived = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_archived = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to archive forum", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Toggle a like or dislike for `voter` on a forum.
    ///
    /// The read-toggle-write runs inside a transaction holding a row
    /// lock, so concurrent toggles on the same forum serialize and the
    /// counters stay equal to their set cardinalities. Returns `None`
    /// for a missing or archived forum.
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
             FROM forums WHERE id = $1 AND is_archived = FALSE FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock forum row", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut ledger = row.ledger;
        let cast = ledger.toggle(kind, voter);

        sqlx::query(
            "UPDATE forums SET likes = $2, dislikes = $3, liked_by = $4, disliked_by = $5, \
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
            AppError::with_source(ErrorKind::Database, "Failed to write forum vote ledger", e)
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
}
