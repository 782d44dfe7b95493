//! Reputation scoring.
//!
//! A user's points are always recomputed from scratch out of their
//! response vote totals rather than adjusted incrementally, so the
//! stored total cannot drift when votes are withdrawn or flipped.

use std::sync::Arc;

use uuid::Uuid;

use agora_core::result::AppResult;
use agora_database::repositories::{ResponseRepository, UserRepository};

/// Points required to hold the contributor badge.
pub const BADGE_THRESHOLD: i32 = 100;

/// Compute a user's reputation from their response vote totals.
///
/// Users in good standing (likes >= dislikes) keep half the net like
/// margin plus two points per response; users with more dislikes than
/// likes lose 0.8 per net dislike, softened by 1.5 per response. The
/// result is rounded and floored at zero.
pub fn compute_points(likes: i64, dislikes: i64, responses: i64) -> i32 {
    let net = (likes - dislikes) as f64;
    let raw = if likes >= dislikes {
        net * 0.5 + responses as f64 * 2.0
    } else {
        net * 0.8 + responses as f64 * 1.5
    };
    raw.round().max(0.0) as i32
}

/// Recomputes and persists user reputation.
#[derive(Debug, Clone)]
pub struct PointsService {
    /// Response repository, for the vote aggregate.
    response_repo: Arc<ResponseRepository>,
    /// User repository, for the points write-back.
    user_repo: Arc<UserRepository>,
}

impl PointsService {
    /// Creates a new points service.
    pub fn new(response_repo: Arc<ResponseRepository>, user_repo: Arc<UserRepository>) -> Self {
        Self {
            response_repo,
            user_repo,
        }
    }

    /// Recompute a user's points from their response vote totals and
    /// persist the result, awarding or withdrawing the badge as the
    /// total crosses the threshold.
    ///
    /// Returns the new total, or `None` when the user no longer exists.
    pub async fn recompute(&self, user_id: Uuid) -> AppResult<Option<i32>> {
        let Some(user) = self.user_repo.find_by_id(user_id).await? else {
            return Ok(None);
        };

        let totals = self.response_repo.points_aggregate(user_id).await?;
        let points = compute_points(
            totals.total_likes,
            totals.total_dislikes,
            totals.response_count,
        );
        let has_badge = points >= BADGE_THRESHOLD;

        self.user_repo
            .update_points(user_id, points, has_badge)
            .await?;

        if has_badge && !user.has_badge {
            tracing::info!(
                "User {} earned the contributor badge at {} points",
                user_id,
                points
            );
        }

        Ok(Some(points))
    }
}
