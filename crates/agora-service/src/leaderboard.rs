//! Leaderboard of top contributors.

use std::sync::Arc;

use agora_core::result::AppResult;
use agora_database::repositories::UserRepository;
use agora_entity::user::LeaderboardEntry;

/// How many contributors the leaderboard shows.
const LEADERBOARD_SIZE: i64 = 10;

/// Serves the badge-holder leaderboard.
#[derive(Debug, Clone)]
pub struct LeaderboardService {
    /// User repository.
    user_repo: Arc<UserRepository>,
}

impl LeaderboardService {
    /// Creates a new leaderboard service.
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// The top badge holders, ordered by points.
    pub async fn top_contributors(&self) -> AppResult<Vec<LeaderboardEntry>> {
        self.user_repo.leaderboard(LEADERBOARD_SIZE).await
    }
}
