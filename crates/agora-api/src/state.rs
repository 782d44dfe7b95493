//! Shared application state for all handlers.

use std::sync::Arc;

use agora_core::config::AppConfig;
use agora_database::DatabasePool;
use agora_realtime::ListenerRegistry;
use agora_service::{
    ForumService, LeaderboardService, NotificationService, ResponseService, VotingService,
};

use crate::auth::TokenVerifier;

/// Application state shared across all request handlers.
///
/// Passed to every Axum handler via `State<AppState>`. Services are cheap
/// `Clone` handles over `Arc`-wrapped repositories, so cloning the whole
/// state per request costs a handful of reference-count bumps.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────────
    /// Application configuration.
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────────
    /// Database pool, used directly only by the health endpoints.
    pub db: DatabasePool,
    /// Bearer-token verifier for the authentication gate.
    pub token_verifier: Arc<TokenVerifier>,

    // ── Services ─────────────────────────────────────────────────
    /// Forum CRUD, search, and status flips.
    pub forum_service: ForumService,
    /// Response CRUD under forums.
    pub response_service: ResponseService,
    /// Like/dislike toggling with points recompute and fan-out.
    pub voting_service: VotingService,
    /// Notification listing, read marking, and deletion.
    pub notification_service: NotificationService,
    /// Badge-holder leaderboard.
    pub leaderboard_service: LeaderboardService,

    // ── Realtime ─────────────────────────────────────────────────
    /// Registry of connected WebSocket listeners.
    pub registry: Arc<ListenerRegistry>,
}
