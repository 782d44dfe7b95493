//! Application builder — wires repositories, services, the change-feed
//! pipeline, and the HTTP server together.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use agora_core::config::AppConfig;
use agora_core::error::AppError;
use agora_database::repositories::{
    ForumRepository, NotificationRepository, ResponseRepository, UserRepository,
};
use agora_database::{DatabasePool, PgChangeFeed};
use agora_realtime::{ChangeFeedPublisher, ListenerRegistry};
use agora_service::{
    ForumService, LeaderboardService, NotificationService, PointsService, ResponseService,
    VotingService,
};

use crate::auth::TokenVerifier;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the shared application state from configuration and a connected
/// database pool.
///
/// Also returns the listener registry so the caller can hand it to the
/// change-feed publisher; the registry inside the state is the same one.
pub fn build_state(config: AppConfig, db: DatabasePool) -> (AppState, Arc<ListenerRegistry>) {
    // ── Repositories ─────────────────────────────────────────────
    let user_repo = Arc::new(UserRepository::new(db.pool().clone()));
    let forum_repo = Arc::new(ForumRepository::new(db.pool().clone()));
    let response_repo = Arc::new(ResponseRepository::new(db.pool().clone()));
    let notification_repo = Arc::new(NotificationRepository::new(db.pool().clone()));

    // ── Services ─────────────────────────────────────────────────
    let notification_service = NotificationService::new(Arc::clone(&notification_repo));
    let points_service = PointsService::new(Arc::clone(&response_repo), Arc::clone(&user_repo));
    let voting_service = VotingService::new(
        Arc::clone(&forum_repo),
        Arc::clone(&response_repo),
        notification_service.clone(),
        points_service,
    );
    let forum_service = ForumService::new(Arc::clone(&forum_repo));
    let response_service = ResponseService::new(
        Arc::clone(&response_repo),
        Arc::clone(&forum_repo),
        notification_service.clone(),
    );
    let leaderboard_service = LeaderboardService::new(Arc::clone(&user_repo));

    // ── Realtime registry ────────────────────────────────────────
    let registry = Arc::new(ListenerRegistry::new(config.realtime.listener_buffer_size));

    let token_verifier = Arc::new(TokenVerifier::new(&config.auth));

    let state = AppState {
        config: Arc::new(config),
        db,
        token_verifier,
        forum_service,
        response_service,
        voting_service,
        notification_service,
        leaderboard_service,
        registry: Arc::clone(&registry),
    };

    (state, registry)
}

/// Runs the Agora server with the given configuration and database pool.
///
/// Spawns the change-feed pipeline (Postgres LISTEN/NOTIFY source and the
/// WebSocket publisher), serves HTTP until a shutdown signal arrives, then
/// drains the background tasks within the configured grace period.
pub async fn run_server(config: AppConfig, db: DatabasePool) -> Result<(), AppError> {
    let realtime = config.realtime.clone();
    let server = config.server.clone();

    let (state, registry) = build_state(config, db.clone());

    // ── Change-feed pipeline ─────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (event_tx, event_rx) = mpsc::channel(realtime.feed_buffer_size);

    let feed = PgChangeFeed::new(db.pool().clone(), &realtime.feed_channel);
    let feed_handle = feed.spawn(event_tx, shutdown_rx.clone());

    let publisher = ChangeFeedPublisher::new(registry);
    let publisher_handle = publisher.spawn(event_rx, shutdown_rx);

    // ── HTTP server ──────────────────────────────────────────────
    let app = build_router(state);
    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Agora server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received, stopping");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Drain background tasks ───────────────────────────────────
    let grace = Duration::from_secs(server.shutdown_grace_seconds);
    let drain = async {
        let _ = feed_handle.await;
        let _ = publisher_handle.await;
    };
    if tokio::time::timeout(grace, drain).await.is_err() {
        warn!("Background tasks did not stop within the shutdown grace period");
    }

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}
