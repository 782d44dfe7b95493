//! Route definitions for the Agora HTTP API.
//!
//! All REST routes are organized by domain and mounted under `/api`; the
//! WebSocket push channel lives at `/ws`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use agora_core::config::server::CorsConfig;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Maximum accepted request body size. Forum and response bodies are text;
/// anything bigger than this is garbage or abuse.
const MAX_BODY_BYTES: usize = 256 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(forum_routes())
        .merge(response_routes())
        .merge(notification_routes())
        .merge(leaderboard_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_upgrade))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Forum CRUD, search, lifecycle, and voting
fn forum_routes() -> Router<AppState> {
    Router::new()
        .route("/forums", get(handlers::forum::list_forums))
        .route("/forums", post(handlers::forum::create_forum))
        .route("/forums/search", get(handlers::forum::search_forums))
        .route("/forums/{id}", get(handlers::forum::get_forum))
        .route("/forums/{id}", put(handlers::forum::update_forum))
        .route("/forums/{id}", delete(handlers::forum::delete_forum))
        .route("/forums/{id}/close", put(handlers::forum::close_forum))
        .route("/forums/{id}/open", put(handlers::forum::open_forum))
        .route("/forums/{id}/like", post(handlers::forum::like_forum))
        .route("/forums/{id}/dislike", post(handlers::forum::dislike_forum))
        .route(
            "/forums/{id}/saved-votes",
            get(handlers::forum::forum_saved_votes),
        )
}

/// Response CRUD and voting, including the forum-scoped listing
fn response_routes() -> Router<AppState> {
    Router::new()
        .route("/responses", post(handlers::response::create_response))
        .route(
            "/forums/{id}/responses",
            get(handlers::response::list_forum_responses),
        )
        .route(
            "/forums/{id}/responses/count",
            get(handlers::response::count_forum_responses),
        )
        .route("/responses/{id}", put(handlers::response::update_response))
        .route(
            "/responses/{id}",
            delete(handlers::response::delete_response),
        )
        .route(
            "/responses/{id}/like",
            post(handlers::response::like_response),
        )
        .route(
            "/responses/{id}/dislike",
            post(handlers::response::dislike_response),
        )
        .route(
            "/responses/{id}/saved-votes",
            get(handlers::response::response_saved_votes),
        )
}

/// Notification endpoints
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::notification::mark_read),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete_notification),
        )
}

/// Leaderboard endpoint
fn leaderboard_routes() -> Router<AppState> {
    Router::new().route("/leaderboard", get(handlers::leaderboard::leaderboard))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Build CORS layer from configuration
fn build_cors_layer(cors_config: &CorsConfig) -> CorsLayer {
    use axum::http::{HeaderValue, Method};
    use tower_http::cors::Any;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    }

    cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds))
}
