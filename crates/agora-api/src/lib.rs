//! # agora-api
//!
//! HTTP API layer for Agora built on Axum.
//!
//! Provides the REST endpoints, the WebSocket push channel, the bearer-token
//! gate, DTOs, and error mapping. Wiring of repositories, services, and the
//! change-feed pipeline lives in [`app::run_server`].

pub mod app;
pub mod auth;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use error::ApiError;
pub use state::AppState;
