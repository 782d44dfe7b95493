//! # agora-core
//!
//! Core crate for Agora. Contains configuration schemas, change-feed
//! event types, pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Agora crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
