//! # agora-database
//!
//! PostgreSQL connection management, concrete repository implementations
//! for all Agora entities, and the LISTEN/NOTIFY change-feed source.

pub mod connection;
pub mod feed;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use feed::PgChangeFeed;
