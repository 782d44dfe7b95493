//! User domain entities.

pub mod model;

pub use model::{LeaderboardEntry, User, UserSummary};
