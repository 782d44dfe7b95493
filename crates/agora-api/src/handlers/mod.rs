//! Route handlers organized by domain.

pub mod forum;
pub mod health;
pub mod leaderboard;
pub mod notification;
pub mod response;
pub mod ws;
