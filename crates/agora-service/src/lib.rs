//! # agora-service
//!
//! Business logic service layer for Agora. Each service orchestrates
//! repositories to implement application-level use cases: forum and
//! response CRUD, vote toggling with its side effects, reputation
//! scoring, and notification fan-out.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod forum;
pub mod leaderboard;
pub mod notify;
pub mod points;
pub mod response;
pub mod voting;

pub use context::RequestContext;
pub use forum::ForumService;
pub use leaderboard::LeaderboardService;
pub use notify::NotificationService;
pub use points::PointsService;
pub use response::ResponseService;
pub use voting::{SavedVotes, VotingService};
