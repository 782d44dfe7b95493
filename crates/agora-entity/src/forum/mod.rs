//! Forum domain entities.

pub mod model;
pub mod status;

pub use model::{CreateForum, Forum, ForumWithAuthor, UpdateForum};
pub use status::ForumStatus;
