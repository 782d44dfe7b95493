//! Notification domain entities.

pub mod kind;
pub mod model;

pub use kind::{NotificationKind, SourceKind};
pub use model::{Notification, NotificationView};
