//! Repository implementations for all Agora entities.

pub mod forum;
pub mod notification;
pub mod response;
pub mod user;

pub use forum::ForumRepository;
pub use notification::NotificationRepository;
pub use response::ResponseRepository;
pub use user::UserRepository;

use agora_entity::vote::VoteLedger;
use uuid::Uuid;

/// Row projection used while a vote target is locked: the owner plus the
/// four ledger columns.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct VoteTargetRow {
    pub created_by: Uuid,
    #[sqlx(flatten)]
    pub ledger: VoteLedger,
}
