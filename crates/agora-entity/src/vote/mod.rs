//! Vote ledger domain types.

pub mod kind;
pub mod ledger;

pub use kind::VoteKind;
pub use ledger::{IdentitySet, VoteLedger, VoteMutation};
