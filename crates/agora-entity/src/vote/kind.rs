//! Vote direction enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a vote toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    /// A like vote.
    Like,
    /// A dislike vote.
    Dislike,
}

impl VoteKind {
    /// Return the opposing direction.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Like => Self::Dislike,
            Self::Dislike => Self::Like,
        }
    }

    /// Return the direction as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
