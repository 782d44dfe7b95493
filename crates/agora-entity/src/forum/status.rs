//! Forum status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a forum still accepts responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "forum_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ForumStatus {
    /// Accepting responses.
    Open,
    /// Closed by its owner; read-only.
    Closed,
}

impl ForumStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ForumStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ForumStatus {
    type Err = agora_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(agora_core::AppError::validation(format!(
                "Invalid forum status: '{s}'. Expected one of: open, closed"
            ))),
        }
    }
}
