//! Wire envelopes for change-feed frames.

use serde::{Deserialize, Serialize};

use agora_core::events::{ChangeEvent, Collection};
use agora_core::result::AppResult;

/// The envelope every feed frame is wrapped in before it reaches a
/// listener: a collection-specific `type` discriminator plus the change
/// event as `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FeedEnvelope {
    /// A forum document changed.
    ForumUpdate {
        /// The change event.
        data: ChangeEvent,
    },
    /// A response document changed.
    ResponseUpdate {
        /// The change event.
        data: ChangeEvent,
    },
}

impl FeedEnvelope {
    /// Wrap a change event in its collection's envelope.
    pub fn for_event(event: ChangeEvent) -> Self {
        match event.collection {
            Collection::Forums => Self::ForumUpdate { data: event },
            Collection::Responses => Self::ResponseUpdate { data: event },
        }
    }

    /// The wire value of the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ForumUpdate { .. } => "forumUpdate",
            Self::ResponseUpdate { .. } => "responseUpdate",
        }
    }

    /// Serialize to a text frame.
    pub fn to_frame(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
