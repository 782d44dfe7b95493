//! Change-feed events describing committed document mutations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The watched collection a change originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Forum documents.
    Forums,
    /// Response documents.
    Responses,
}

/// The kind of mutation that was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    /// A new document was inserted.
    Insert,
    /// An existing document was updated.
    Update,
    /// A document was deleted.
    Delete,
}

/// A single committed mutation flowing from the database change feed
/// to the realtime publisher.
///
/// `document` holds the row as of the mutation (absent for deletes).
/// `data` is only populated for response inserts: a copy of the
/// document enriched with the author's display name, so listeners can
/// render new responses without a follow-up fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Source collection.
    pub collection: Collection,
    /// Mutation kind.
    pub op: ChangeOp,
    /// Primary key of the affected document.
    pub id: Uuid,
    /// Full document, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<serde_json::Value>,
    /// Enriched document copy (response inserts only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ChangeEvent {
    /// Create an event without a document payload.
    pub fn new(collection: Collection, op: ChangeOp, id: Uuid) -> Self {
        Self {
            collection,
            op,
            id,
            document: None,
            data: None,
        }
    }

    /// Attach the full document payload.
    pub fn with_document(mut self, document: serde_json::Value) -> Self {
        self.document = Some(document);
        self
    }

    /// Attach the enriched document copy.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
