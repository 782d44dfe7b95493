//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create forum request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateForumRequest {
    /// Forum title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    /// Forum body text.
    #[validate(length(min = 1, max = 10000, message = "Description is required"))]
    pub description: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the forum is publicly visible.
    #[serde(default = "default_true")]
    pub is_public: bool,
}

fn default_true() -> bool {
    true
}

/// Update forum request body; absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateForumRequest {
    /// New title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    /// New body text.
    pub description: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// New visibility.
    pub is_public: Option<bool>,
}

/// Create response request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateResponseRequest {
    /// The parent forum.
    pub forum_id: Uuid,
    /// Response body text.
    #[validate(length(min = 1, max = 10000, message = "Comment is required"))]
    pub comment: String,
}

/// Update response request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateResponseRequest {
    /// New response body text.
    #[validate(length(min = 1, max = 10000, message = "Comment is required"))]
    pub comment: String,
}

/// Forum search query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Keyword matched against titles and tags.
    #[serde(default)]
    pub keyword: String,
    /// Sort order: `"liked"` for most-liked first, otherwise newest first.
    pub sort: Option<String>,
}
