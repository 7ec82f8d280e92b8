//! Blog model
//!
//! A blog belongs to exactly one user, owns its comments (removed with the
//! blog) and is associated with tags through a many-to-many relation (only
//! detached when the blog goes away).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Comment, Tag};

/// Blog entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Never null; defaulted to 0 when omitted on create/update
    pub likes: i64,
    /// Set once at creation, never changed afterwards
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful update
    pub updated_at: DateTime<Utc>,
    /// Owning user
    pub user_id: i64,
}

/// Blog together with its owned comments and associated tags
#[derive(Debug, Clone, Serialize)]
pub struct BlogDetail {
    #[serde(flatten)]
    pub blog: Blog,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
}

/// Input for creating a blog
#[derive(Debug, Clone, Deserialize)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub likes: Option<i64>,
    pub user_id: i64,
    /// Existing tags to associate at creation time
    #[serde(default)]
    pub tag_ids: Option<Vec<i64>>,
}

/// Input for updating a blog. Timestamps and ownership are not editable.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBlog {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub likes: Option<i64>,
}
