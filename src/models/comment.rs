//! Comment model
//!
//! The commenter is referenced by username as validated free text, not as a
//! structural foreign key: the username must resolve to a user at write time
//! but is stored verbatim on the comment row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    /// Never null; defaulted to 0 when omitted on create/update
    pub likes: i64,
    /// Set once at creation
    pub commented_at: DateTime<Utc>,
    pub commenter_username: String,
    /// Owning blog
    pub blog_id: i64,
}

/// Input for creating a comment on a blog
#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub text: String,
    #[serde(default)]
    pub likes: Option<i64>,
    pub commenter_username: String,
    pub blog_id: i64,
}

/// Comment body without a blog reference, used when the target blog is
/// already named by the call (`BlogService::add_comment`).
#[derive(Debug, Clone, Deserialize)]
pub struct CommentBody {
    pub text: String,
    #[serde(default)]
    pub likes: Option<i64>,
    pub commenter_username: String,
}

impl CommentBody {
    /// Bind this body to a target blog.
    pub fn into_new_comment(self, blog_id: i64) -> NewComment {
        NewComment {
            text: self.text,
            likes: self.likes,
            commenter_username: self.commenter_username,
            blog_id,
        }
    }
}

/// Input for updating a comment. The commenter and the owning blog are
/// immutable after creation; only text and likes can change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateComment {
    pub text: String,
    #[serde(default)]
    pub likes: Option<i64>,
}
