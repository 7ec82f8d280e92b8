//! Notification contract with the external notification service
//!
//! Field names follow the service's JSON contract (camelCase). The payload
//! is built once per persisted comment and sent in a single attempt.

use serde::{Deserialize, Serialize};

use crate::models::{Blog, Comment};

/// Outbound notification payload for a newly persisted comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub commenter_username: String,
    /// Owner of the blog that received the comment
    pub blogger_id: i64,
    pub comment_id: i64,
    pub blog_id: i64,
}

impl NotificationPayload {
    /// Build the payload for a comment persisted against its target blog.
    pub fn for_comment(comment: &Comment, blog: &Blog) -> Self {
        Self {
            commenter_username: comment.commenter_username.clone(),
            blogger_id: blog.user_id,
            comment_id: comment.id,
            blog_id: comment.blog_id,
        }
    }
}

/// Notification as stored by the external service, returned on the read path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub commenter_username: String,
    pub blogger_id: i64,
    pub comment_id: i64,
    pub blog_id: i64,
}
