//! Comment service
//!
//! Standalone comment management addressing comments by their own id. The
//! write path validates the blog first, then the commenter, persists the
//! row and only then dispatches the notification; a dispatch failure never
//! takes the persisted comment back.

use std::sync::Arc;

use crate::db::repositories::{
    BlogRepository, CommentRepository, NewCommentRecord, UserRepository,
};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Comment, NewComment, UpdateComment};
use crate::notify::{self, NotificationGateway};
use crate::services::resolve;

/// Service for managing comments across all blogs
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    blogs: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRepository>,
    gateway: Arc<dyn NotificationGateway>,
}

impl CommentService {
    /// Create a new comment service
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        blogs: Arc<dyn BlogRepository>,
        users: Arc<dyn UserRepository>,
        gateway: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            comments,
            blogs,
            users,
            gateway,
        }
    }

    /// List all comments
    pub async fn get_all(&self) -> ServiceResult<Vec<Comment>> {
        Ok(self.comments.list().await?)
    }

    /// Get a comment by id
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Comment> {
        resolve::comment_by_id(self.comments.as_ref(), id).await
    }

    /// Create a comment on an existing blog by an existing user, then
    /// notify the blog's owner. The blog is checked before the commenter;
    /// nothing is written or sent when either is missing.
    pub async fn create(&self, input: &NewComment) -> ServiceResult<Comment> {
        if input.text.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Comment text cannot be blank or null".to_string(),
            ));
        }

        let blog = resolve::blog_by_id(self.blogs.as_ref(), input.blog_id).await?;
        resolve::commenter(self.users.as_ref(), &input.commenter_username).await?;

        let comment = self
            .comments
            .create(&NewCommentRecord {
                text: input.text.clone(),
                likes: input.likes.unwrap_or(0),
                commenter_username: input.commenter_username.clone(),
                blog_id: blog.id,
            })
            .await?;

        notify::dispatch_for_comment(self.gateway.as_ref(), &comment, &blog).await;

        Ok(comment)
    }

    /// Update a comment's text and likes. The commenter and the owning blog
    /// are immutable; no notification is sent for updates.
    pub async fn update(&self, id: i64, patch: &UpdateComment) -> ServiceResult<Comment> {
        resolve::comment_by_id(self.comments.as_ref(), id).await?;

        if patch.text.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Comment text cannot be blank or null".to_string(),
            ));
        }

        Ok(self
            .comments
            .update(id, &patch.text, patch.likes.unwrap_or(0))
            .await?)
    }

    /// Delete a comment
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        resolve::comment_by_id(self.comments.as_ref(), id).await?;
        self.comments.delete(id).await?;
        tracing::info!(comment_id = id, "comment removed");
        Ok(())
    }
}
