//! User service
//!
//! Registration, lookup and removal of users. Removing a user removes the
//! owned blogs with their comments and detaches their tags; the embedded
//! address row goes away with the user. The notification read path proxies
//! the external notification service.

use std::sync::Arc;

use crate::db::repositories::{
    BlogRepository, CommentRepository, TagRepository, UserRepository,
};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Blog, NewUser, Notification, User};
use crate::notify::NotificationGateway;
use crate::services::{cascade, resolve};

/// Service for managing users and their owned content
pub struct UserService {
    users: Arc<dyn UserRepository>,
    blogs: Arc<dyn BlogRepository>,
    comments: Arc<dyn CommentRepository>,
    tags: Arc<dyn TagRepository>,
    gateway: Arc<dyn NotificationGateway>,
}

impl UserService {
    /// Create a new user service
    pub fn new(
        users: Arc<dyn UserRepository>,
        blogs: Arc<dyn BlogRepository>,
        comments: Arc<dyn CommentRepository>,
        tags: Arc<dyn TagRepository>,
        gateway: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            users,
            blogs,
            comments,
            tags,
            gateway,
        }
    }

    /// List all users
    pub async fn get_all(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.list().await?)
    }

    /// Get a user by id
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<User> {
        resolve::user_by_id(self.users.as_ref(), id).await
    }

    /// Register a user. Usernames are unique; the address is created with
    /// the user in one step.
    pub async fn create(&self, input: &NewUser) -> ServiceResult<User> {
        if input.username.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Username cannot be blank or null".to_string(),
            ));
        }
        if input.email.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Email cannot be blank or null".to_string(),
            ));
        }
        if input.password.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Password cannot be blank or null".to_string(),
            ));
        }

        if self.users.get_by_username(&input.username).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Username {} already taken",
                input.username
            )));
        }

        let user = self.users.create(input).await?;
        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Delete a user and everything they own: blogs go with them, each
    /// blog's comments go with the blog, tags are only detached.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        resolve::user_by_id(self.users.as_ref(), id).await?;
        cascade::remove_user(
            self.users.as_ref(),
            self.blogs.as_ref(),
            self.comments.as_ref(),
            self.tags.as_ref(),
            id,
        )
        .await
    }

    /// Blogs owned by a user
    pub async fn blogs_for(&self, id: i64) -> ServiceResult<Vec<Blog>> {
        resolve::user_by_id(self.users.as_ref(), id).await?;
        Ok(self.blogs.list_by_user(id).await?)
    }

    /// Notifications stored for a user, fetched from the notification
    /// service. The user must exist locally first.
    pub async fn notifications_for(&self, id: i64) -> ServiceResult<Vec<Notification>> {
        resolve::user_by_id(self.users.as_ref(), id).await?;
        self.gateway.for_blogger(id).await
    }
}
