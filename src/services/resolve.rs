//! Reference validators
//!
//! Every manager resolves ids and usernames through these helpers so that a
//! dangling reference fails the same way everywhere: a `NotFound` error
//! naming the missing id or value, raised before any state is mutated.

use crate::db::repositories::{BlogRepository, CommentRepository, TagRepository, UserRepository};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Blog, Comment, Tag, User};

/// Resolve a user id to an existing user.
pub async fn user_by_id(repo: &dyn UserRepository, id: i64) -> ServiceResult<User> {
    repo.get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("User with id {} not found", id)))
}

/// Resolve a commenter username to an existing user. The username is a
/// validated free-text reference, not a structural foreign key.
pub async fn commenter(repo: &dyn UserRepository, username: &str) -> ServiceResult<User> {
    repo.get_by_username(username).await?.ok_or_else(|| {
        ServiceError::NotFound(format!(
            "Commenter username {} does not exist as user",
            username
        ))
    })
}

/// Resolve a blog id to an existing blog.
pub async fn blog_by_id(repo: &dyn BlogRepository, id: i64) -> ServiceResult<Blog> {
    repo.get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Blog with id {} not found", id)))
}

/// Resolve a tag id to an existing tag.
pub async fn tag_by_id(repo: &dyn TagRepository, id: i64) -> ServiceResult<Tag> {
    repo.get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Tag with id {} not found", id)))
}

/// Resolve a comment id to an existing comment.
pub async fn comment_by_id(repo: &dyn CommentRepository, id: i64) -> ServiceResult<Comment> {
    repo.get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Comment with id {} not found", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxBlogRepository, SqlxTagRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};

    #[tokio::test]
    async fn test_not_found_errors_name_the_missing_reference() {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let blogs = SqlxBlogRepository::new(pool.clone());
        let tags = SqlxTagRepository::new(pool.clone());

        let err = user_by_id(&users, 7).await.unwrap_err();
        assert_eq!(err.to_string(), "User with id 7 not found");

        let err = blog_by_id(&blogs, 8).await.unwrap_err();
        assert_eq!(err.to_string(), "Blog with id 8 not found");

        let err = tag_by_id(&tags, 9).await.unwrap_err();
        assert_eq!(err.to_string(), "Tag with id 9 not found");

        let err = commenter(&users, "ghost").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Commenter username ghost does not exist as user"
        );
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
