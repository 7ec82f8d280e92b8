//! Per-relation deletion policy
//!
//! Cascade semantics differ per relation: a blog's comments are removed with
//! it, its tags are only detached, and a user's blogs are removed with the
//! user. The policy is stated once here and consulted by the generic removal
//! routines instead of being re-decided ad hoc at every delete site. The
//! schema's `ON DELETE CASCADE` foreign keys back these routines up at the
//! storage level.

use crate::db::repositories::{BlogRepository, CommentRepository, TagRepository, UserRepository};
use crate::error::ServiceResult;

/// What happens to a related collection when its owner is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// The related rows are deleted together with the owner
    HardDelete,
    /// Only the relationship links are removed; the related rows survive
    Detach,
}

/// Policy for a blog's owned comments.
pub const BLOG_COMMENTS: OnDelete = OnDelete::HardDelete;
/// Policy for a blog's associated tags.
pub const BLOG_TAGS: OnDelete = OnDelete::Detach;
/// Policy for a user's owned blogs.
pub const USER_BLOGS: OnDelete = OnDelete::HardDelete;

/// Remove a blog and apply the per-relation policy to everything hanging
/// off it. Callers resolve the blog id first.
pub async fn remove_blog(
    blogs: &dyn BlogRepository,
    comments: &dyn CommentRepository,
    tags: &dyn TagRepository,
    blog_id: i64,
) -> ServiceResult<()> {
    match BLOG_COMMENTS {
        OnDelete::HardDelete => {
            let removed = comments.delete_by_blog(blog_id).await?;
            if removed > 0 {
                tracing::debug!(blog_id, removed, "removed comments with blog");
            }
        }
        OnDelete::Detach => {}
    }

    match BLOG_TAGS {
        OnDelete::Detach => tags.detach_all_for_blog(blog_id).await?,
        OnDelete::HardDelete => {}
    }

    blogs.delete(blog_id).await?;
    tracing::info!(blog_id, "blog removed");
    Ok(())
}

/// Remove a user and apply the per-relation policy to the owned blogs
/// (transitively removing their comments and detaching their tags).
pub async fn remove_user(
    users: &dyn UserRepository,
    blogs: &dyn BlogRepository,
    comments: &dyn CommentRepository,
    tags: &dyn TagRepository,
    user_id: i64,
) -> ServiceResult<()> {
    match USER_BLOGS {
        OnDelete::HardDelete => {
            for blog in blogs.list_by_user(user_id).await? {
                remove_blog(blogs, comments, tags, blog.id).await?;
            }
        }
        OnDelete::Detach => {}
    }

    users.delete(user_id).await?;
    tracing::info!(user_id, "user removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        assert_eq!(BLOG_COMMENTS, OnDelete::HardDelete);
        assert_eq!(BLOG_TAGS, OnDelete::Detach);
        assert_eq!(USER_BLOGS, OnDelete::HardDelete);
    }
}
