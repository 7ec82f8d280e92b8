//! Blog service
//!
//! Central manager for blogs: ownership, tag association, comment intake
//! with notification dispatch, and keyword search. Deletion goes through the
//! cascade policy so comments are removed with the blog while tags are only
//! detached.

use std::sync::Arc;

use crate::db::repositories::{
    BlogRepository, CommentRepository, NewBlogRecord, NewCommentRecord, TagRepository,
    UserRepository,
};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Blog, BlogDetail, CommentBody, NewBlog, Tag, TagBody, UpdateBlog};
use crate::notify::{self, NotificationGateway};
use crate::services::{cascade, resolve};

/// Service for managing blogs, their tags and their comments
pub struct BlogService {
    blogs: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
    gateway: Arc<dyn NotificationGateway>,
}

impl BlogService {
    /// Create a new blog service
    pub fn new(
        blogs: Arc<dyn BlogRepository>,
        users: Arc<dyn UserRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
        gateway: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            blogs,
            users,
            tags,
            comments,
            gateway,
        }
    }

    /// List all blogs
    pub async fn get_all(&self) -> ServiceResult<Vec<Blog>> {
        Ok(self.blogs.list().await?)
    }

    /// Get a blog by id
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Blog> {
        resolve::blog_by_id(self.blogs.as_ref(), id).await
    }

    /// Get a blog together with its tags and comments
    pub async fn get_detail(&self, id: i64) -> ServiceResult<BlogDetail> {
        let blog = resolve::blog_by_id(self.blogs.as_ref(), id).await?;
        self.assemble_detail(blog).await
    }

    /// Create a blog for an existing user, optionally associated with
    /// existing tags. Likes default to 0 when omitted.
    pub async fn create(&self, input: &NewBlog) -> ServiceResult<Blog> {
        if input.title.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Blog title cannot be blank or null".to_string(),
            ));
        }
        if input.content.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Blog content cannot be blank or null".to_string(),
            ));
        }

        let owner = resolve::user_by_id(self.users.as_ref(), input.user_id).await?;

        // Every referenced tag must exist before anything is written.
        let mut tag_ids = Vec::new();
        if let Some(ids) = &input.tag_ids {
            for tag_id in ids {
                resolve::tag_by_id(self.tags.as_ref(), *tag_id).await?;
            }
            tag_ids = ids.clone();
        }

        let blog = self
            .blogs
            .create(&NewBlogRecord {
                title: input.title.clone(),
                content: input.content.clone(),
                likes: input.likes.unwrap_or(0),
                user_id: owner.id,
            })
            .await?;

        for tag_id in tag_ids {
            self.tags.attach(tag_id, blog.id).await?;
        }

        tracing::info!(blog_id = blog.id, user_id = owner.id, "blog created");
        Ok(blog)
    }

    /// Update a blog's title, content and likes. Ownership and creation
    /// time never change; `updated_at` is refreshed by the write.
    pub async fn update(&self, id: i64, patch: &UpdateBlog) -> ServiceResult<Blog> {
        resolve::blog_by_id(self.blogs.as_ref(), id).await?;

        if patch.title.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Blog title cannot be blank or null".to_string(),
            ));
        }
        if patch.content.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Blog content cannot be blank or null".to_string(),
            ));
        }

        Ok(self
            .blogs
            .update(id, &patch.title, &patch.content, patch.likes.unwrap_or(0))
            .await?)
    }

    /// Delete a blog. Its comments go with it; its tags are detached and
    /// survive.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        resolve::blog_by_id(self.blogs.as_ref(), id).await?;
        cascade::remove_blog(
            self.blogs.as_ref(),
            self.comments.as_ref(),
            self.tags.as_ref(),
            id,
        )
        .await
    }

    /// Add a comment to a blog and notify the blog's owner. The commenter
    /// username must resolve to an existing user before the write; the
    /// notification after the write is best effort and never unwinds it.
    pub async fn add_comment(&self, blog_id: i64, body: CommentBody) -> ServiceResult<BlogDetail> {
        let blog = resolve::blog_by_id(self.blogs.as_ref(), blog_id).await?;

        if body.text.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Comment text cannot be blank or null".to_string(),
            ));
        }
        resolve::commenter(self.users.as_ref(), &body.commenter_username).await?;

        let input = body.into_new_comment(blog.id);
        let comment = self
            .comments
            .create(&NewCommentRecord {
                text: input.text,
                likes: input.likes.unwrap_or(0),
                commenter_username: input.commenter_username,
                blog_id: blog.id,
            })
            .await?;

        notify::dispatch_for_comment(self.gateway.as_ref(), &comment, &blog).await;

        self.assemble_detail(blog).await
    }

    /// Create a tag directly on a blog. The name must not collide with any
    /// existing tag, case-insensitively.
    pub async fn add_tag(&self, blog_id: i64, body: &TagBody) -> ServiceResult<Tag> {
        let blog = resolve::blog_by_id(self.blogs.as_ref(), blog_id).await?;

        if body.name.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Tag name cannot be blank or null".to_string(),
            ));
        }

        let name = body.name.to_lowercase();
        if self.tags.get_by_name(&name).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Tag with name {} already exists",
                name
            )));
        }

        let tag = self.tags.create(&name, &body.description).await?;
        self.tags.attach(tag.id, blog.id).await?;
        Ok(tag)
    }

    /// Detach a tag from a blog. Both sides must exist; the tag itself
    /// survives the detach.
    pub async fn remove_tag(&self, blog_id: i64, tag_id: i64) -> ServiceResult<()> {
        resolve::blog_by_id(self.blogs.as_ref(), blog_id).await?;
        resolve::tag_by_id(self.tags.as_ref(), tag_id).await?;
        self.tags.detach(tag_id, blog_id).await?;
        Ok(())
    }

    /// Case-insensitive keyword search over titles and contents. An empty
    /// result is a valid answer; a blank keyword is not a valid question.
    pub async fn search(&self, keyword: &str) -> ServiceResult<Vec<Blog>> {
        if keyword.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Keyword cannot be a blank or empty string".to_string(),
            ));
        }
        Ok(self.blogs.search(keyword).await?)
    }

    async fn assemble_detail(&self, blog: Blog) -> ServiceResult<BlogDetail> {
        let tags = self.tags.for_blog(blog.id).await?;
        let comments = self.comments.list_by_blog(blog.id).await?;
        Ok(BlogDetail {
            blog,
            tags,
            comments,
        })
    }
}
