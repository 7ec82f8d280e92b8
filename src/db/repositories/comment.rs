//! Comment repository
//!
//! Database operations for comments. The commenter username is stored as
//! plain text; resolving it against the users table happens in the services
//! layer before anything is written here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::Comment;

/// Record shape for inserting a comment
#[derive(Debug, Clone)]
pub struct NewCommentRecord {
    pub text: String,
    pub likes: i64,
    pub commenter_username: String,
    pub blog_id: i64,
}

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Create a new comment
    async fn create(&self, comment: &NewCommentRecord) -> Result<Comment>;

    /// Get comment by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>>;

    /// List all comments
    async fn list(&self) -> Result<Vec<Comment>>;

    /// List comments owned by a blog
    async fn list_by_blog(&self, blog_id: i64) -> Result<Vec<Comment>>;

    /// Overwrite text and likes; commenter and blog are immutable
    async fn update(&self, id: i64, text: &str, likes: i64) -> Result<Comment>;

    /// Delete a comment row
    async fn delete(&self, id: i64) -> Result<()>;

    /// Delete every comment owned by a blog
    async fn delete_by_blog(&self, blog_id: i64) -> Result<u64>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: SqlitePool,
}

impl SqlxCommentRepository {
    /// Create a new SQLx comment repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, comment: &NewCommentRecord) -> Result<Comment> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO comments (text, likes, commented_at, commenter_username, blog_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&comment.text)
        .bind(comment.likes)
        .bind(now)
        .bind(&comment.commenter_username)
        .bind(comment.blog_id)
        .execute(&self.pool)
        .await
        .context("Failed to create comment")?;

        Ok(Comment {
            id: result.last_insert_rowid(),
            text: comment.text.clone(),
            likes: comment.likes,
            commented_at: now,
            commenter_username: comment.commenter_username.clone(),
            blog_id: comment.blog_id,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let row = sqlx::query(
            r#"
            SELECT id, text, likes, commented_at, commenter_username, blog_id
            FROM comments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get comment by ID")?;

        row.map(|row| row_to_comment(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, text, likes, commented_at, commenter_username, blog_id
            FROM comments
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list comments")?;

        rows.iter().map(row_to_comment).collect()
    }

    async fn list_by_blog(&self, blog_id: i64) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, text, likes, commented_at, commenter_username, blog_id
            FROM comments
            WHERE blog_id = ?
            ORDER BY id
            "#,
        )
        .bind(blog_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list comments by blog")?;

        rows.iter().map(row_to_comment).collect()
    }

    async fn update(&self, id: i64, text: &str, likes: i64) -> Result<Comment> {
        sqlx::query("UPDATE comments SET text = ?, likes = ? WHERE id = ?")
            .bind(text)
            .bind(likes)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update comment")?;

        self.get_by_id(id)
            .await?
            .with_context(|| format!("Comment {} vanished during update", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete comment")?;
        Ok(())
    }

    async fn delete_by_blog(&self, blog_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE blog_id = ?")
            .bind(blog_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete comments by blog")?;
        Ok(result.rows_affected())
    }
}

fn row_to_comment(row: &sqlx::sqlite::SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.get("id"),
        text: row.get("text"),
        likes: row.get("likes"),
        commented_at: row.get("commented_at"),
        commenter_username: row.get("commenter_username"),
        blog_id: row.get("blog_id"),
    })
}
