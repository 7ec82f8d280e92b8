//! Blog repository
//!
//! Database operations for blogs, including the case-insensitive keyword
//! search over title and content.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::Blog;

/// Record shape for inserting a blog
#[derive(Debug, Clone)]
pub struct NewBlogRecord {
    pub title: String,
    pub content: String,
    pub likes: i64,
    pub user_id: i64,
}

/// Blog repository trait
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Create a new blog
    async fn create(&self, blog: &NewBlogRecord) -> Result<Blog>;

    /// Get blog by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>>;

    /// List all blogs
    async fn list(&self) -> Result<Vec<Blog>>;

    /// List blogs owned by a user
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Blog>>;

    /// Overwrite title, content and likes; refreshes the update timestamp
    async fn update(&self, id: i64, title: &str, content: &str, likes: i64) -> Result<Blog>;

    /// Delete a blog row
    async fn delete(&self, id: i64) -> Result<()>;

    /// Case-insensitive substring search over title OR content
    async fn search(&self, keyword: &str) -> Result<Vec<Blog>>;
}

/// SQLx-based blog repository implementation
pub struct SqlxBlogRepository {
    pool: SqlitePool,
}

impl SqlxBlogRepository {
    /// Create a new SQLx blog repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn BlogRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BlogRepository for SqlxBlogRepository {
    async fn create(&self, blog: &NewBlogRecord) -> Result<Blog> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO blogs (title, content, likes, created_at, updated_at, user_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&blog.title)
        .bind(&blog.content)
        .bind(blog.likes)
        .bind(now)
        .bind(now)
        .bind(blog.user_id)
        .execute(&self.pool)
        .await
        .context("Failed to create blog")?;

        Ok(Blog {
            id: result.last_insert_rowid(),
            title: blog.title.clone(),
            content: blog.content.clone(),
            likes: blog.likes,
            created_at: now,
            updated_at: now,
            user_id: blog.user_id,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, content, likes, created_at, updated_at, user_id
            FROM blogs
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get blog by ID")?;

        row.map(|row| row_to_blog(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<Blog>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, likes, created_at, updated_at, user_id
            FROM blogs
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list blogs")?;

        rows.iter().map(row_to_blog).collect()
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Blog>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, likes, created_at, updated_at, user_id
            FROM blogs
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list blogs by user")?;

        rows.iter().map(row_to_blog).collect()
    }

    async fn update(&self, id: i64, title: &str, content: &str, likes: i64) -> Result<Blog> {
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE blogs
            SET title = ?, content = ?, likes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(likes)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update blog")?;

        self.get_by_id(id)
            .await?
            .with_context(|| format!("Blog {} vanished during update", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete blog")?;
        Ok(())
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Blog>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, likes, created_at, updated_at, user_id
            FROM blogs
            WHERE lower(title) LIKE '%' || lower(?) || '%'
               OR lower(content) LIKE '%' || lower(?) || '%'
            ORDER BY id
            "#,
        )
        .bind(keyword)
        .bind(keyword)
        .fetch_all(&self.pool)
        .await
        .context("Failed to search blogs")?;

        rows.iter().map(row_to_blog).collect()
    }
}

pub(crate) fn row_to_blog(row: &sqlx::sqlite::SqliteRow) -> Result<Blog> {
    Ok(Blog {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        likes: row.get("likes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        user_id: row.get("user_id"),
    })
}
