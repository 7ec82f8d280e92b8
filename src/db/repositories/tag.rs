//! Tag repository
//!
//! Database operations for tags and the blog↔tag link table. The link table
//! is the single source of truth for the many-to-many relation: both "a
//! blog's tags" and "a tag's blogs" are views over `blog_tags`, so every
//! attach/detach keeps the two sides mirrored by construction.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use super::blog::row_to_blog;
use crate::models::{Blog, Tag};

/// Record shape for inserting a tag with its initial blog associations
#[derive(Debug, Clone)]
pub struct NewTagRecord {
    /// Already lowercased by the service layer
    pub name: String,
    pub description: String,
    pub blog_ids: Vec<i64>,
}

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Create a single tag without associations
    async fn create(&self, name: &str, description: &str) -> Result<Tag>;

    /// Create a batch of tags with their blog links as one unit; nothing is
    /// persisted when any insert fails
    async fn create_batch(&self, records: &[NewTagRecord]) -> Result<Vec<Tag>>;

    /// Get tag by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>>;

    /// Get tag by name, compared case-insensitively
    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>>;

    /// List all tags
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Overwrite name and description
    async fn update(&self, id: i64, name: &str, description: &str) -> Result<Tag>;

    /// Delete a tag row
    async fn delete(&self, id: i64) -> Result<()>;

    /// Link a tag to a blog; linking twice is a no-op
    async fn attach(&self, tag_id: i64, blog_id: i64) -> Result<()>;

    /// Remove the link between a tag and a blog
    async fn detach(&self, tag_id: i64, blog_id: i64) -> Result<()>;

    /// Remove every link this tag has to any blog
    async fn detach_from_all_blogs(&self, tag_id: i64) -> Result<()>;

    /// Remove every link this blog has to any tag
    async fn detach_all_for_blog(&self, blog_id: i64) -> Result<()>;

    /// Tags associated with a blog
    async fn for_blog(&self, blog_id: i64) -> Result<Vec<Tag>>;

    /// Blogs associated with a tag
    async fn blogs_with(&self, tag_id: i64) -> Result<Vec<Blog>>;
}

/// SQLx-based tag repository implementation
pub struct SqlxTagRepository {
    pool: SqlitePool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn create(&self, name: &str, description: &str) -> Result<Tag> {
        let result = sqlx::query("INSERT INTO tags (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(description)
            .execute(&self.pool)
            .await
            .context("Failed to create tag")?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    async fn create_batch(&self, records: &[NewTagRecord]) -> Result<Vec<Tag>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let mut tags = Vec::with_capacity(records.len());
        for record in records {
            let result = sqlx::query("INSERT INTO tags (name, description) VALUES (?, ?)")
                .bind(&record.name)
                .bind(&record.description)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to create tag {}", record.name))?;
            let tag_id = result.last_insert_rowid();

            for blog_id in &record.blog_ids {
                sqlx::query("INSERT OR IGNORE INTO blog_tags (blog_id, tag_id) VALUES (?, ?)")
                    .bind(blog_id)
                    .bind(tag_id)
                    .execute(&mut *tx)
                    .await
                    .with_context(|| {
                        format!("Failed to link tag {} to blog {}", record.name, blog_id)
                    })?;
            }

            tags.push(Tag {
                id: tag_id,
                name: record.name.clone(),
                description: record.description.clone(),
            });
        }

        tx.commit().await.context("Failed to commit tag batch")?;
        Ok(tags)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, description FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get tag by ID")?;

        row.map(|row| row_to_tag(&row)).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let row = sqlx::query(
            "SELECT id, name, description FROM tags WHERE name = ? COLLATE NOCASE",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get tag by name")?;

        row.map(|row| row_to_tag(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, description FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list tags")?;

        rows.iter().map(row_to_tag).collect()
    }

    async fn update(&self, id: i64, name: &str, description: &str) -> Result<Tag> {
        sqlx::query("UPDATE tags SET name = ?, description = ? WHERE id = ?")
            .bind(name)
            .bind(description)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update tag")?;

        Ok(Tag {
            id,
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete tag")?;
        Ok(())
    }

    async fn attach(&self, tag_id: i64, blog_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO blog_tags (blog_id, tag_id) VALUES (?, ?)")
            .bind(blog_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .context("Failed to attach tag to blog")?;
        Ok(())
    }

    async fn detach(&self, tag_id: i64, blog_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM blog_tags WHERE blog_id = ? AND tag_id = ?")
            .bind(blog_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .context("Failed to detach tag from blog")?;
        Ok(())
    }

    async fn detach_from_all_blogs(&self, tag_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM blog_tags WHERE tag_id = ?")
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .context("Failed to detach tag from blogs")?;
        Ok(())
    }

    async fn detach_all_for_blog(&self, blog_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM blog_tags WHERE blog_id = ?")
            .bind(blog_id)
            .execute(&self.pool)
            .await
            .context("Failed to detach tags from blog")?;
        Ok(())
    }

    async fn for_blog(&self, blog_id: i64) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.description
            FROM tags t
            INNER JOIN blog_tags bt ON t.id = bt.tag_id
            WHERE bt.blog_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(blog_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to get tags for blog")?;

        rows.iter().map(row_to_tag).collect()
    }

    async fn blogs_with(&self, tag_id: i64) -> Result<Vec<Blog>> {
        let rows = sqlx::query(
            r#"
            SELECT b.id, b.title, b.content, b.likes, b.created_at, b.updated_at, b.user_id
            FROM blogs b
            INNER JOIN blog_tags bt ON b.id = bt.blog_id
            WHERE bt.tag_id = ?
            ORDER BY b.id
            "#,
        )
        .bind(tag_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to get blogs for tag")?;

        rows.iter().map(row_to_blog).collect()
    }
}

fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> Result<Tag> {
    Ok(Tag {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::blog::NewBlogRecord;
    use crate::db::repositories::{BlogRepository, SqlxBlogRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{NewAddress, NewUser};

    async fn setup_test_repo() -> (SqlitePool, SqlxTagRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxTagRepository::new(pool.clone());
        (pool, repo)
    }

    async fn create_test_blog(pool: &SqlitePool, title: &str) -> i64 {
        let users = SqlxUserRepository::new(pool.clone());
        let username = format!("author-{}", title);
        let user = users
            .create(&NewUser {
                username,
                email: "author@example.com".to_string(),
                password: "hunter2".to_string(),
                address: NewAddress {
                    street: "1 Main St".to_string(),
                    city: "Springfield".to_string(),
                    state: "IL".to_string(),
                    zip: "62701".to_string(),
                    country: "USA".to_string(),
                },
            })
            .await
            .expect("Failed to create test user");

        let blogs = SqlxBlogRepository::new(pool.clone());
        blogs
            .create(&NewBlogRecord {
                title: title.to_string(),
                content: "content".to_string(),
                likes: 0,
                user_id: user.id,
            })
            .await
            .expect("Failed to create test blog")
            .id
    }

    #[tokio::test]
    async fn test_create_and_get_by_name_case_insensitive() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create("rust", "a language").await.expect("create tag");

        let found = repo
            .get_by_name("RuSt")
            .await
            .expect("get tag")
            .expect("tag exists");
        assert_eq!(found.name, "rust");
    }

    #[tokio::test]
    async fn test_create_batch_with_links() {
        let (pool, repo) = setup_test_repo().await;
        let blog_id = create_test_blog(&pool, "one").await;

        let tags = repo
            .create_batch(&[
                NewTagRecord {
                    name: "rust".to_string(),
                    description: "a language".to_string(),
                    blog_ids: vec![blog_id],
                },
                NewTagRecord {
                    name: "go".to_string(),
                    description: "another language".to_string(),
                    blog_ids: vec![],
                },
            ])
            .await
            .expect("create batch");

        assert_eq!(tags.len(), 2);
        let linked = repo.for_blog(blog_id).await.expect("tags for blog");
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].name, "rust");
    }

    #[tokio::test]
    async fn test_create_batch_is_all_or_nothing() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create("rust", "existing").await.expect("create tag");

        // Second record collides with the stored name, so the storage-level
        // uniqueness constraint aborts the whole batch.
        let result = repo
            .create_batch(&[
                NewTagRecord {
                    name: "fresh".to_string(),
                    description: "new".to_string(),
                    blog_ids: vec![],
                },
                NewTagRecord {
                    name: "RUST".to_string(),
                    description: "dup".to_string(),
                    blog_ids: vec![],
                },
            ])
            .await;
        assert!(result.is_err());

        let all = repo.list().await.expect("list tags");
        assert_eq!(all.len(), 1, "no partial commit");
    }

    #[tokio::test]
    async fn test_attach_is_idempotent() {
        let (pool, repo) = setup_test_repo().await;
        let blog_id = create_test_blog(&pool, "one").await;
        let tag = repo.create("rust", "a language").await.expect("create tag");

        repo.attach(tag.id, blog_id).await.expect("attach");
        repo.attach(tag.id, blog_id).await.expect("attach again");

        let linked = repo.for_blog(blog_id).await.expect("tags for blog");
        assert_eq!(linked.len(), 1);
    }

    #[tokio::test]
    async fn test_detach_and_detach_from_all_blogs() {
        let (pool, repo) = setup_test_repo().await;
        let blog_a = create_test_blog(&pool, "a").await;
        let blog_b = create_test_blog(&pool, "b").await;
        let tag = repo.create("rust", "a language").await.expect("create tag");

        repo.attach(tag.id, blog_a).await.expect("attach a");
        repo.attach(tag.id, blog_b).await.expect("attach b");

        repo.detach(tag.id, blog_a).await.expect("detach a");
        assert!(repo.for_blog(blog_a).await.expect("for blog").is_empty());
        assert_eq!(repo.blogs_with(tag.id).await.expect("blogs").len(), 1);

        repo.detach_from_all_blogs(tag.id).await.expect("detach all");
        assert!(repo.blogs_with(tag.id).await.expect("blogs").is_empty());
    }

    #[tokio::test]
    async fn test_blogs_with_returns_full_rows() {
        let (pool, repo) = setup_test_repo().await;
        let blog_id = create_test_blog(&pool, "linked").await;
        let tag = repo.create("rust", "a language").await.expect("create tag");
        repo.attach(tag.id, blog_id).await.expect("attach");

        let blogs = repo.blogs_with(tag.id).await.expect("blogs with tag");
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].title, "linked");
    }

    #[tokio::test]
    async fn test_update_tag() {
        let (_pool, repo) = setup_test_repo().await;
        let tag = repo.create("rust", "old").await.expect("create tag");

        let updated = repo.update(tag.id, "rustlang", "new").await.expect("update");
        assert_eq!(updated.name, "rustlang");

        let found = repo
            .get_by_id(tag.id)
            .await
            .expect("get")
            .expect("tag exists");
        assert_eq!(found.description, "new");
    }
}
