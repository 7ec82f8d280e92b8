//! Tag service
//!
//! Owns tags and their case-insensitive name uniqueness. Names are compared
//! by lowercasing both sides and stored lowercased; the service-level probe
//! exists for precise Conflict messages while the `UNIQUE COLLATE NOCASE`
//! column is the actual guarantee against concurrent duplicates.

use std::sync::Arc;

use crate::db::repositories::{BlogRepository, NewTagRecord, TagRepository};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Blog, NewTag, Tag, TagBody};
use crate::services::resolve;

/// Service for managing tags and their blog associations
pub struct TagService {
    tags: Arc<dyn TagRepository>,
    blogs: Arc<dyn BlogRepository>,
}

impl TagService {
    /// Create a new tag service
    pub fn new(tags: Arc<dyn TagRepository>, blogs: Arc<dyn BlogRepository>) -> Self {
        Self { tags, blogs }
    }

    /// List all tags
    pub async fn get_all(&self) -> ServiceResult<Vec<Tag>> {
        Ok(self.tags.list().await?)
    }

    /// Get a tag by id
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Tag> {
        resolve::tag_by_id(self.tags.as_ref(), id).await
    }

    /// Look a tag up by name, case-insensitively. A missing tag is a valid
    /// `None` answer, not an error; a blank name is rejected.
    pub async fn get_by_name(&self, name: &str) -> ServiceResult<Option<Tag>> {
        if name.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Name cannot be a blank or empty string".to_string(),
            ));
        }
        Ok(self.tags.get_by_name(&name.to_lowercase()).await?)
    }

    /// Create a batch of tags, each optionally associated with existing
    /// blogs. The whole batch fails on the first name collision or dangling
    /// blog reference; nothing is persisted in that case.
    pub async fn create_batch(&self, inputs: &[NewTag]) -> ServiceResult<Vec<Tag>> {
        // Pre-scan every name before touching storage so a collision
        // anywhere in the batch leaves no partial commit behind.
        let mut seen: Vec<String> = Vec::with_capacity(inputs.len());
        for input in inputs {
            if input.name.trim().is_empty() {
                return Err(ServiceError::InvalidInput(
                    "Tag name cannot be blank or null".to_string(),
                ));
            }
            let name = input.name.to_lowercase();
            if seen.contains(&name) || self.tags.get_by_name(&name).await?.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "Tag with name {} already exists",
                    name
                )));
            }
            seen.push(name);
        }

        let mut records = Vec::with_capacity(inputs.len());
        for input in inputs {
            let blog_ids = match &input.blog_ids {
                Some(ids) => {
                    for blog_id in ids {
                        resolve::blog_by_id(self.blogs.as_ref(), *blog_id).await?;
                    }
                    ids.clone()
                }
                None => Vec::new(),
            };

            records.push(NewTagRecord {
                name: input.name.to_lowercase(),
                description: input.description.clone(),
                blog_ids,
            });
        }

        let tags = self.tags.create_batch(&records).await?;
        tracing::info!(count = tags.len(), "created tag batch");
        Ok(tags)
    }

    /// Update a tag's name and description. The new name may not collide
    /// with any tag other than the one being updated. Blog associations are
    /// not editable through this path.
    pub async fn update(&self, id: i64, patch: &TagBody) -> ServiceResult<Tag> {
        resolve::tag_by_id(self.tags.as_ref(), id).await?;

        if patch.name.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Tag name cannot be blank or null".to_string(),
            ));
        }

        let name = patch.name.to_lowercase();
        if let Some(existing) = self.tags.get_by_name(&name).await? {
            if existing.id != id {
                return Err(ServiceError::Conflict(format!(
                    "Tag with name {} already exists",
                    name
                )));
            }
        }

        Ok(self.tags.update(id, &name, &patch.description).await?)
    }

    /// Delete a tag. Every blog holding the tag is detached first so no
    /// orphaned association survives the tag row.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let tag = resolve::tag_by_id(self.tags.as_ref(), id).await?;

        self.tags.detach_from_all_blogs(tag.id).await?;
        self.tags.delete(tag.id).await?;
        tracing::info!(tag_id = tag.id, name = %tag.name, "tag removed");
        Ok(())
    }

    /// Blogs currently associated with a tag
    pub async fn blogs_with(&self, id: i64) -> ServiceResult<Vec<Blog>> {
        resolve::tag_by_id(self.tags.as_ref(), id).await?;
        Ok(self.tags.blogs_with(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        NewBlogRecord, SqlxBlogRepository, SqlxTagRepository, SqlxUserRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{NewAddress, NewUser};
    use sqlx::SqlitePool;

    async fn setup_test_service() -> (SqlitePool, TagService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let tags = SqlxTagRepository::boxed(pool.clone());
        let blogs = SqlxBlogRepository::boxed(pool.clone());
        let service = TagService::new(tags, blogs);
        (pool, service)
    }

    async fn create_test_blog(pool: &SqlitePool, username: &str) -> i64 {
        let users = SqlxUserRepository::new(pool.clone());
        let user = users
            .create(&NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
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

        use crate::db::repositories::BlogRepository;
        SqlxBlogRepository::new(pool.clone())
            .create(&NewBlogRecord {
                title: format!("Blog by {}", username),
                content: "content".to_string(),
                likes: 0,
                user_id: user.id,
            })
            .await
            .expect("Failed to create test blog")
            .id
    }

    fn new_tag(name: &str, description: &str, blog_ids: Option<Vec<i64>>) -> NewTag {
        NewTag {
            name: name.to_string(),
            description: description.to_string(),
            blog_ids,
        }
    }

    #[tokio::test]
    async fn test_create_batch_lowercases_names() {
        let (_pool, service) = setup_test_service().await;

        let tags = service
            .create_batch(&[new_tag("RustLang", "a language", None)])
            .await
            .expect("create batch");

        assert_eq!(tags[0].name, "rustlang");
    }

    #[tokio::test]
    async fn test_create_batch_case_collision_persists_nothing() {
        let (_pool, service) = setup_test_service().await;

        let result = service
            .create_batch(&[
                new_tag("Go", "golang", None),
                new_tag("go", "dup", None),
            ])
            .await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
        assert!(service.get_all().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_create_batch_conflicts_with_existing_tag() {
        let (_pool, service) = setup_test_service().await;
        service
            .create_batch(&[new_tag("rust", "a language", None)])
            .await
            .expect("first batch");

        let err = service
            .create_batch(&[new_tag("RUST", "shouting", None)])
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(err.to_string(), "Tag with name rust already exists");
    }

    #[tokio::test]
    async fn test_create_batch_dangling_blog_persists_nothing() {
        let (_pool, service) = setup_test_service().await;

        let result = service
            .create_batch(&[new_tag("rust", "a language", Some(vec![4242]))])
            .await;

        match result {
            Err(ServiceError::NotFound(msg)) => {
                assert_eq!(msg, "Blog with id 4242 not found")
            }
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
        assert!(service.get_all().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_create_batch_links_every_listed_blog() {
        let (pool, service) = setup_test_service().await;
        let blog_a = create_test_blog(&pool, "amara").await;
        let blog_b = create_test_blog(&pool, "bakari").await;

        let tags = service
            .create_batch(&[new_tag("rust", "a language", Some(vec![blog_a, blog_b]))])
            .await
            .expect("create batch");

        let blogs = service.blogs_with(tags[0].id).await.expect("blogs with tag");
        assert_eq!(blogs.len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_name_blank_is_invalid() {
        let (_pool, service) = setup_test_service().await;
        let result = service.get_by_name("   ").await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_get_by_name_no_match_is_none_not_error() {
        let (_pool, service) = setup_test_service().await;
        let found = service.get_by_name("missing").await.expect("lookup");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_by_name_ignores_case() {
        let (_pool, service) = setup_test_service().await;
        service
            .create_batch(&[new_tag("rust", "a language", None)])
            .await
            .expect("create");

        let found = service
            .get_by_name("RuSt")
            .await
            .expect("lookup")
            .expect("tag exists");
        assert_eq!(found.name, "rust");
    }

    #[tokio::test]
    async fn test_update_rejects_collision_with_other_tag() {
        let (_pool, service) = setup_test_service().await;
        let tags = service
            .create_batch(&[
                new_tag("rust", "a language", None),
                new_tag("go", "another", None),
            ])
            .await
            .expect("create");

        let result = service
            .update(
                tags[1].id,
                &TagBody {
                    name: "Rust".to_string(),
                    description: "renamed".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_allows_same_name_on_self() {
        let (_pool, service) = setup_test_service().await;
        let tags = service
            .create_batch(&[new_tag("rust", "old description", None)])
            .await
            .expect("create");

        let updated = service
            .update(
                tags[0].id,
                &TagBody {
                    name: "Rust".to_string(),
                    description: "new description".to_string(),
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.name, "rust");
        assert_eq!(updated.description, "new description");
    }

    #[tokio::test]
    async fn test_delete_detaches_from_every_blog() {
        let (pool, service) = setup_test_service().await;
        let blog_a = create_test_blog(&pool, "amara").await;
        let blog_b = create_test_blog(&pool, "bakari").await;

        let tags = service
            .create_batch(&[new_tag("rust", "a language", Some(vec![blog_a, blog_b]))])
            .await
            .expect("create");
        let tag_id = tags[0].id;

        service.delete(tag_id).await.expect("delete");

        let links: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM blog_tags WHERE tag_id = ?")
            .bind(tag_id)
            .fetch_one(&pool)
            .await
            .expect("count links");
        assert_eq!(links.0, 0);

        let result = service.get_by_id(tag_id).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_tag_is_not_found() {
        let (_pool, service) = setup_test_service().await;
        let result = service.delete(99999).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    // ========================================================================
    // Property-based tests
    // ========================================================================

    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// For any mixed-case tag name, creation stores the lowercased form
        /// and a second creation differing only by case conflicts.
        #[test]
        fn property_name_uniqueness_is_case_insensitive(name in "[a-zA-Z]{3,20}") {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let (_pool, service) = setup_test_service().await;

                let created = service
                    .create_batch(&[new_tag(&name, "first", None)])
                    .await
                    .expect("first create should succeed");
                prop_assert_eq!(&created[0].name, &name.to_lowercase());

                let flipped: String = name
                    .chars()
                    .map(|c| {
                        if c.is_uppercase() {
                            c.to_ascii_lowercase()
                        } else {
                            c.to_ascii_uppercase()
                        }
                    })
                    .collect();

                let second = service.create_batch(&[new_tag(&flipped, "dup", None)]).await;
                prop_assert!(matches!(second, Err(ServiceError::Conflict(_))));

                Ok(())
            });
            result?;
        }
    }
}
