//! User repository
//!
//! Database operations for users and their exclusively owned addresses.
//! A user row and its address row are created and removed together; the
//! address never outlives its user.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::{Address, NewUser, User};

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user together with its address
    async fn create(&self, user: &NewUser) -> Result<User>;

    /// Get user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get user by unique username
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    /// List all users
    async fn list(&self) -> Result<Vec<User>>;

    /// Delete a user row and its address row
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: SqlitePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

const USER_SELECT: &str = r#"
    SELECT u.id, u.username, u.email, u.password, u.registered_at,
           a.id AS address_id, a.street, a.city, a.state, a.zip, a.country
    FROM users u
    INNER JOIN addresses a ON a.id = u.address_id
"#;

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let address_result = sqlx::query(
            r#"
            INSERT INTO addresses (street, city, state, zip, country)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.address.street)
        .bind(&user.address.city)
        .bind(&user.address.state)
        .bind(&user.address.zip)
        .bind(&user.address.country)
        .execute(&mut *tx)
        .await
        .context("Failed to create address")?;
        let address_id = address_result.last_insert_rowid();

        let user_result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password, registered_at, address_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(now)
        .bind(address_id)
        .execute(&mut *tx)
        .await
        .context("Failed to create user")?;
        let id = user_result.last_insert_rowid();

        tx.commit().await.context("Failed to commit user")?;

        Ok(User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            registered_at: now,
            address: Address {
                id: address_id,
                street: user.address.street.clone(),
                city: user.address.city.clone(),
                state: user.address.state.clone(),
                zip: user.address.zip.clone(),
                country: user.address.country.clone(),
            },
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(&format!("{} WHERE u.id = ?", USER_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get user by ID")?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("{} WHERE u.username = ?", USER_SELECT))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get user by username")?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!("{} ORDER BY u.id", USER_SELECT))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list users")?;

        rows.iter().map(row_to_user).collect()
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let address_id: Option<i64> = sqlx::query("SELECT address_id FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to look up user address")?
            .map(|row| row.get("address_id"));

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete user")?;

        if let Some(address_id) = address_id {
            sqlx::query("DELETE FROM addresses WHERE id = ?")
                .bind(address_id)
                .execute(&mut *tx)
                .await
                .context("Failed to delete address")?;
        }

        tx.commit().await.context("Failed to commit user deletion")?;
        Ok(())
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password: row.get("password"),
        registered_at: row.get("registered_at"),
        address: Address {
            id: row.get("address_id"),
            street: row.get("street"),
            city: row.get("city"),
            state: row.get("state"),
            zip: row.get("zip"),
            country: row.get("country"),
        },
    })
}
