//! User and address models
//!
//! A user exclusively owns one address and a collection of blogs. Blogs are
//! removed together with their owner; the address row goes with the user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub registered_at: DateTime<Utc>,
    /// Exclusively owned address, loaded together with the user
    pub address: Address,
}

/// Address entity, owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: i64,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// Input for creating a user
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub address: NewAddress,
}

/// Input for the address created with a new user
#[derive(Debug, Clone, Deserialize)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_hides_password() {
        let user = User {
            id: 1,
            username: "amara".to_string(),
            email: "amara@example.com".to_string(),
            password: "secret".to_string(),
            registered_at: Utc::now(),
            address: Address {
                id: 1,
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip: "62701".to_string(),
                country: "USA".to_string(),
            },
        };

        let json = serde_json::to_value(&user).expect("serialize user");
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "amara");
        assert_eq!(json["address"]["city"], "Springfield");
    }
}
