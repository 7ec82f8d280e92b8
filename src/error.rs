//! Shared service error taxonomy
//!
//! Every manager fails with one of four client-visible error classes:
//! - `InvalidInput`: null/blank required field, malformed keyword
//! - `NotFound`: a referenced id or username does not resolve
//! - `Conflict`: duplicate tag name or username
//! - `DispatchFailed`: the external notification call failed; never reverts
//!   an already-committed local write
//!
//! Unexpected persistence failures surface as `Internal`. Every error names
//! the offending id or value in its message.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Error type shared by all service-layer managers.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Null/blank required field or malformed input
    #[error("{0}")]
    InvalidInput(String),

    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Conflicting state (duplicate tag name, duplicate username)
    #[error("{0}")]
    Conflict(String),

    /// Outbound notification call failed after the local write committed
    #[error("Notification could not be sent to the server: {0}")]
    DispatchFailed(String),

    /// Unexpected internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    /// Numeric status class and label for the wire error body.
    pub fn status(&self) -> (u16, &'static str) {
        match self {
            Self::InvalidInput(_) => (400, "Bad Request"),
            Self::NotFound(_) => (404, "Not Found"),
            Self::Conflict(_) => (409, "Conflict"),
            Self::DispatchFailed(_) => (502, "Bad Gateway"),
            Self::Internal(_) => (500, "Internal Server Error"),
        }
    }

    /// Build the serializable error body for this error.
    pub fn to_body(&self) -> ErrorBody {
        let (status, label) = self.status();
        ErrorBody {
            timestamp: Utc::now(),
            status,
            error: label.to_string(),
            message: vec![self.to_string()],
        }
    }
}

/// Wire shape of an error response: timestamp, status class, status label
/// and a list of human-readable messages.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: Vec<String>,
}

/// Result alias used throughout the services layer.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert_eq!(ServiceError::InvalidInput("x".into()).status().0, 400);
        assert_eq!(ServiceError::NotFound("x".into()).status().0, 404);
        assert_eq!(ServiceError::Conflict("x".into()).status().0, 409);
        assert_eq!(ServiceError::DispatchFailed("x".into()).status().0, 502);
    }

    #[test]
    fn test_body_carries_message() {
        let err = ServiceError::NotFound("Blog with id 7 not found".to_string());
        let body = err.to_body();

        assert_eq!(body.status, 404);
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.message, vec!["Blog with id 7 not found".to_string()]);
    }

    #[test]
    fn test_body_serializes() {
        let body = ServiceError::Conflict("Tag with name rust already exists".into()).to_body();
        let json = serde_json::to_value(&body).expect("serialize error body");

        assert_eq!(json["status"], 409);
        assert_eq!(json["error"], "Conflict");
        assert!(json["message"].as_array().is_some());
    }
}
