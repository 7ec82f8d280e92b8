//! Notification gateway
//!
//! Client for the external notification service. A payload is sent once per
//! persisted comment: no retry, no queue. Transport failures and non-success
//! responses surface as `DispatchFailed`; the caller must never roll back
//! the comment write they follow.

use async_trait::async_trait;

use crate::config::NotifierConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Notification, NotificationPayload};

/// Gateway to the external notification service.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Send one notification for a persisted comment. Exactly one attempt.
    async fn dispatch(&self, payload: &NotificationPayload) -> ServiceResult<()>;

    /// Read path: notifications stored for a blogger.
    async fn for_blogger(&self, blogger_id: i64) -> ServiceResult<Vec<Notification>>;
}

/// Send the notification for a comment that has already been persisted.
///
/// Best-effort by policy: a failure here is logged, never propagated, because
/// the local write has committed and must not be unwound. Exactly one attempt
/// is made per comment.
pub async fn dispatch_for_comment(
    gateway: &dyn NotificationGateway,
    comment: &crate::models::Comment,
    blog: &crate::models::Blog,
) {
    let payload = NotificationPayload::for_comment(comment, blog);
    if let Err(err) = gateway.dispatch(&payload).await {
        tracing::error!(
            comment_id = comment.id,
            blog_id = blog.id,
            "notification dispatch failed: {}",
            err
        );
    }
}

/// HTTP implementation talking to the notification microservice.
pub struct HttpNotificationGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNotificationGateway {
    /// Create a gateway from configuration.
    pub fn new(config: &NotifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl NotificationGateway for HttpNotificationGateway {
    async fn dispatch(&self, payload: &NotificationPayload) -> ServiceResult<()> {
        let url = format!("{}/notifications", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ServiceError::DispatchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::DispatchFailed(format!(
                "notification service responded with status {}",
                response.status()
            )));
        }

        tracing::debug!(
            comment_id = payload.comment_id,
            blogger_id = payload.blogger_id,
            "notification dispatched"
        );
        Ok(())
    }

    async fn for_blogger(&self, blogger_id: i64) -> ServiceResult<Vec<Notification>> {
        let url = format!("{}/notifications/users/{}", self.base_url, blogger_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| internal(blogger_id, e))?;

        if !response.status().is_success() {
            return Err(ServiceError::Internal(anyhow::anyhow!(
                "Unable to retrieve notifications for user {}: status {}",
                blogger_id,
                response.status()
            )));
        }

        response
            .json::<Vec<Notification>>()
            .await
            .map_err(|e| internal(blogger_id, e))
    }
}

fn internal(blogger_id: i64, err: reqwest::Error) -> ServiceError {
    ServiceError::Internal(anyhow::anyhow!(
        "Unable to retrieve notifications for user {}: {}",
        blogger_id,
        err
    ))
}

#[cfg(test)]
pub mod testing {
    //! Recording gateway for service tests.

    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Gateway double that records every dispatched payload and can be told
    /// to fail dispatch.
    #[derive(Default)]
    pub struct RecordingGateway {
        pub sent: Mutex<Vec<NotificationPayload>>,
        pub fail_dispatch: AtomicBool,
        pub stored: Mutex<Vec<Notification>>,
    }

    impl RecordingGateway {
        pub fn failing() -> Self {
            let gateway = Self::default();
            gateway.fail_dispatch.store(true, Ordering::SeqCst);
            gateway
        }

        pub fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl NotificationGateway for RecordingGateway {
        async fn dispatch(&self, payload: &NotificationPayload) -> ServiceResult<()> {
            if self.fail_dispatch.load(Ordering::SeqCst) {
                return Err(ServiceError::DispatchFailed(
                    "recording gateway set to fail".to_string(),
                ));
            }
            self.sent.lock().unwrap().push(payload.clone());
            Ok(())
        }

        async fn for_blogger(&self, blogger_id: i64) -> ServiceResult<Vec<Notification>> {
            Ok(self
                .stored
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.blogger_id == blogger_id)
                .cloned()
                .collect())
        }
    }
}
