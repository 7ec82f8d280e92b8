//! inklog - Service core of a blog publishing platform
//!
//! This library provides the blog/tag/comment aggregate management and the
//! comment notification dispatch path. HTTP routing and the notification
//! service's own storage are left to the embedding application.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod services;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing for the embedding application. `RUST_LOG` overrides
/// the default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inklog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
