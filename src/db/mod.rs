//! Database layer
//!
//! SQLite-backed persistence for the blog core. Repositories are thin
//! pass-throughs exposing get/get-by-id/save/delete/find-by-unique-field;
//! the consistency rules live in the services layer.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
