//! Services layer - Business logic
//!
//! The managers in this module own the object-graph consistency rules:
//! - every foreign-key reference in a request is resolved before anything
//!   is written (`resolve`)
//! - cascade semantics differ per relation and are applied through one
//!   policy-driven removal routine (`cascade`)
//! - the blog↔tag relation is mutated only through the link-table
//!   operations, keeping both sides mirrored
//! - a persisted comment triggers exactly one best-effort notification
//!   dispatch

pub mod blog;
pub mod cascade;
pub mod comment;
pub mod resolve;
pub mod tag;
pub mod user;

pub use blog::BlogService;
pub use comment::CommentService;
pub use tag::TagService;
pub use user::UserService;
