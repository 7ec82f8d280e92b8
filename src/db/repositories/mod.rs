//! Database repositories
//!
//! Repository pattern implementations for database access. Each repository
//! handles CRUD for a single entity; the object-graph consistency rules live
//! in the services layer, not here.

pub mod blog;
pub mod comment;
pub mod tag;
pub mod user;

pub use blog::{BlogRepository, NewBlogRecord, SqlxBlogRepository};
pub use comment::{CommentRepository, NewCommentRecord, SqlxCommentRepository};
pub use tag::{NewTagRecord, SqlxTagRepository, TagRepository};
pub use user::{SqlxUserRepository, UserRepository};
