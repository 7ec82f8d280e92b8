//! Domain models
//!
//! Entity and input types for the blog publishing core.

pub mod blog;
pub mod comment;
pub mod notification;
pub mod tag;
pub mod user;

pub use blog::{Blog, BlogDetail, NewBlog, UpdateBlog};
pub use comment::{Comment, CommentBody, NewComment, UpdateComment};
pub use notification::{Notification, NotificationPayload};
pub use tag::{NewTag, Tag, TagBody};
pub use user::{Address, NewAddress, NewUser, User};
