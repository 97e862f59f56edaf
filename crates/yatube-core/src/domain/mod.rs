//! Domain entities - the core business objects.

mod group;
mod post;
mod user;

pub use group::{Group, NewGroup};
pub use post::{NewPost, POST_PREVIEW_CHARS, Post, PostCard};
pub use user::User;
