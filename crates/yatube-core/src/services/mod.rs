//! Services - the rules that sit between routes and the entity store.

pub mod access;
mod accounts;
mod blog;
pub mod pagination;

pub use access::{Actor, can_create, can_edit};
pub use accounts::Accounts;
pub use blog::{Blog, PostFeed};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, Sequence, page_number, paginate};
