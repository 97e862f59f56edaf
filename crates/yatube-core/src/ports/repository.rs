use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Group, NewGroup, NewPost, Post, User};
use crate::error::RepoError;

/// Generic repository trait shared by every entity store.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Number of stored entities.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their username (exact match).
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Insert a new user. Fails with `RepoError::Duplicate` on a taken username.
    async fn create(&self, user: User) -> Result<User, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, i64> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// All groups ordered by title.
    async fn list(&self) -> Result<Vec<Group>, RepoError>;

    /// Insert a new group. Fails with `RepoError::Duplicate` on a taken slug.
    async fn create(&self, group: NewGroup) -> Result<Group, RepoError>;
}

/// Which posts a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostQuery {
    All,
    Group(i64),
    Author(Uuid),
}

/// Post repository.
///
/// Listings are ordered newest first: `created_at` descending, then `id`
/// descending so posts created within the same instant keep a stable order.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Number of posts matching the query.
    async fn count_matching(&self, query: PostQuery) -> Result<u64, RepoError>;

    /// One ordered window of the posts matching the query.
    async fn fetch(&self, query: PostQuery, offset: u64, limit: u64)
    -> Result<Vec<Post>, RepoError>;

    /// Insert a new post and return it with its assigned ID.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Overwrite the text and group of an existing post.
    /// Author, ID and creation time are never touched.
    async fn update(&self, post: &Post) -> Result<Post, RepoError>;
}
