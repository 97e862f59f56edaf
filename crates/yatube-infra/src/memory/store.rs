//! In-memory implementation of the user, group and post repositories.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use yatube_core::domain::{Group, NewGroup, NewPost, Post, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    BaseRepository, GroupRepository, PostQuery, PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<Uuid, User>,
    groups: BTreeMap<i64, Group>,
    posts: BTreeMap<i64, Post>,
    last_group_id: i64,
    last_post_id: i64,
}

impl Tables {
    /// Matching posts, newest first.
    fn posts_matching(&self, query: PostQuery) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| match query {
                PostQuery::All => true,
                PostQuery::Group(id) => p.group_id == Some(id),
                PostQuery::Author(id) => p.author_id == id,
            })
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }
}

/// Shared in-memory tables.
///
/// All three repositories handed out by one store see the same data. Every
/// mutation holds the async write lock for the duration of a single row change.
/// Note: Data is lost on process restart.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn groups(&self) -> InMemoryGroupRepository {
        InMemoryGroupRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }
}

pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryGroupRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.users.len() as u64)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|u| u.username == user.username || u.id == user.id);
        if taken {
            return Err(RepoError::Duplicate(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl BaseRepository<Group, i64> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, RepoError> {
        Ok(self.tables.read().await.groups.get(&id).cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.groups.len() as u64)
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.groups.values().find(|g| g.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let tables = self.tables.read().await;
        let mut groups: Vec<Group> = tables.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(groups)
    }

    async fn create(&self, group: NewGroup) -> Result<Group, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.groups.values().any(|g| g.slug == group.slug) {
            return Err(RepoError::Duplicate(format!(
                "slug '{}' already exists",
                group.slug
            )));
        }
        tables.last_group_id += 1;
        let group = Group {
            id: tables.last_group_id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        };
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.posts.len() as u64)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn count_matching(&self, query: PostQuery) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.posts_matching(query).len() as u64)
    }

    async fn fetch(
        &self,
        query: PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts_matching(query)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::MissingReference("author does not exist".to_string()));
        }
        if let Some(group_id) = post.group_id {
            if !tables.groups.contains_key(&group_id) {
                return Err(RepoError::MissingReference("group does not exist".to_string()));
            }
        }

        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            text: post.text,
            created_at: post.created_at,
            author_id: post.author_id,
            group_id: post.group_id,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: &Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if let Some(group_id) = post.group_id {
            if !tables.groups.contains_key(&group_id) {
                return Err(RepoError::MissingReference("group does not exist".to_string()));
            }
        }

        let stored = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        stored.text = post.text.clone();
        stored.group_id = post.group_id;
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};

    async fn seeded() -> (InMemoryStore, User, Group) {
        let store = InMemoryStore::new();
        let user = store.users().create(User::new("auth", "hash")).await.unwrap();
        let group = store
            .groups()
            .create(NewGroup::new("Тестовая группа", "test-slug", "Тестовое описание"))
            .await
            .unwrap();
        (store, user, group)
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let (store, _, _) = seeded().await;
        let result = store.users().create(User::new("auth", "other")).await;
        assert!(matches!(result, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let (store, _, _) = seeded().await;
        let result = store
            .groups()
            .create(NewGroup::new("Другая", "test-slug", ""))
            .await;
        assert!(matches!(result, Err(RepoError::Duplicate(_))));
        assert_eq!(store.groups().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_post_for_missing_author_is_a_missing_reference() {
        let (store, _, _) = seeded().await;
        let result = store
            .posts()
            .create(NewPost::new(Uuid::new_v4(), "orphan", None))
            .await;
        assert!(matches!(result, Err(RepoError::MissingReference(_))));
    }

    #[tokio::test]
    async fn test_posts_newest_first_with_id_tiebreak() {
        let (store, user, _) = seeded().await;
        let posts = store.posts();
        let now = Utc::now();

        let mut old = NewPost::new(user.id, "old", None);
        old.created_at = now - TimeDelta::hours(1);
        let mut same_a = NewPost::new(user.id, "same a", None);
        same_a.created_at = now;
        let mut same_b = NewPost::new(user.id, "same b", None);
        same_b.created_at = now;

        // Inserted out of chronological order on purpose.
        posts.create(same_a).await.unwrap();
        posts.create(old).await.unwrap();
        posts.create(same_b).await.unwrap();

        let texts: Vec<String> = posts
            .fetch(PostQuery::All, 0, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(texts, vec!["same b", "same a", "old"]);
    }

    #[tokio::test]
    async fn test_filters_by_group_and_author() {
        let (store, user, group) = seeded().await;
        let other = store.users().create(User::new("leo", "hash")).await.unwrap();
        let posts = store.posts();

        posts.create(NewPost::new(user.id, "in group", Some(group.id))).await.unwrap();
        posts.create(NewPost::new(user.id, "no group", None)).await.unwrap();
        posts.create(NewPost::new(other.id, "by leo", Some(group.id))).await.unwrap();

        assert_eq!(posts.count_matching(PostQuery::All).await.unwrap(), 3);
        assert_eq!(posts.count_matching(PostQuery::Group(group.id)).await.unwrap(), 2);
        assert_eq!(posts.count_matching(PostQuery::Author(user.id)).await.unwrap(), 2);

        let by_leo = posts.fetch(PostQuery::Author(other.id), 0, 10).await.unwrap();
        assert_eq!(by_leo.len(), 1);
        assert_eq!(by_leo[0].text, "by leo");
    }

    #[tokio::test]
    async fn test_update_keeps_author_and_created_at() {
        let (store, user, group) = seeded().await;
        let posts = store.posts();
        let created = posts.create(NewPost::new(user.id, "before", None)).await.unwrap();

        let mut changed = created.clone();
        changed.text = "after".to_string();
        changed.group_id = Some(group.id);
        changed.author_id = Uuid::new_v4();
        let updated = posts.update(&changed).await.unwrap();

        assert_eq!(updated.text, "after");
        assert_eq!(updated.group_id, Some(group.id));
        assert_eq!(updated.author_id, user.id);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let (store, user, _) = seeded().await;
        let ghost = Post {
            id: 42,
            text: "ghost".to_string(),
            created_at: Utc::now(),
            author_id: user.id,
            group_id: None,
        };
        assert!(matches!(
            store.posts().update(&ghost).await,
            Err(RepoError::NotFound)
        ));
    }
}
