//! Listing, lookup and mutation of posts.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Group, NewGroup, NewPost, Post, PostCard, User};
use crate::error::{DomainError, RepoError};
use crate::forms::{PostForm, PostInput};
use crate::ports::{GroupRepository, PostQuery, PostRepository, UserRepository};

use super::access::{Actor, can_create, can_edit};
use super::pagination::{Page, Sequence, paginate};

/// A restartable, newest-first listing of posts.
///
/// Holds only the query, so it can be counted and sliced repeatedly.
#[derive(Clone)]
pub struct PostFeed {
    posts: Arc<dyn PostRepository>,
    query: PostQuery,
}

#[async_trait]
impl Sequence for PostFeed {
    type Item = Post;

    async fn total(&self) -> Result<u64, RepoError> {
        self.posts.count_matching(self.query).await
    }

    async fn slice(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        self.posts.fetch(self.query, offset, limit).await
    }
}

/// Blog service: public listings plus author-gated create and edit.
#[derive(Clone)]
pub struct Blog {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
}

impl Blog {
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        posts: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            users,
            groups,
            posts,
        }
    }

    fn feed(&self, query: PostQuery) -> PostFeed {
        PostFeed {
            posts: self.posts.clone(),
            query,
        }
    }

    /// Every post, newest first.
    pub fn list_all(&self) -> PostFeed {
        self.feed(PostQuery::All)
    }

    /// Posts of the group with this slug.
    pub async fn list_by_group(&self, slug: &str) -> Result<(Group, PostFeed), DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Group", slug))?;
        let feed = self.feed(PostQuery::Group(group.id));
        Ok((group, feed))
    }

    /// Posts written by the user with this username.
    pub async fn list_by_author(&self, username: &str) -> Result<(User, PostFeed), DomainError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", username))?;
        let feed = self.feed(PostQuery::Author(author.id));
        Ok((author, feed))
    }

    /// One page of a feed with authors and groups attached.
    pub async fn page(
        &self,
        feed: &PostFeed,
        number: u64,
        size: u64,
    ) -> Result<Page<PostCard>, DomainError> {
        let mut page = paginate(feed, number, size).await?;
        let posts = std::mem::take(&mut page.items);
        let cards = self.cards(posts).await?;
        Ok(page.with_items(cards))
    }

    pub async fn find_post(&self, post_id: i64) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    /// A single post with its author and group.
    pub async fn get_post(&self, post_id: i64) -> Result<PostCard, DomainError> {
        let post = self.find_post(post_id).await?;
        let mut cards = self.cards(vec![post]).await?;
        cards
            .pop()
            .ok_or_else(|| DomainError::Internal("Post card lost".to_string()))
    }

    /// How many posts an author has published.
    pub async fn author_post_count(&self, author_id: Uuid) -> Result<u64, DomainError> {
        Ok(self.posts.count_matching(PostQuery::Author(author_id)).await?)
    }

    /// Groups offered by the post form.
    pub async fn group_choices(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.groups.list().await?)
    }

    /// Add a community group. Callers check the administrator role.
    pub async fn create_group(&self, group: NewGroup) -> Result<Group, DomainError> {
        group.validate()?;
        let group = self.groups.create(group).await?;
        tracing::info!(group_id = group.id, slug = %group.slug, "Group created");
        Ok(group)
    }

    /// Publish a post on behalf of `actor`.
    pub async fn create_post(&self, actor: &Actor, input: &PostInput) -> Result<Post, DomainError> {
        let author_id = match actor.user_id() {
            Some(id) if can_create(actor) => id,
            _ => {
                tracing::warn!("Anonymous post creation rejected");
                return Err(DomainError::PermissionDenied);
            }
        };

        // A signed session can outlive its account, e.g. after an in-memory restart.
        if self.users.find_by_id(author_id).await?.is_none() {
            tracing::warn!(%author_id, "Post creation by unknown user rejected");
            return Err(DomainError::PermissionDenied);
        }

        let groups = self.groups.list().await?;
        let cleaned = PostForm::clean(input, &groups).map_err(DomainError::Validation)?;

        let post = self
            .posts
            .create(NewPost::new(author_id, cleaned.text, cleaned.group_id))
            .await?;
        tracing::info!(post_id = post.id, author = ?actor.username(), "Post created");
        Ok(post)
    }

    /// Replace the text and group of a post written by `actor`.
    pub async fn edit_post(
        &self,
        actor: &Actor,
        post_id: i64,
        input: &PostInput,
    ) -> Result<Post, DomainError> {
        let mut post = self.find_post(post_id).await?;
        if !can_edit(actor, &post) {
            tracing::warn!(post_id, actor = ?actor.username(), "Post edit rejected");
            return Err(DomainError::PermissionDenied);
        }

        let groups = self.groups.list().await?;
        let cleaned = PostForm::clean(input, &groups).map_err(DomainError::Validation)?;

        post.text = cleaned.text;
        post.group_id = cleaned.group_id;
        let updated = self.posts.update(&post).await?;
        tracing::info!(post_id, "Post updated");
        Ok(updated)
    }

    /// Attach authors and groups, looking each one up once.
    async fn cards(&self, posts: Vec<Post>) -> Result<Vec<PostCard>, DomainError> {
        let mut authors: HashMap<Uuid, User> = HashMap::new();
        let mut groups: HashMap<i64, Group> = HashMap::new();
        let mut cards = Vec::with_capacity(posts.len());

        for post in posts {
            if !authors.contains_key(&post.author_id) {
                let author = self
                    .users
                    .find_by_id(post.author_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("User", post.author_id))?;
                authors.insert(author.id, author);
            }
            if let Some(group_id) = post.group_id {
                if !groups.contains_key(&group_id) {
                    if let Some(group) = self.groups.find_by_id(group_id).await? {
                        groups.insert(group.id, group);
                    }
                }
            }

            let author = authors[&post.author_id].clone();
            let group = post.group_id.and_then(|id| groups.get(&id).cloned());
            cards.push(PostCard {
                post,
                author,
                group,
            });
        }

        Ok(cards)
    }
}
