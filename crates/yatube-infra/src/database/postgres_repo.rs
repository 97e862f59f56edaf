//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use yatube_core::domain::{Group, NewGroup, NewPost, Post, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{GroupRepository, PostQuery, PostRepository, UserRepository};

use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Hands out the three repositories over one connection pool.
#[derive(Clone)]
pub struct PostgresStore {
    db: DbConn,
}

impl PostgresStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub fn users(&self) -> PostgresUserRepository {
        PostgresUserRepository::new(self.db.clone())
    }

    pub fn groups(&self) -> PostgresGroupRepository {
        PostgresGroupRepository::new(self.db.clone())
    }

    pub fn posts(&self) -> PostgresPostRepository {
        PostgresPostRepository::new(self.db.clone())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let active: user::ActiveModel = user.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        tracing::debug!(slug, "Finding group by slug");

        let result = GroupEntity::find()
            .filter(group::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Title)
            .order_by_asc(group::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, group: NewGroup) -> Result<Group, RepoError> {
        let active: group::ActiveModel = group.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }
}

/// Posts selected by a listing query, without ordering or window.
fn select_posts(query: PostQuery) -> Select<PostEntity> {
    let select = PostEntity::find();
    match query {
        PostQuery::All => select,
        PostQuery::Group(group_id) => select.filter(post::Column::GroupId.eq(group_id)),
        PostQuery::Author(author_id) => select.filter(post::Column::AuthorId.eq(author_id)),
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn count_matching(&self, query: PostQuery) -> Result<u64, RepoError> {
        select_posts(query).count(&self.db).await.map_err(map_db_err)
    }

    async fn fetch(
        &self,
        query: PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let result = select_posts(query)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let active: post::ActiveModel = post.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update(&self, post: &Post) -> Result<Post, RepoError> {
        let existing = PostEntity::find_by_id(post.id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active = existing.into_active_model();
        active.text = Set(post.text.clone());
        active.group_id = Set(post.group_id);
        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }
}

