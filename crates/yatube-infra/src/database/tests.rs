use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use yatube_core::domain::{Group, NewPost, Post, User};
use yatube_core::ports::{BaseRepository, GroupRepository, PostQuery, PostRepository, UserRepository};

use crate::database::entity::{group, post, user};
use crate::database::postgres_repo::PostgresStore;

fn post_model(id: i64, author_id: Uuid, group_id: Option<i64>) -> post::Model {
    post::Model {
        id,
        text: format!("Тестовый пост {id}"),
        created_at: Utc::now().into(),
        author_id,
        group_id,
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let author_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(5, author_id, Some(1))]])
        .into_connection();

    let repo = PostgresStore::new(db).posts();
    let result: Option<Post> = repo.find_by_id(5).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.id, 5);
    assert_eq!(post.text, "Тестовый пост 5");
    assert_eq!(post.author_id, author_id);
    assert_eq!(post.group_id, Some(1));
}

#[tokio::test]
async fn test_find_user_by_username() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user::Model {
            id,
            username: "auth".to_owned(),
            password_hash: "hash".to_owned(),
            created_at: Utc::now().into(),
        }]])
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let repo = PostgresStore::new(db).users();
    let found: Option<User> = repo.find_by_username("auth").await.unwrap();
    assert_eq!(found.unwrap().id, id);

    let missing = repo.find_by_username("nobody").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_find_group_by_slug() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![group::Model {
            id: 3,
            title: "Тестовая группа".to_owned(),
            slug: "test-slug".to_owned(),
            description: "Тестовое описание".to_owned(),
        }]])
        .into_connection();

    let repo = PostgresStore::new(db).groups();
    let group: Group = repo.find_by_slug("test-slug").await.unwrap().unwrap();
    assert_eq!(group.id, 3);
    assert_eq!(group.to_string(), "Тестовая группа");
}

#[tokio::test]
async fn test_fetch_maps_rows_in_query_order() {
    let author_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            post_model(14, author_id, None),
            post_model(13, author_id, None),
        ]])
        .into_connection();

    let repo = PostgresStore::new(db).posts();
    let posts = repo.fetch(PostQuery::Author(author_id), 10, 2).await.unwrap();
    assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![14, 13]);
    assert!(posts.iter().all(|p| p.author_id == author_id));
}

#[tokio::test]
async fn test_create_post_returns_assigned_id() {
    let author_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(1, author_id, None)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 1,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresStore::new(db).posts();
    let created = repo
        .create(NewPost::new(author_id, "Тестовый пост 1", None))
        .await
        .unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.author_id, author_id);
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresStore::new(db).posts();
    let ghost = Post {
        id: 99,
        text: "ghost".to_string(),
        created_at: Utc::now(),
        author_id: Uuid::new_v4(),
        group_id: None,
    };
    let result = repo.update(&ghost).await;
    assert!(matches!(result, Err(yatube_core::error::RepoError::NotFound)));
}

#[test]
fn test_constraint_errors_are_told_apart() {
    use sea_orm::DbErr;
    use yatube_core::error::RepoError;

    use crate::database::postgres_base::map_db_err;

    let unique = DbErr::Custom(
        "duplicate key value violates unique constraint \"groups_slug_key\"".to_string(),
    );
    assert!(matches!(map_db_err(unique), RepoError::Duplicate(_)));

    let foreign = DbErr::Custom(
        "insert or update on table \"posts\" violates foreign key constraint \"fk-posts-author_id\""
            .to_string(),
    );
    assert!(matches!(map_db_err(foreign), RepoError::MissingReference(_)));
}
