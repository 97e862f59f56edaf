use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{DbConn, DbErr, EntityTrait, PaginatorTrait, PrimaryKeyTrait, SqlErr};

use yatube_core::error::RepoError;
use yatube_core::ports::BaseRepository;

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

/// Map a SeaORM error, recognising unique/foreign key violations.
pub(crate) fn map_db_err(e: DbErr) -> RepoError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => return RepoError::Duplicate(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
            return RepoError::MissingReference(msg);
        }
        _ => {}
    }

    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Duplicate("Entity already exists".to_string())
    } else if err_str.contains("foreign key") {
        RepoError::MissingReference("Referenced entity does not exist".to_string())
    } else if matches!(e, DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated) {
        RepoError::NotFound
    } else if matches!(e, DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) {
        RepoError::Connection(err_str)
    } else {
        RepoError::Query(err_str)
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: Sync + Send,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + 'static,
    T: From<E::Model> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id).one(&self.db).await.map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        E::find().count(&self.db).await.map_err(map_db_err)
    }
}
