use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sqlx::{self, error::ErrorKind};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, RuntimeErr,
};

use blogly_core::error::RepoError;
use blogly_core::ports::BaseRepository;

/// Ties a SeaORM entity to the domain types it stores.
pub trait DomainEntity: EntityTrait {
    /// The stored domain entity.
    type Domain: From<Self::Model> + Into<Self::ActiveModel> + Send + Sync + 'static;
    /// The shape used to create one.
    type New: Into<Self::ActiveModel> + Send + Sync + 'static;
}

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    db: Arc<DbConn>,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    /// Accepts an owned connection or one shared with other repositories.
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self {
            db: db.into(),
            _entity: PhantomData,
        }
    }

    pub(crate) fn conn(&self) -> &DbConn {
        &self.db
    }
}

/// Message of a unique or foreign-key violation reported by the database.
fn constraint_violation(err: &DbErr) -> Option<String> {
    let (DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db)))
    | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db)))) = err
    else {
        return None;
    };

    match db.kind() {
        ErrorKind::UniqueViolation | ErrorKind::ForeignKeyViolation => {
            Some(db.message().to_owned())
        }
        _ => None,
    }
}

/// Translate SeaORM failures into repository errors.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    if let Some(msg) = constraint_violation(&err) {
        return RepoError::Constraint(msg);
    }

    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

#[async_trait]
impl<E, ID> BaseRepository<E::Domain, E::New, ID> for PostgresBaseRepository<E>
where
    E: DomainEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + Copy + 'static,
{
    async fn find_all(&self) -> Result<Vec<E::Domain>, RepoError> {
        let models = E::find().all(self.conn()).await.map_err(map_db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: ID) -> Result<Option<E::Domain>, RepoError> {
        let result = E::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, new: E::New) -> Result<E::Domain, RepoError> {
        let active_model: E::ActiveModel = new.into();
        let model = active_model.insert(self.conn()).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update(&self, entity: E::Domain) -> Result<E::Domain, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model.update(self.conn()).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: ID) -> Result<(), RepoError> {
        let result = E::delete_by_id(id)
            .exec(self.conn())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
