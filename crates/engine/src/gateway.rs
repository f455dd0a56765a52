//! Generic persistence gateway.
//!
//! A [`Gateway`] offers `create`/`find`/`update`/`delete` for one [`Record`]
//! type against one connection handle. It never opens, commits or rolls back
//! transactions: callers hand it the [`DatabaseTransaction`] they own and the
//! gateway's writes become part of it.
//!
//! ```ignore
//! let accounts = Gateway::<Account, _>::on(&db_tx);
//! let mut account = accounts.find(id).await?.ok_or(EngineError::AccountNotFound(id))?;
//! account.credit(amount)?;
//! accounts.update(&account).await?;
//! ```
//!
//! [`DatabaseTransaction`]: sea_orm::DatabaseTransaction

use std::{fmt, marker::PhantomData};

use sea_orm::{
    ActiveModelBehavior, Condition, IntoActiveModel, QueryFilter, QueryOrder, SqlErr, prelude::*,
};

use crate::{EngineError, ResultEngine, error::is_foreign_key_violation, guard};

pub type ModelOf<R> = <<R as Record>::Entity as EntityTrait>::Model;
pub type ActiveModelOf<R> = <<R as Record>::Entity as EntityTrait>::ActiveModel;
pub type ColumnOf<R> = <<R as Record>::Entity as EntityTrait>::Column;

/// A domain record persisted in a single table.
pub trait Record: Sized + Send + Sync {
    /// The sea-orm entity backing the record.
    type Entity: EntityTrait;
    /// Typed identifier assigned by the database.
    type Id: Copy + Into<i32> + fmt::Display + Send + Sync;
    /// Input for [`Gateway::create`]: the record without its identity.
    type New: Send + Sync;

    /// Human readable name used in error messages.
    const LABEL: &'static str;

    fn id(&self) -> Self::Id;

    fn id_column() -> ColumnOf<Self>;

    /// Active model for an insert; the primary key is left `NotSet`.
    fn new_model(new: &Self::New) -> ActiveModelOf<Self>;

    /// Active model carrying every column of `self`, primary key included.
    fn to_model(&self) -> ActiveModelOf<Self>;

    fn from_model(model: ModelOf<Self>) -> ResultEngine<Self>;

    /// Extra condition an update must satisfy (optimistic locking).
    fn concurrency_token(&self) -> Option<Condition> {
        None
    }
}

/// CRUD access to records of type `R` through the connection `C`.
pub struct Gateway<'c, R, C> {
    conn: &'c C,
    record: PhantomData<fn() -> R>,
}

impl<'c, R, C> Gateway<'c, R, C>
where
    R: Record,
    C: ConnectionTrait,
    ModelOf<R>: IntoActiveModel<ActiveModelOf<R>> + Send + Sync,
    ActiveModelOf<R>: ActiveModelBehavior + Send,
{
    pub fn on(conn: &'c C) -> Self {
        Self {
            conn,
            record: PhantomData,
        }
    }

    /// Inserts a new record and returns it with its assigned identity.
    pub async fn create(&self, new: &R::New) -> ResultEngine<R> {
        let model = R::new_model(new)
            .insert(self.conn)
            .await
            .map_err(storage_error)?;
        R::from_model(model)
    }

    /// Loads a record; a missing row is `Ok(None)`.
    pub async fn find(&self, id: R::Id) -> ResultEngine<Option<R>> {
        let id: i32 = id.into();
        R::Entity::find()
            .filter(R::id_column().eq(id))
            .one(self.conn)
            .await?
            .map(R::from_model)
            .transpose()
    }

    /// Loads every record ordered by identity.
    pub async fn list(&self) -> ResultEngine<Vec<R>> {
        R::Entity::find()
            .order_by_asc(R::id_column())
            .all(self.conn)
            .await?
            .into_iter()
            .map(R::from_model)
            .collect()
    }

    /// Writes the full record by identity, inserting it when no row exists.
    ///
    /// Fails with [`EngineError::Conflict`] when the row exists but its
    /// concurrency token no longer matches.
    pub async fn update(&self, record: &R) -> ResultEngine<()> {
        let id: i32 = record.id().into();
        let mut query = R::Entity::update_many()
            .set(record.to_model())
            .filter(R::id_column().eq(id));
        if let Some(token) = record.concurrency_token() {
            query = query.filter(token);
        }
        let result = query.exec(self.conn).await.map_err(storage_error)?;
        if result.rows_affected > 0 {
            return Ok(());
        }

        if self.find(record.id()).await?.is_some() {
            return Err(EngineError::Conflict(format!(
                "{} {} was modified concurrently",
                R::LABEL,
                record.id()
            )));
        }
        record
            .to_model()
            .insert(self.conn)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    /// Deletes a record; deleting a missing row is a no-op.
    pub async fn delete(&self, id: R::Id) -> ResultEngine<()> {
        let id: i32 = id.into();
        R::Entity::delete_many()
            .filter(R::id_column().eq(id))
            .exec(self.conn)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}

/// Translates a rejected write into the matching engine error.
pub(crate) fn storage_error(err: DbErr) -> EngineError {
    if guard::is_balance_invariant(&err) {
        return EngineError::BalanceInvariant(err.to_string());
    }
    if is_foreign_key_violation(&err) {
        return EngineError::Restricted(err.to_string());
    }
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => EngineError::ExistingKey(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => EngineError::Restricted(detail),
        _ => EngineError::Database(err),
    }
}
