//! Transactional scoping.
//!
//! The contract is "one function, one outcome": [`SqlxRepository::transaction`]
//! opens the transaction, hands the callback an exclusive [`TxRepository`],
//! commits when the callback returns `Ok`, and rolls back when it returns
//! `Err`. There are no public commit/rollback/savepoint primitives.

use std::marker::PhantomData;

use futures_util::future::BoxFuture;
use sqlx::any::Any;
use sqlx::Transaction;
use tabula_data::{
    Condition, DataError, Dialect, Entity, EntityInfo, ExecResult, QueryBuilder, Value,
};
use tracing::{debug, warn};

use crate::error::SqlxErrorExt;
use crate::ops;
use crate::repository::{SqlxEntity, SqlxRepository};

/// A repository bound to one transaction.
///
/// Mirrors the [`Repository`](tabula_data::Repository) surface with
/// `&mut self` receivers: the transaction holds a single connection, and the
/// borrow checker enforces that it is never used from two places at once.
pub struct TxRepository<T> {
    tx: Transaction<'static, Any>,
    dialect: Dialect,
    _marker: PhantomData<T>,
}

impl<T: SqlxEntity> TxRepository<T> {
    fn new(tx: Transaction<'static, Any>, dialect: Dialect) -> Self {
        Self {
            tx,
            dialect,
            _marker: PhantomData,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::new(T::table_name()).dialect(self.dialect)
    }

    pub fn entity_info(&self) -> EntityInfo {
        EntityInfo::of::<T>()
    }

    pub async fn create(&mut self, entity: &mut T) -> Result<(), DataError> {
        ops::insert_one(&mut *self.tx, self.dialect, entity).await
    }

    pub async fn create_batch(&mut self, entities: &[T]) -> Result<(), DataError> {
        ops::insert_many(&mut *self.tx, self.dialect, entities).await
    }

    pub async fn find_by_id(&mut self, id: impl Into<Value> + Send) -> Result<T, DataError> {
        ops::find_by_id(&mut *self.tx, self.dialect, id.into()).await
    }

    pub async fn find_all(&mut self) -> Result<Vec<T>, DataError> {
        let query = self.query_builder();
        ops::select(&mut *self.tx, self.dialect, query).await
    }

    pub async fn query(&mut self, query: QueryBuilder) -> Result<Vec<T>, DataError> {
        ops::select(&mut *self.tx, self.dialect, query).await
    }

    pub async fn query_one(&mut self, query: QueryBuilder) -> Result<T, DataError> {
        ops::select_one(&mut *self.tx, self.dialect, query).await
    }

    pub async fn update(&mut self, entity: &T) -> Result<u64, DataError> {
        ops::update_full(&mut *self.tx, self.dialect, entity).await
    }

    pub async fn update_partial(
        &mut self,
        id: impl Into<Value> + Send,
        updates: &[(&str, Value)],
    ) -> Result<u64, DataError> {
        ops::update_partial::<T, _>(&mut *self.tx, self.dialect, id.into(), updates).await
    }

    pub async fn delete(&mut self, id: impl Into<Value> + Send) -> Result<u64, DataError> {
        let query = self.query_builder().where_eq(T::id_column(), id.into());
        ops::delete_where(&mut *self.tx, self.dialect, query).await
    }

    pub async fn delete_by_condition(&mut self, condition: Condition) -> Result<u64, DataError> {
        let query = self.query_builder().filter(condition);
        ops::delete_where(&mut *self.tx, self.dialect, query).await
    }

    pub async fn count(&mut self) -> Result<u64, DataError> {
        ops::count::<T, _>(&mut *self.tx, self.dialect).await
    }

    pub async fn exists(&mut self) -> Result<bool, DataError> {
        Ok(self.count().await? > 0)
    }

    pub async fn raw_query(&mut self, sql: &str, params: Vec<Value>) -> Result<Vec<T>, DataError> {
        ops::raw_query(&mut *self.tx, sql, params).await
    }

    pub async fn raw_exec(&mut self, sql: &str, params: Vec<Value>) -> Result<ExecResult, DataError> {
        ops::raw_exec(&mut *self.tx, sql, params).await
    }

    async fn commit(self) -> Result<(), DataError> {
        self.tx.commit().await.map_err(|e| e.into_data_error())
    }

    async fn rollback(self) {
        // Best-effort: the failure that triggered the rollback is what the
        // caller gets, not a rollback failure.
        if let Err(err) = self.tx.rollback().await {
            warn!(error = %err, "transaction rollback failed");
        }
    }
}

impl<T: SqlxEntity> SqlxRepository<T> {
    /// Run `f` inside a transaction bound to one connection.
    ///
    /// The callback receives an exclusive transaction-scoped repository over
    /// the same entity type. `Ok` commits; `Err` rolls back and the
    /// callback's error is returned unchanged.
    ///
    /// # Example
    ///
    /// ```ignore
    /// users
    ///     .transaction(|tx| {
    ///         Box::pin(async move {
    ///             tx.create(&mut alice).await?;
    ///             tx.create(&mut bob).await?;
    ///             Ok(())
    ///         })
    ///     })
    ///     .await?;
    /// ```
    pub async fn transaction<R, F>(&self, f: F) -> Result<R, DataError>
    where
        R: Send,
        F: for<'t> FnOnce(&'t mut TxRepository<T>) -> BoxFuture<'t, Result<R, DataError>> + Send,
    {
        let tx = self.pool.begin().await.map_err(|e| e.into_data_error())?;
        let mut repo = TxRepository::new(tx, self.dialect);
        debug!(table = T::table_name(), "transaction started");
        match f(&mut repo).await {
            Ok(value) => {
                repo.commit().await?;
                debug!(table = T::table_name(), "transaction committed");
                Ok(value)
            }
            Err(err) => {
                repo.rollback().await;
                debug!(table = T::table_name(), "transaction rolled back");
                Err(err)
            }
        }
    }
}
