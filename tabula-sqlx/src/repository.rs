use std::marker::PhantomData;

use sqlx::any::AnyRow;
use sqlx::{AnyPool, FromRow};
use tabula_data::{
    Condition, DataError, Dialect, Entity, EntityInfo, ExecResult, QueryBuilder, Repository, Value,
};

use crate::ops;

/// Entities usable with the sqlx backend: the mapping descriptor plus row
/// decoding. Blanket-implemented, never implemented by hand.
pub trait SqlxEntity: Entity + for<'r> FromRow<'r, AnyRow> {}

impl<T> SqlxEntity for T where T: Entity + for<'r> FromRow<'r, AnyRow> {}

/// A generic SQL repository over one entity type.
///
/// Wraps a shared `AnyPool`; cheap to construct and clone, one per entity
/// type. Stateless beyond the pool handle and the dialect.
///
/// # Example
///
/// ```ignore
/// let users: SqlxRepository<User> = provider.repository();
/// let alice = users.find_by_id(1i64).await?;
/// ```
pub struct SqlxRepository<T> {
    pub(crate) pool: AnyPool,
    pub(crate) dialect: Dialect,
    _marker: PhantomData<T>,
}

impl<T: SqlxEntity> SqlxRepository<T> {
    pub fn new(pool: AnyPool, dialect: Dialect) -> Self {
        Self {
            pool,
            dialect,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Create a [`QueryBuilder`] pre-configured for this entity's table and
    /// this repository's dialect.
    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::new(T::table_name()).dialect(self.dialect)
    }

    /// Type-level metadata derived from the entity's mapping descriptor.
    pub fn entity_info(&self) -> EntityInfo {
        EntityInfo::of::<T>()
    }

    /// Execute a raw query for cases the structured API cannot express;
    /// results are still scanned into the entity type.
    pub async fn raw_query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<T>, DataError> {
        ops::raw_query(&self.pool, sql, params).await
    }

    /// Execute a raw statement, returning rows affected and the last insert
    /// id where the dialect provides one.
    pub async fn raw_exec(&self, sql: &str, params: Vec<Value>) -> Result<ExecResult, DataError> {
        ops::raw_exec(&self.pool, sql, params).await
    }
}

impl<T> Clone for SqlxRepository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            dialect: self.dialect,
            _marker: PhantomData,
        }
    }
}

impl<T: SqlxEntity> Repository<T> for SqlxRepository<T> {
    async fn create(&self, entity: &mut T) -> Result<(), DataError> {
        ops::insert_one(&self.pool, self.dialect, entity).await
    }

    async fn create_batch(&self, entities: &[T]) -> Result<(), DataError> {
        ops::insert_many(&self.pool, self.dialect, entities).await
    }

    async fn find_by_id(&self, id: impl Into<Value> + Send) -> Result<T, DataError> {
        ops::find_by_id(&self.pool, self.dialect, id.into()).await
    }

    async fn find_all(&self) -> Result<Vec<T>, DataError> {
        ops::select(&self.pool, self.dialect, self.query_builder()).await
    }

    async fn query(&self, query: QueryBuilder) -> Result<Vec<T>, DataError> {
        ops::select(&self.pool, self.dialect, query).await
    }

    async fn query_one(&self, query: QueryBuilder) -> Result<T, DataError> {
        ops::select_one(&self.pool, self.dialect, query).await
    }

    async fn update(&self, entity: &T) -> Result<u64, DataError> {
        ops::update_full(&self.pool, self.dialect, entity).await
    }

    async fn update_partial(
        &self,
        id: impl Into<Value> + Send,
        updates: &[(&str, Value)],
    ) -> Result<u64, DataError> {
        ops::update_partial::<T, _>(&self.pool, self.dialect, id.into(), updates).await
    }

    async fn delete(&self, id: impl Into<Value> + Send) -> Result<u64, DataError> {
        let query = self.query_builder().where_eq(T::id_column(), id.into());
        ops::delete_where(&self.pool, self.dialect, query).await
    }

    async fn delete_by_condition(&self, condition: Condition) -> Result<u64, DataError> {
        let query = self.query_builder().filter(condition);
        ops::delete_where(&self.pool, self.dialect, query).await
    }

    async fn count(&self) -> Result<u64, DataError> {
        ops::count::<T, _>(&self.pool, self.dialect).await
    }

    async fn exists(&self) -> Result<bool, DataError> {
        Ok(self.count().await? > 0)
    }
}
