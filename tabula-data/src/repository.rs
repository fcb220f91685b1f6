use std::future::Future;

use crate::entity::Entity;
use crate::error::DataError;
use crate::query::{Condition, QueryBuilder};
use crate::value::Value;

/// Generic async repository contract for CRUD operations over one entity type.
///
/// Uses RPITIT (return-position `impl Trait` in traits) — no `async-trait`
/// needed. Backends implement this for their pool-backed repository;
/// transaction-scoped repositories mirror the same surface with `&mut self`
/// receivers to enforce exclusivity.
pub trait Repository<T>: Send + Sync
where
    T: Entity,
{
    /// Insert one entity. A store-generated key is written back into `entity`.
    fn create(&self, entity: &mut T) -> impl Future<Output = Result<(), DataError>> + Send;

    /// Insert all entities in one statement. An empty slice is a no-op success.
    fn create_batch(&self, entities: &[T]) -> impl Future<Output = Result<(), DataError>> + Send;

    /// Fetch exactly one entity by primary key; a missing key is a
    /// not-found error, never a generic one.
    fn find_by_id(
        &self,
        id: impl Into<Value> + Send,
    ) -> impl Future<Output = Result<T, DataError>> + Send;

    /// Fetch all entities. No matching rows is an empty vec, not an error.
    fn find_all(&self) -> impl Future<Output = Result<Vec<T>, DataError>> + Send;

    /// Fetch entities matching the builder's predicates.
    fn query(&self, query: QueryBuilder) -> impl Future<Output = Result<Vec<T>, DataError>> + Send;

    /// Fetch the first entity matching the builder's predicates; an empty
    /// result is a not-found error.
    fn query_one(&self, query: QueryBuilder) -> impl Future<Output = Result<T, DataError>> + Send;

    /// Update all columns of an entity by primary key. Returns rows affected.
    fn update(&self, entity: &T) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Update only the named fields of the row with the given id. Field names
    /// are honored as-is; unknown fields fail at execution time. An empty
    /// field list is a no-op success.
    fn update_partial(
        &self,
        id: impl Into<Value> + Send,
        updates: &[(&str, Value)],
    ) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Delete by primary key. Returns rows affected.
    fn delete(
        &self,
        id: impl Into<Value> + Send,
    ) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Delete all rows matching the predicate. Returns rows affected.
    fn delete_by_condition(
        &self,
        condition: Condition,
    ) -> impl Future<Output = Result<u64, DataError>> + Send;

    fn count(&self) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// `exists` is defined purely as `count() > 0`.
    fn exists(&self) -> impl Future<Output = Result<bool, DataError>> + Send;
}
