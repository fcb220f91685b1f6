//! Statement execution shared by the pool-backed and transaction-scoped
//! repositories. Every operation is generic over `sqlx::Executor` so the same
//! body runs against `&AnyPool` and `&mut AnyConnection`.

use sqlx::any::{Any, AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Executor, FromRow, Row};
use tabula_data::query::{insert_statement, update_statement};
use tabula_data::{DataError, Dialect, Entity, ExecResult, QueryBuilder, Value};

use crate::error::SqlxErrorExt;
use crate::repository::SqlxEntity;

type AnyQuery<'q> = Query<'q, Any, AnyArguments<'q>>;

fn bind_value(query: AnyQuery<'_>, value: Value) -> AnyQuery<'_> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(v) => query.bind(v),
        Value::Int(v) => query.bind(v),
        Value::Float(v) => query.bind(v),
        Value::Text(v) => query.bind(v),
    }
}

fn bind_values(mut query: AnyQuery<'_>, values: Vec<Value>) -> AnyQuery<'_> {
    for value in values {
        query = bind_value(query, value);
    }
    query
}

/// Full select list: the id column followed by the data columns.
fn select_columns<T: Entity>() -> Vec<&'static str> {
    std::iter::once(T::id_column())
        .chain(T::columns().iter().copied())
        .collect()
}

fn decode_rows<T: SqlxEntity>(rows: &[AnyRow]) -> Result<Vec<T>, DataError> {
    rows.iter()
        .map(|row| T::from_row(row).map_err(|e| e.into_data_error()))
        .collect()
}

pub(crate) async fn insert_one<'e, T, E>(
    exec: E,
    dialect: Dialect,
    entity: &mut T,
) -> Result<(), DataError>
where
    T: SqlxEntity,
    E: Executor<'e, Database = Any>,
{
    if !T::id_is_generated() {
        let columns = select_columns::<T>();
        let sql = insert_statement(dialect, T::table_name(), &columns, 1, None);
        let mut values = vec![entity.id_value()];
        values.extend(entity.values());
        bind_values(sqlx::query(&sql), values)
            .execute(exec)
            .await
            .map_err(|e| e.into_data_error())?;
        return Ok(());
    }

    // Generated keys: Postgres reports them via RETURNING, the others via
    // the statement result.
    if dialect == Dialect::Postgres {
        let sql = insert_statement(dialect, T::table_name(), T::columns(), 1, Some(T::id_column()));
        let row = bind_values(sqlx::query(&sql), entity.values())
            .fetch_one(exec)
            .await
            .map_err(|e| e.into_data_error())?;
        let id: i64 = row.try_get(0).map_err(|e| e.into_data_error())?;
        entity.set_generated_id(id);
    } else {
        let sql = insert_statement(dialect, T::table_name(), T::columns(), 1, None);
        let result = bind_values(sqlx::query(&sql), entity.values())
            .execute(exec)
            .await
            .map_err(|e| e.into_data_error())?;
        if let Some(id) = result.last_insert_id() {
            entity.set_generated_id(id);
        }
    }
    Ok(())
}

pub(crate) async fn insert_many<'e, T, E>(
    exec: E,
    dialect: Dialect,
    entities: &[T],
) -> Result<(), DataError>
where
    T: SqlxEntity,
    E: Executor<'e, Database = Any>,
{
    // Multi-row VALUES syntax cannot represent zero rows; an empty batch is
    // a deliberate no-op success.
    if entities.is_empty() {
        return Ok(());
    }
    let (columns, include_id) = if T::id_is_generated() {
        (T::columns().to_vec(), false)
    } else {
        (select_columns::<T>(), true)
    };
    let sql = insert_statement(dialect, T::table_name(), &columns, entities.len(), None);
    let mut values = Vec::with_capacity(entities.len() * columns.len());
    for entity in entities {
        if include_id {
            values.push(entity.id_value());
        }
        values.extend(entity.values());
    }
    bind_values(sqlx::query(&sql), values)
        .execute(exec)
        .await
        .map_err(|e| e.into_data_error())?;
    Ok(())
}

pub(crate) async fn find_by_id<'e, T, E>(
    exec: E,
    dialect: Dialect,
    id: Value,
) -> Result<T, DataError>
where
    T: SqlxEntity,
    E: Executor<'e, Database = Any>,
{
    let columns = select_columns::<T>();
    let (sql, params) = QueryBuilder::new(T::table_name())
        .dialect(dialect)
        .where_eq(T::id_column(), id)
        .build_select(&columns);
    let row = bind_values(sqlx::query(&sql), params)
        .fetch_optional(exec)
        .await
        .map_err(|e| e.into_data_error())?;
    match row {
        Some(row) => T::from_row(&row).map_err(|e| e.into_data_error()),
        None => Err(DataError::not_found("record not found")),
    }
}

pub(crate) async fn select<'e, T, E>(
    exec: E,
    dialect: Dialect,
    query: QueryBuilder,
) -> Result<Vec<T>, DataError>
where
    T: SqlxEntity,
    E: Executor<'e, Database = Any>,
{
    let columns = select_columns::<T>();
    let (sql, params) = query.dialect(dialect).build_select(&columns);
    let rows = bind_values(sqlx::query(&sql), params)
        .fetch_all(exec)
        .await
        .map_err(|e| e.into_data_error())?;
    decode_rows(&rows)
}

/// Delegates to [`select`] and takes the first row. The empty-is-success
/// policy of `select` means the no-rows signal never propagates from the
/// executor on this path, so not-found is synthesized here.
pub(crate) async fn select_one<'e, T, E>(
    exec: E,
    dialect: Dialect,
    query: QueryBuilder,
) -> Result<T, DataError>
where
    T: SqlxEntity,
    E: Executor<'e, Database = Any>,
{
    let mut entities = select(exec, dialect, query).await?;
    if entities.is_empty() {
        return Err(DataError::not_found("record not found"));
    }
    Ok(entities.remove(0))
}

pub(crate) async fn update_full<'e, T, E>(
    exec: E,
    dialect: Dialect,
    entity: &T,
) -> Result<u64, DataError>
where
    T: SqlxEntity,
    E: Executor<'e, Database = Any>,
{
    let sql = update_statement(dialect, T::table_name(), T::columns(), T::id_column());
    let mut values = entity.values();
    values.push(entity.id_value());
    let result = bind_values(sqlx::query(&sql), values)
        .execute(exec)
        .await
        .map_err(|e| e.into_data_error())?;
    Ok(result.rows_affected())
}

pub(crate) async fn update_partial<'e, T, E>(
    exec: E,
    dialect: Dialect,
    id: Value,
    updates: &[(&str, Value)],
) -> Result<u64, DataError>
where
    T: SqlxEntity,
    E: Executor<'e, Database = Any>,
{
    // Same policy as the empty batch: zero SET clauses cannot be expressed.
    if updates.is_empty() {
        return Ok(0);
    }
    let fields: Vec<&str> = updates.iter().map(|(field, _)| *field).collect();
    let sql = update_statement(dialect, T::table_name(), &fields, T::id_column());
    let mut values: Vec<Value> = updates.iter().map(|(_, value)| value.clone()).collect();
    values.push(id);
    let result = bind_values(sqlx::query(&sql), values)
        .execute(exec)
        .await
        .map_err(|e| e.into_data_error())?;
    Ok(result.rows_affected())
}

pub(crate) async fn delete_where<'e, E>(
    exec: E,
    dialect: Dialect,
    query: QueryBuilder,
) -> Result<u64, DataError>
where
    E: Executor<'e, Database = Any>,
{
    let (sql, params) = query.dialect(dialect).build_delete();
    let result = bind_values(sqlx::query(&sql), params)
        .execute(exec)
        .await
        .map_err(|e| e.into_data_error())?;
    Ok(result.rows_affected())
}

pub(crate) async fn count<'e, T, E>(exec: E, dialect: Dialect) -> Result<u64, DataError>
where
    T: SqlxEntity,
    E: Executor<'e, Database = Any>,
{
    let (sql, params) = QueryBuilder::new(T::table_name())
        .dialect(dialect)
        .build_count();
    let row = bind_values(sqlx::query(&sql), params)
        .fetch_one(exec)
        .await
        .map_err(|e| e.into_data_error())?;
    let count: i64 = row.try_get(0).map_err(|e| e.into_data_error())?;
    Ok(count as u64)
}

pub(crate) async fn raw_query<'e, T, E>(
    exec: E,
    sql: &str,
    params: Vec<Value>,
) -> Result<Vec<T>, DataError>
where
    T: SqlxEntity,
    E: Executor<'e, Database = Any>,
{
    let rows = bind_values(sqlx::query(sql), params)
        .fetch_all(exec)
        .await
        .map_err(|e| e.into_data_error())?;
    decode_rows(&rows)
}

pub(crate) async fn raw_exec<'e, E>(
    exec: E,
    sql: &str,
    params: Vec<Value>,
) -> Result<ExecResult, DataError>
where
    E: Executor<'e, Database = Any>,
{
    let result = bind_values(sqlx::query(sql), params)
        .execute(exec)
        .await
        .map_err(|e| e.into_data_error())?;
    Ok(ExecResult::new(result.rows_affected(), result.last_insert_id()))
}
