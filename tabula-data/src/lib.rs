//! # tabula-data — data access abstractions for Tabula
//!
//! Backend-agnostic building blocks for the Tabula data layer. Backends
//! (e.g. `tabula-sqlx`) depend on this crate for the traits and value types
//! and add the driver-specific execution on top.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Entity`] | Mapping descriptor: table name, id column, column list, bind values |
//! | [`Value`] | Scalar bind value portable across Postgres, MySQL, and SQLite |
//! | [`Dialect`] | Placeholder and quoting rules per database |
//! | [`QueryBuilder`] | Fluent SELECT/COUNT/DELETE builder producing `(sql, bind_values)` |
//! | [`Condition`] | A single `(column, operator, value)` predicate |
//! | [`DataError`] | Error taxonomy: not-found, duplicate, constraint, timeout, connection, generic |
//! | [`ExecResult`] | Rows affected plus the last insert id where the dialect provides one |
//! | [`Repository`] | Async CRUD contract, generic over the entity type |

pub mod entity;
pub mod error;
pub mod query;
pub mod repository;
pub mod result;
pub mod value;

pub use entity::{Entity, EntityInfo, FieldInfo};
pub use error::{DataError, ErrorKind};
pub use query::{Condition, Dialect, Op, QueryBuilder};
pub use repository::Repository;
pub use result::ExecResult;
pub use value::Value;

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{Condition, DataError, Dialect, Entity, EntityInfo, ErrorKind, ExecResult, Op, QueryBuilder, Repository, Value};
}
