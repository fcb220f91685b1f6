//! # tabula-sqlx — SQLx backend for the Tabula data layer
//!
//! This crate provides the [SQLx](https://github.com/launchbadge/sqlx)-specific
//! implementation of Tabula's data access layer. It depends on [`tabula_data`]
//! for the abstract traits and types, and adds the connection factory, the
//! generic repository, transaction scoping, and error normalization needed to
//! talk to a real database. The `Any` driver carries all three dialects, so
//! the backend is chosen by a driver name at runtime.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Config`] | Driver name, credentials, SSL, pool limits, options bag |
//! | [`Provider`] | Connection factory — validates the driver, opens the pool, hands out repositories |
//! | [`SqlxRepository`] | Generic CRUD repository over one entity type |
//! | [`TxRepository`] | Transaction-scoped repository — commit/rollback driven by the callback's outcome |
//! | [`SqlxErrorExt`] | Extension trait to convert `sqlx::Error` → `DataError` (`.into_data_error()`) |
//! | [`ProviderInfo`] | Static descriptor: name, version, database kind, feature list |
//!
//! # Feature flags
//!
//! Enable the drivers you deploy against:
//!
//! | Feature    | Driver |
//! |------------|--------|
//! | `sqlite`   | SQLite via `sqlx/sqlite` |
//! | `postgres` | PostgreSQL via `sqlx/postgres` |
//! | `mysql`    | MySQL via `sqlx/mysql` |
//!
//! # Quick start
//!
//! ```ignore
//! use tabula_sqlx::{Config, Provider};
//!
//! let config = Config {
//!     driver: "sqlite".into(),
//!     database: "app.db".into(),
//!     ..Config::default()
//! };
//! let provider = Provider::connect(config).await?;
//! let users: SqlxRepository<User> = provider.repository();
//!
//! let mut alice = User { id: 0, name: "Alice".into(), age: 25 };
//! users.create(&mut alice).await?; // alice.id now holds the generated key
//! ```
//!
//! # Transactions
//!
//! [`SqlxRepository::transaction`] is the only transaction surface: the
//! callback gets an exclusive [`TxRepository`], `Ok` commits, `Err` rolls
//! back. Retry policy is left entirely to the caller.

pub mod config;
pub mod error;
mod ops;
pub mod provider;
pub mod repository;
pub mod tx;

pub use config::{Config, LogLevel, PoolConfig, SslConfig};
pub use error::{SqlxErrorExt, SqlxResult};
pub use provider::{Feature, Provider, ProviderInfo};
pub use repository::{SqlxEntity, SqlxRepository};
pub use tx::TxRepository;

/// Re-exports of the most commonly used types from both `tabula-data` and
/// this crate.
pub mod prelude {
    pub use crate::{Config, Provider, SqlxEntity, SqlxErrorExt, SqlxRepository, TxRepository};
    pub use tabula_data::prelude::*;
}
