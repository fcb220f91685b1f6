use std::str::FromStr;
use std::sync::Once;
use std::time::Duration;

use serde::Serialize;
use sqlx::any::{AnyConnectOptions, AnyPoolOptions};
use sqlx::{AnyPool, ConnectOptions};
use tabula_data::{DataError, Dialect};
use tracing::info;

use crate::config::{Config, LogLevel};
use crate::error::SqlxErrorExt;
use crate::repository::{SqlxEntity, SqlxRepository};

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

// The Any driver set may only be installed once per process.
static INSTALL_DRIVERS: Once = Once::new();

/// Backend capabilities, consumed by callers that adapt behavior per backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Feature {
    Transactions,
    JsonQueries,
    Indexing,
    Aggregation,
    FullTextSearch,
    SubQueries,
    Joins,
}

const SUPPORTED_FEATURES: &[Feature] = &[
    Feature::Transactions,
    Feature::JsonQueries,
    Feature::Indexing,
    Feature::Aggregation,
    Feature::FullTextSearch,
    Feature::SubQueries,
    Feature::Joins,
];

/// Static descriptor of a connected provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub features: &'static [Feature],
}

/// Connection factory: owns the pool and hands out repositories.
///
/// # Example
///
/// ```ignore
/// let provider = Provider::connect(config).await?;
/// let users: SqlxRepository<User> = provider.repository();
/// ```
#[derive(Debug)]
pub struct Provider {
    pool: AnyPool,
    dialect: Dialect,
    config: Config,
}

impl Provider {
    /// Open a pooled connection for the configured driver.
    ///
    /// Fails fast on an unsupported driver name or a missing SQLite target
    /// directory; neither is retryable and no repository can be created from
    /// a failed factory.
    pub async fn connect(config: Config) -> Result<Self, DataError> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);
        let dialect = config.dialect()?;
        let url = config.connection_url()?;

        let mut connect_options =
            AnyConnectOptions::from_str(&url).map_err(|e| e.into_data_error())?;
        connect_options = match config.log_level() {
            LogLevel::Off => connect_options.disable_statement_logging(),
            LogLevel::Normal => connect_options.log_statements(log::LevelFilter::Debug),
            LogLevel::Verbose => connect_options.log_statements(log::LevelFilter::Trace),
        };

        // Pool knobs are applied only when explicitly configured; absence
        // means the engine's default.
        let mut pool_options = AnyPoolOptions::new();
        if let Some(max_connections) = config.pool.max_connections {
            pool_options = pool_options.max_connections(max_connections);
        }
        if let Some(min_connections) = config.pool.min_connections {
            pool_options = pool_options.min_connections(min_connections);
        }
        if let Some(max_lifetime) = config.pool.max_lifetime {
            pool_options = pool_options.max_lifetime(max_lifetime);
        }
        if let Some(idle_timeout) = config.pool.idle_timeout {
            pool_options = pool_options.idle_timeout(idle_timeout);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| e.into_data_error())?;
        info!(database = dialect.name(), "database connection established");
        Ok(Self {
            pool,
            dialect,
            config,
        })
    }

    /// Build a repository for any entity type.
    ///
    /// Repositories are cheap: a pool handle and a dialect tag.
    pub fn repository<T: SqlxEntity>(&self) -> SqlxRepository<T> {
        SqlxRepository::new(self.pool.clone(), self.dialect)
    }

    /// Ping the live connection with a fixed 5-second deadline.
    pub async fn health(&self) -> Result<(), DataError> {
        let ping = sqlx::query("SELECT 1").execute(&self.pool);
        match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, ping).await {
            Ok(result) => result.map(|_| ()).map_err(|e| e.into_data_error()),
            Err(_) => Err(DataError::timeout("health check timed out")),
        }
    }

    pub fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "sqlx",
            version: env!("CARGO_PKG_VERSION"),
            database: self.dialect.name(),
            features: SUPPORTED_FEATURES,
        }
    }

    /// Replace the stored configuration wholesale.
    ///
    /// Does not reopen the pool; the new values apply to whatever reads the
    /// config afterwards, not to already-open connections.
    pub fn configure(&mut self, config: Config) {
        self.config = config;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
