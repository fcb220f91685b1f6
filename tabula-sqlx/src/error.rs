use tabula_data::{DataError, ErrorKind};

/// Extension trait for converting `sqlx::Error` into [`DataError`].
///
/// Due to Rust's orphan rules, `From<sqlx::Error> for DataError` can't be
/// implemented here. Use `.into_data_error()` instead.
pub trait SqlxErrorExt {
    fn into_data_error(self) -> DataError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_data_error(self) -> DataError {
        let (kind, message) = classify(&self);
        DataError::new(kind, message).with_cause(self)
    }
}

/// Convenience alias for data-layer results using `DataError`.
pub type SqlxResult<T> = Result<T, DataError>;

/// Classify a driver error into the taxonomy. First match wins.
///
/// Structured variants are consulted before the message heuristics:
/// `RowNotFound` is the exact no-rows sentinel, and `PoolTimedOut` says
/// "timed out" rather than "timeout" so the substring chain would misfile it.
fn classify(err: &sqlx::Error) -> (ErrorKind, &'static str) {
    match err {
        sqlx::Error::RowNotFound => (ErrorKind::NotFound, "record not found"),
        sqlx::Error::PoolTimedOut => (ErrorKind::Timeout, "operation timeout"),
        sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
            (ErrorKind::Connection, "connection error")
        }
        sqlx::Error::Database(db) => match db.kind() {
            sqlx::error::ErrorKind::UniqueViolation => {
                (ErrorKind::Duplicate, "duplicate key violation")
            }
            sqlx::error::ErrorKind::ForeignKeyViolation
            | sqlx::error::ErrorKind::NotNullViolation
            | sqlx::error::ErrorKind::CheckViolation => {
                (ErrorKind::Constraint, "constraint violation")
            }
            _ => classify_message(&db.message().to_ascii_lowercase()),
        },
        other => classify_message(&other.to_string().to_ascii_lowercase()),
    }
}

/// Substring classification over a lowercased driver message.
///
/// Dialect-agnostic but brittle: a deliberate tradeoff favoring portability
/// across three differently-worded engines over precise classification.
/// The fallback is Connection, an explicit simplification rather than a true
/// "unknown" kind.
fn classify_message(message: &str) -> (ErrorKind, &'static str) {
    if message.contains("duplicate") || message.contains("unique") {
        (ErrorKind::Duplicate, "duplicate key violation")
    } else if message.contains("foreign key") || message.contains("constraint") {
        (ErrorKind::Constraint, "constraint violation")
    } else if message.contains("timeout") {
        (ErrorKind::Timeout, "operation timeout")
    } else if message.contains("connection") {
        (ErrorKind::Connection, "connection error")
    } else {
        (ErrorKind::Connection, "database operation failed")
    }
}
