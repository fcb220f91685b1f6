/// Classification of data-layer failures.
///
/// Every driver-level error surfaced to a caller carries exactly one of these
/// kinds; the raw driver error is attached as the cause, never returned
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Duplicate,
    Constraint,
    Timeout,
    Connection,
    Generic,
}

impl ErrorKind {
    fn label(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Duplicate => "duplicate key",
            ErrorKind::Constraint => "constraint violation",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Connection => "connection error",
            ErrorKind::Generic => "data error",
        }
    }
}

/// Error type for all data-layer operations.
#[derive(Debug)]
pub struct DataError {
    kind: ErrorKind,
    message: String,
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DataError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the original driver error as the cause.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Duplicate, message)
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Constraint, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Generic, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_label() {
        let err = DataError::not_found("record not found");
        assert_eq!(err.to_string(), "not found: record not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_cause_is_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let err = DataError::connection("connection error").with_cause(io);
        assert_eq!(err.kind(), ErrorKind::Connection);
        let source = std::error::Error::source(&err).expect("cause attached");
        assert!(source.to_string().contains("socket closed"));
    }

    #[test]
    fn test_kind_accessors() {
        assert_eq!(DataError::duplicate("x").kind(), ErrorKind::Duplicate);
        assert_eq!(DataError::constraint("x").kind(), ErrorKind::Constraint);
        assert_eq!(DataError::timeout("x").kind(), ErrorKind::Timeout);
        assert_eq!(DataError::generic("x").kind(), ErrorKind::Generic);
    }
}
