use std::time::Duration;

/// Errors reported by the filter compiler and the photo search executor.
#[derive(Debug)]
pub enum SearchError {
    /// Malformed filter text, `position` is the char offset of the problem.
    ParseError { position: usize, message: String },
    UnknownField(String),
    InvalidClauseValue {
        field: String,
        value: String,
        reason: String,
    },
    InvalidPagination { offset: i64, limit: i64 },
    QueryTimeout(Duration),
    /// The database URL or dialect names an engine this crate cannot execute.
    UnsupportedDialect(String),
    BackendError(sqlx::Error),
}

impl SearchError {
    pub(crate) fn invalid_value(field: &str, value: &str, reason: impl Into<String>) -> Self {
        SearchError::InvalidClauseValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<sqlx::Error> for SearchError {
    fn from(err: sqlx::Error) -> Self {
        SearchError::BackendError(err)
    }
}

impl From<sqlx::migrate::MigrateError> for SearchError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        SearchError::BackendError(sqlx::Error::Migrate(Box::new(err)))
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::ParseError { position, message } => {
                write!(f, "Parse error at position {}: {}", position, message)
            }
            SearchError::UnknownField(key) => write!(f, "Unknown filter field: {}", key),
            SearchError::InvalidClauseValue {
                field,
                value,
                reason,
            } => write!(f, "Invalid value '{}' for {}: {}", value, field, reason),
            SearchError::InvalidPagination { offset, limit } => write!(
                f,
                "Invalid pagination: offset={}, limit={} (limit must be positive, offset must not be negative)",
                offset, limit
            ),
            SearchError::QueryTimeout(deadline) => {
                write!(f, "Query exceeded deadline of {} ms", deadline.as_millis())
            }
            SearchError::UnsupportedDialect(name) => {
                write!(f, "Unsupported database dialect: {} (only SQLite executes queries)", name)
            }
            SearchError::BackendError(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::BackendError(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_names_position() {
        let err = SearchError::ParseError {
            position: 5,
            message: "unterminated quote".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("position 5"));
        assert!(msg.contains("unterminated quote"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = SearchError::invalid_value("year", "abc", "expected an integer");
        assert_eq!(
            err.to_string(),
            "Invalid value 'abc' for year: expected an integer"
        );
    }

    #[test]
    fn test_backend_error_has_source() {
        let err = SearchError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, SearchError::BackendError(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&SearchError::UnknownField("x".into())).is_none());
    }

    #[test]
    fn test_unsupported_dialect_display() {
        let err = SearchError::UnsupportedDialect("postgres".to_string());
        assert!(err.to_string().contains("postgres"));
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_timeout_display() {
        let err = SearchError::QueryTimeout(Duration::from_millis(250));
        assert!(err.to_string().contains("250 ms"));
    }
}
