//! Error taxonomy for the record access service. Each variant is a distinct
//! outcome callers are expected to branch on; "zero rows affected" is never an
//! error and never shows up here.

use std::fmt;

use thiserror::Error;

/// The provider entry point that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    Insert,
    Update,
    Delete,
    GetType,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Query => "query",
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::GetType => "get_type",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The URI matched no registered pattern. Raised before any storage access.
    #[error("unknown URI: {0}")]
    UnknownResource(String),

    /// The URI matched, but the operation makes no sense for its shape (for
    /// example inserting into a single-item URI).
    #[error("{operation} is not supported for {uri}")]
    UnsupportedOperation { operation: Operation, uri: String },

    /// Caller-supplied values, projection, or sort order failed validation.
    /// Nothing has been written when this is returned.
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument { field: String, reason: String },

    /// SQLite rejected the statement.
    #[error("storage failure during {operation}: {source}")]
    StorageFailure {
        operation: Operation,
        #[source]
        source: rusqlite::Error,
    },
}

impl ProviderError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ProviderError::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn storage(operation: Operation, source: rusqlite::Error) -> Self {
        ProviderError::StorageFailure { operation, source }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_resource_message() {
        let err = ProviderError::UnknownResource("content://x/cats".to_string());
        assert_eq!(err.to_string(), "unknown URI: content://x/cats");
    }

    #[test]
    fn test_unsupported_operation_message() {
        let err = ProviderError::UnsupportedOperation {
            operation: Operation::Insert,
            uri: "content://x/pets/3".to_string(),
        };
        assert_eq!(err.to_string(), "insert is not supported for content://x/pets/3");
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = ProviderError::invalid("weight", "invalid weight");
        assert_eq!(err.to_string(), "invalid argument `weight`: invalid weight");
    }

    #[test]
    fn test_storage_failure_keeps_source() {
        use std::error::Error as _;

        let err = ProviderError::storage(Operation::Delete, rusqlite::Error::InvalidQuery);
        assert!(err.to_string().starts_with("storage failure during delete"));
        assert!(err.source().is_some());
    }
}
