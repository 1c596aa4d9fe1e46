//! Error types for score-state

use thiserror::Error;

/// Errors raised while opening a handle or preparing the schema
#[derive(Error, Debug)]
pub enum StateError {
    /// Database connection error
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// Database query error
    #[error("Database query failed: {0}")]
    Query(String),

    /// Schema setup error
    #[error("Schema setup failed: {0}")]
    SchemaSetup(String),
}

impl From<surrealdb::Error> for StateError {
    fn from(err: surrealdb::Error) -> Self {
        StateError::Query(err.to_string())
    }
}

/// Errors raised by individual storage operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The unique index on the player name rejected an insert.
    #[error("a player named {name:?} already exists")]
    DuplicateName { name: String },

    /// The engine aborted the transaction because a concurrent writer
    /// touched the same keys. Retrying the statement is safe.
    #[error("write conflict: {0}")]
    WriteConflict(String),

    /// The backend could not be reached or the statement failed.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A row came back in a shape the domain cannot accept.
    #[error("corrupt player row: {0}")]
    Corrupt(String),
}

impl StorageError {
    /// Classify a SurrealDB error raised by an insert into `players`.
    ///
    /// Unique index violations surface as `Database index ... already contains`
    /// on both the embedded and the remote engines.
    pub(crate) fn from_insert(name: &str, err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            StorageError::DuplicateName {
                name: name.to_string(),
            }
        } else {
            Self::from_message(message)
        }
    }

    fn from_message(message: String) -> Self {
        if message.contains("can be retried") || message.contains("read or write conflict") {
            StorageError::WriteConflict(message)
        } else {
            StorageError::Backend(message)
        }
    }
}

impl From<surrealdb::Error> for StorageError {
    fn from(err: surrealdb::Error) -> Self {
        Self::from_message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_conflict_is_classified_as_write_conflict() {
        let err = StorageError::from_message(
            "Failed to commit transaction due to a read or write conflict. This transaction can be retried".to_string(),
        );
        assert!(matches!(err, StorageError::WriteConflict(_)));
    }

    #[test]
    fn test_other_failures_are_backend_errors() {
        let err = StorageError::from_message("There was a problem with the connection".to_string());
        assert!(matches!(err, StorageError::Backend(_)));
    }
}
