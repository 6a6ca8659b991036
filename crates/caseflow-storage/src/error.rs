//! Error types for the storage crate.

use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Storage error types.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage/database error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Complaint not found.
    #[error("Complaint not found: {0}")]
    NotFound(String),

    /// Escalation or assignment against a resolved complaint.
    #[error("Complaint already resolved: {0}")]
    AlreadyResolved(String),

    /// Conditional escalation lost a race: the complaint's level changed
    /// between snapshot and write.
    #[error("Concurrent modification of complaint {0}")]
    Conflict(String),
}

impl From<Error> for caseflow_core::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::NotFound(s) => caseflow_core::Error::NotFound(s),
            Error::AlreadyResolved(s) => caseflow_core::Error::AlreadyResolved(s),
            other => caseflow_core::Error::Storage(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<redb::Error> for Error {
    fn from(e: redb::Error) -> Self {
        Error::Storage(format!("Redb error: {}", e))
    }
}

impl From<redb::TransactionError> for Error {
    fn from(e: redb::TransactionError) -> Self {
        Error::Storage(format!("Redb transaction error: {}", e))
    }
}

impl From<redb::TableError> for Error {
    fn from(e: redb::TableError) -> Self {
        Error::Storage(format!("Redb table error: {}", e))
    }
}

impl From<redb::StorageError> for Error {
    fn from(e: redb::StorageError) -> Self {
        Error::Storage(format!("Redb storage error: {}", e))
    }
}

impl From<redb::CommitError> for Error {
    fn from(e: redb::CommitError) -> Self {
        Error::Storage(format!("Redb commit error: {}", e))
    }
}

impl From<redb::DatabaseError> for Error {
    fn from(e: redb::DatabaseError) -> Self {
        Error::Storage(format!("Redb database error: {}", e))
    }
}
