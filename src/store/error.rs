//! Store error types
//!
//! Persistence failures are a distinct, reportable error kind and
//! always propagate to the caller - nothing here retries or swallows.
//! Lookups that find nothing return Option, never an error.

/// Errors raised by the persistence layer
#[derive(Debug)]
pub enum StoreError {
    /// Underlying database failure (write, constraint, connection)
    Database(String),

    /// Filesystem failure while preparing the data directory
    Io(String),

    /// Failed to serialize a value for storage
    Serialization(String),

    /// A stored row could not be decoded back into its typed form
    Corrupted(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database(e) => write!(f, "database error: {}", e),
            Self::Io(e) => write!(f, "io error: {}", e),
            Self::Serialization(e) => write!(f, "serialization error: {}", e),
            Self::Corrupted(e) => write!(f, "corrupted record: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}
