use cinegraph_core::Error as CoreError;
use thiserror::Error;

/// Storage-specific error types
///
/// A MATCH that finds nothing is not an error; adapters return `None` for it.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The store's uniqueness constraint on `field` rejected the write
    #[error("Duplicate {field}: {value}")]
    DuplicateIdentifier { field: String, value: String },

    /// More rows matched than the data model allows
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StorageError {
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn backend(msg: impl std::fmt::Display) -> Self {
        Self::BackendError(msg.to_string())
    }

    pub fn serialization(msg: impl std::fmt::Display) -> Self {
        Self::SerializationError(msg.to_string())
    }
}

impl From<neo4rs::Error> for StorageError {
    fn from(err: neo4rs::Error) -> Self {
        StorageError::BackendError(err.to_string())
    }
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidConfig(msg) => CoreError::config(msg),
            other => CoreError::storage(other.to_string()),
        }
    }
}
