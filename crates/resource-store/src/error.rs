//! # Store Errors
//!
//! Every layer of the store reports failures through one of the enums below.
//! None of them are caught inside the crate: a provider error reaches the
//! caller of [`ResourceStore`](crate::ResourceStore) unchanged.

/// Errors raised while reading or writing the resource wire format.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Resource record is not a JSON object")]
    NotAnObject,
    #[error("Resource record field is empty: {0}")]
    EmptyField(&'static str),
    #[error("Malformed resource record: {0}")]
    Malformed(serde_json::Error),
    #[error("Failed to encode resource record: {0}")]
    Encode(serde_json::Error),
}

/// Errors raised by a [`StorageProvider`](crate::StorageProvider).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage backend not initialized: {backend}")]
    NotInitialized { backend: &'static str },
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Record error: {0}")]
    Record(#[from] RecordError),
    #[error("Storage task failed: {0}")]
    Task(String),
    #[error("Backend error: {0}")]
    Backend(String),
}

// redb reports each phase (open, transaction, table, commit) with its own type.
macro_rules! from_redb {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for StorageError {
            fn from(e: $ty) -> Self {
                StorageError::Database(e.into())
            }
        }
    )*};
}

from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

impl From<tokio::task::JoinError> for StorageError {
    fn from(e: tokio::task::JoinError) -> Self {
        StorageError::Task(e.to_string())
    }
}

/// Errors raised while turning storage settings into a [`StorageConfig`](crate::StorageConfig).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported storage kind: {0}")]
    UnsupportedKind(String),
    #[error("Storage kind 'custom' requires a custom provider")]
    MissingCustomProvider,
}

/// Result alias used by providers and the store.
pub type StorageResult<T> = Result<T, StorageError>;
