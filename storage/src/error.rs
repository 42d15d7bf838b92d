//! Error type definitions for the storage module.

use thiserror::Error;

/// Errors raised by a [`crate::Database`] implementation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The backend could not open or connect to the underlying store.
    #[error("storage connection error: {0}")]
    Connection(String),
    /// A read failed for a reason other than "key not found".
    #[error("storage read error at key {key:?}: {msg}")]
    Read { key: Vec<u8>, msg: String },
    /// A write failed.
    #[error("storage write error at key {key:?}: {msg}")]
    Write { key: Vec<u8>, msg: String },
    /// A stored value failed to decode.
    #[error("storage decode error at key {key:?}: {msg}")]
    Decode { key: Vec<u8>, msg: String },
}

/// Result type for the storage module. This is the only return type
/// acceptable for any public method in a storage backend.
pub type StorageResult<T> = Result<T, StorageError>;
