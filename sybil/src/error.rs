//! Error type definitions for Eclipse/Sybil protection (spec §7).

use thiserror::Error;

/// Errors raised by validator-profile storage.
#[derive(Debug, Error)]
pub enum SybilError {
    /// Underlying storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] wot_storage::StorageError),
    /// A persisted record failed to decode.
    #[error("decode error at key {key}: {msg}")]
    Decode {
        /// Key whose value failed to decode.
        key: String,
        /// Underlying decode error message.
        msg: String,
    },
}

/// Result type for the `wot-sybil` crate.
pub type SybilResult<T> = Result<T, SybilError>;
