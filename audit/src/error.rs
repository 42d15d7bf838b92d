//! Error type definitions for the security audit log (spec §7).

use thiserror::Error;

/// Errors raised by the security event log.
#[derive(Debug, Error)]
pub enum AuditError {
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

/// Result type for the `wot-audit` crate.
pub type AuditResult<T> = Result<T, AuditError>;
