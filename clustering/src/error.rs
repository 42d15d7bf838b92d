//! Error type definitions for wallet clustering (spec §7: `DatabaseFailure`
//! "retried up to 3 times for trust inheritance; otherwise surfaced to the
//! caller").

use thiserror::Error;

/// Errors raised while clustering wallets or updating inherited trust.
#[derive(Debug, Error)]
pub enum ClusteringError {
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
    /// Trust inheritance failed after exhausting retries (spec §4.3 step 3,
    /// §7 `DatabaseFailure`).
    #[error("trust inheritance for {0} failed after {1} attempts: {2}")]
    InheritanceFailed(wot_types::Address, u32, String),
    /// Propagated from the trust graph this clusterer calls into.
    #[error(transparent)]
    TrustGraph(#[from] wot_trust_graph::TrustGraphError),
}

/// Result type for the `wot-clustering` crate.
pub type ClusteringResult<T> = Result<T, ClusteringError>;
