//! Error type definitions for DoS protection (spec §7).

use thiserror::Error;
use wot_types::{Address, Timestamp};

/// Errors raised by rate limiting, banning, and bytecode analysis.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum DosError {
    /// The caller exceeded its reputation tier's limit for this action and
    /// window (spec §4.8).
    #[error("rate limit exceeded for {0}")]
    RateLimited(Address),
    /// `addr` is currently banned until the given Unix timestamp (spec §4.8:
    /// "ten consecutive limit violations auto-ban").
    #[error("{0} is banned until {1}")]
    Banned(Address, Timestamp),
    /// Deployment bytecode's aggregate risk score met or exceeded the reject
    /// threshold (spec §4.8 `bytecode_reject_risk_score`).
    #[error("bytecode rejected: risk score {0:.2} at or above threshold")]
    BytecodeRejected(f64),
    /// Underlying storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] wot_storage::StorageError),
}

/// Result type for the `wot-dos` crate.
pub type DosResult<T> = Result<T, DosError>;
