//! Error type for the cross-chain trust aggregator (spec §7).

use thiserror::Error;

/// Errors raised by `wot-crosschain`.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum CrossChainError {
    /// No usable (verified, non-expired) attestation was found for the
    /// address; there is nothing to aggregate.
    #[error("no verified, non-expired attestation available")]
    NoUsableAttestation,
}

/// Result type for the `wot-crosschain` crate.
pub type CrossChainResult<T> = Result<T, CrossChainError>;
