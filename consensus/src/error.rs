//! Error type definitions for the HAT v2 consensus validator (spec §7).

use thiserror::Error;
use wot_types::{Address, TxHash};

/// Errors raised by HAT v2 validation and fraud recording.
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// A `ValidationResponse`'s signature did not verify under its claimed
    /// `validator_pubkey` (spec §7 `SignatureInvalid`).
    #[error("signature invalid for validator {0} on tx {1}")]
    SignatureInvalid(Address, TxHash),
    /// `validator_pubkey` does not hash to the claimed `validator` address.
    #[error("pubkey does not hash to claimed validator {0}")]
    PubkeyMismatch(Address),
    /// A `ValidationResponse`'s nonce did not match the originating request.
    #[error("nonce mismatch for validator {0} on tx {1}")]
    NonceMismatch(Address, TxHash),
    /// `record_fraud_attempt` rejected by `validate_fraud_record` (spec §4.5).
    #[error("fraud record for tx {0} fraudster {1} rejected: {2}")]
    FraudRecordRejected(TxHash, Address, &'static str),
    /// A fraud record already exists for this `(tx, fraudster)` pair.
    #[error("fraud record for tx {0} fraudster {1} already exists")]
    DuplicateFraudRecord(TxHash, Address),
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

/// Result type for the `wot-consensus` crate.
pub type ConsensusResult<T> = Result<T, ConsensusError>;
