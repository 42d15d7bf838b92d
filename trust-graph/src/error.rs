//! Error type definitions for the Web-of-Trust graph (spec §7).

use thiserror::Error;
use wot_types::{Address, TxHash};

/// Errors raised by [`crate::graph::TrustGraph`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrustGraphError {
    /// `add_trust_edge` called with `from == to` (spec §4.2).
    #[error("address {0} cannot trust itself")]
    SelfTrust(Address),
    /// `weight` outside `[-100,100]\{0}` (spec §3 invariant).
    #[error("weight {0} out of range [-100,100]\\{{0}}")]
    WeightOutOfRange(i16),
    /// `bond_amount` below `min_bond(|weight|)` (spec §4.2).
    #[error("bond {got} below required minimum {need}")]
    InsufficientBond {
        /// Bond actually offered.
        got: i64,
        /// Minimum bond required for the given weight.
        need: i64,
    },
    /// `record_bonded_vote` called with a `bond_tx` already on record (spec §4.2).
    #[error("bond tx {0} already recorded")]
    DuplicateBondTx(TxHash),
    /// Lookup for a bonded vote that does not exist.
    #[error("no bonded vote with bond tx {0}")]
    UnknownVote(TxHash),
    /// Lookup for a dispute that does not exist.
    #[error("no dispute with id {0}")]
    UnknownDispute(TxHash),
    /// `resolve_dispute` called twice, or rewards already distributed.
    #[error("dispute {0} already resolved")]
    AlreadyResolved(TxHash),
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

/// Result type for the `wot-trust-graph` crate.
pub type TrustGraphResult<T> = Result<T, TrustGraphError>;
