//! Error type definitions for commit-reveal dispute voting (spec §7).

use thiserror::Error;
use wot_types::{Address, TxHash};

/// Errors raised by commit-reveal voting and reward distribution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisputeError {
    /// `submit_commitment`/`reveal_vote` called outside the phase it belongs
    /// to (spec §7 `NotInPhase`).
    #[error("dispute {0} is not in the required phase")]
    NotInPhase(TxHash),
    /// `reveal_vote`'s recomputed hash does not match the stored commitment
    /// (spec §7 `HashMismatch`).
    #[error("reveal for dispute {0} voter {1} does not match commitment hash")]
    HashMismatch(TxHash, Address),
    /// `submit_commitment` called with `stake <= 0`.
    #[error("commitment stake must be positive, got {0}")]
    NonPositiveStake(i64),
    /// A voter already has a commitment on this dispute.
    #[error("voter {1} already committed on dispute {0}")]
    DuplicateCommitment(TxHash, Address),
    /// `reveal_vote` with no prior commitment for `(dispute, voter)`.
    #[error("no commitment for dispute {0} voter {1}")]
    NoCommitment(TxHash, Address),
    /// A voter already revealed for this dispute.
    #[error("voter {1} already revealed on dispute {0}")]
    AlreadyRevealed(TxHash, Address),
    /// Reward distribution attempted twice for the same dispute.
    #[error("rewards for dispute {0} already distributed")]
    AlreadyDistributed(TxHash),
    /// The dispute has not reached the resolvable height yet.
    #[error("dispute {0} is not yet resolvable")]
    NotResolvable(TxHash),
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
    /// Propagated from the trust graph this crate calls into.
    #[error(transparent)]
    TrustGraph(#[from] wot_trust_graph::TrustGraphError),
}

/// Result type for the `wot-dispute` crate.
pub type DisputeResult<T> = Result<T, DisputeError>;
