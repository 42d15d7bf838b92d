//! `BondedVote` (spec §3).

use serde::{Deserialize, Serialize};
use wot_types::{Address, Amount, Timestamp, TxHash};

/// A bonded reputation vote. Identity is `bond_tx`; immutable once recorded
/// except for `slashed`/`slash_tx` (spec §3).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BondedVote {
    /// Address casting the vote.
    pub voter: Address,
    /// Address the vote is about.
    pub target: Address,
    /// Vote value in `[-100, 100]`.
    pub value: i16,
    /// Bond backing this vote.
    pub bond: Amount,
    /// Transaction that posted the bond; this vote's identity.
    pub bond_tx: TxHash,
    /// When the vote was recorded.
    pub ts: Timestamp,
    /// Whether a DAO dispute has slashed this vote's bond.
    pub slashed: bool,
    /// The slashing transaction, if slashed.
    pub slash_tx: Option<TxHash>,
    /// Free-text justification.
    pub reason: String,
}
