//! `TrustEdge` (spec §3) and the two-index store that backs
//! `get_outgoing`/`get_incoming` (spec §9 "Graph representation": "two
//! indexed containers (source→list, destination→list) kept consistent on
//! insert").

use serde::{Deserialize, Serialize};
use wot_types::{Address, Amount, Timestamp, TxHash};

/// A directed, weighted trust edge (spec §3). Identity is `(from, to)`;
/// re-adding replaces the prior edge for that pair.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrustEdge {
    /// The address that extends trust.
    pub from: Address,
    /// The address being trusted.
    pub to: Address,
    /// Trust weight in `[-100, 100] \ {0}`.
    pub weight: i16,
    /// When this edge (or its latest replacement) was created.
    pub created_at_ts: Timestamp,
    /// Bond backing this edge.
    pub bond_amount: Amount,
    /// Transaction that posted the bond.
    pub bond_tx: TxHash,
    /// Whether a DAO dispute has slashed this edge's bond. A slashed edge
    /// keeps its record but is excluded from path math (spec §3).
    pub slashed: bool,
    /// Free-text justification carried in the `OP_RETURN` payload.
    pub reason: String,
    /// Set when this edge exists because it was copied onto a new wallet
    /// cluster member (spec §4.3 step 3: "with the same weights and a
    /// marker indicating inheritance"), rather than posted directly.
    pub inherited: bool,
}

impl TrustEdge {
    /// Whether this edge currently counts towards path math: not slashed.
    pub fn is_active(&self) -> bool {
        !self.slashed
    }
}
