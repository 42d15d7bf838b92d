//! Persistent key encoding (spec §6 key layout table).

use wot_types::{Address, TxHash};

/// `trust_edge_{from}_{to}`.
pub fn trust_edge_key(from: &Address, to: &Address) -> Vec<u8> {
    format!("trust_edge_{}_{}", from, to).into_bytes()
}

/// Prefix for scanning every trust edge (used to rebuild the in-memory index
/// on load).
pub fn trust_edge_prefix() -> Vec<u8> {
    b"trust_edge_".to_vec()
}

/// `bonded_vote_{tx}`.
pub fn bonded_vote_key(tx: &TxHash) -> Vec<u8> {
    format!("bonded_vote_{}", tx).into_bytes()
}

/// Prefix for scanning every bonded vote.
pub fn bonded_vote_prefix() -> Vec<u8> {
    b"bonded_vote_".to_vec()
}

/// `dispute_{id}`.
pub fn dispute_key(id: &TxHash) -> Vec<u8> {
    format!("dispute_{}", id).into_bytes()
}

/// Prefix for scanning every dispute.
pub fn dispute_prefix() -> Vec<u8> {
    b"dispute_".to_vec()
}
