//! Persistent key encoding for fraud records (spec §6 key layout table).

use wot_types::{Address, TxHash};

/// `fraud_{tx}_{fraudster}`.
pub fn fraud_key(tx: &TxHash, fraudster: &Address) -> Vec<u8> {
    format!("fraud_{}_{}", tx, fraudster).into_bytes()
}

/// Prefix for scanning every fraud record (used to rebuild the in-memory
/// index on load).
pub fn fraud_prefix() -> Vec<u8> {
    b"fraud_".to_vec()
}
