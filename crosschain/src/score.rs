//! A single foreign-chain reputation attestation (spec §4.11).

use serde::{Deserialize, Serialize};
use wot_types::Timestamp;

/// One attestation of an address's reputation, as reported by a foreign
/// chain's bridge or oracle.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct ForeignChainScore {
    pub chain_id: u32,
    /// Reported reputation, `0..=100`.
    pub score: u8,
    /// Whether the attestation's signature/proof has been verified.
    pub is_verified: bool,
    /// When the attestation was observed/received.
    pub observed_at: Timestamp,
}

impl ForeignChainScore {
    /// Age in hours relative to `now`. Saturates at zero for attestations
    /// observed "in the future" relative to a stale `now`.
    pub fn age_hours(&self, now: Timestamp) -> f64 {
        let age_secs = now.saturating_sub(self.observed_at);
        age_secs as f64 / 3600.0
    }
}
