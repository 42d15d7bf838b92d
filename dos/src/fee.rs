//! Mempool admission fee policy (spec §4.8, supplemented per SPEC_FULL.md
//! §C.3): a pure function from reputation tier to a fee multiplier, left for
//! a host's own mempool to call — this core does not implement a mempool
//! (spec §1 non-goal).

use crate::rate_limit::ReputationTier;

/// Required fee multiplier over the base minimum fee for `tier` (spec §4.8:
/// "Low-reputation senders must attach ≥ 10× base minimum fee;
/// critical-reputation senders pay base").
pub fn required_fee_multiplier(tier: ReputationTier, low_reputation_multiplier: u32) -> u32 {
    match tier {
        ReputationTier::Low => low_reputation_multiplier,
        ReputationTier::Normal | ReputationTier::High | ReputationTier::Critical => 1,
    }
}
