//! `ValidatorProfile`: the per-validator history C7's eligibility and
//! Sybil-detection signals are computed from (spec §4.7).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use wot_net::SubnetKey;
use wot_types::{Address, BlockHeight};

/// Accumulated history for one validator candidate. Populated by whatever
/// drives block processing (HAT consensus records outcomes; the node's
/// connection manager reports topology); this crate only consumes it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValidatorProfile {
    pub address: Address,
    /// Total validation responses this validator has ever produced.
    pub validations_total: u32,
    /// Of those, how many were later judged correct (matched consensus).
    pub validations_correct: u32,
    /// Block height this validator was first observed at.
    pub first_seen_height: BlockHeight,
    /// Age in blocks of this validator's currently unspent stake.
    pub stake_age_blocks: u32,
    /// Number of distinct funding sources the current stake was derived from.
    pub funding_sources: u32,
    /// Fraction of stake value traceable to the single largest funding
    /// source, used as the stake-source concentration signal.
    pub dominant_funding_source_share: f64,
    /// Network subnet bucket this validator's peer connection is seen from.
    pub subnet: Option<SubnetKey>,
    /// Set of other validator addresses this validator peers with, used for
    /// the peer-overlap Sybil signal.
    pub peers: HashSet<Address>,
}

impl ValidatorProfile {
    /// A freshly observed validator with no history.
    pub fn new(address: Address, first_seen_height: BlockHeight) -> Self {
        ValidatorProfile {
            address,
            validations_total: 0,
            validations_correct: 0,
            first_seen_height,
            stake_age_blocks: 0,
            funding_sources: 0,
            dominant_funding_source_share: 0.0,
            subnet: None,
            peers: HashSet::new(),
        }
    }

    /// Running accuracy, `0.0` if no validations have been recorded yet.
    pub fn accuracy(&self) -> f64 {
        if self.validations_total == 0 {
            0.0
        } else {
            f64::from(self.validations_correct) / f64::from(self.validations_total)
        }
    }

    /// Record the outcome of one validation response (spec §4.5: "the
    /// validator's running accuracy").
    pub fn record_validation(&mut self, was_correct: bool) {
        self.validations_total += 1;
        if was_correct {
            self.validations_correct += 1;
        }
    }
}

/// `validator_profile_{addr}`.
pub fn validator_profile_key(addr: &Address) -> Vec<u8> {
    format!("validator_profile_{}", addr).into_bytes()
}

/// Prefix covering every validator profile (used to rebuild the in-memory
/// index on load).
pub fn validator_profile_prefix() -> Vec<u8> {
    b"validator_profile_".to_vec()
}
