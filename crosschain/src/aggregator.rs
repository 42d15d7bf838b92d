//! `CrossChainAggregator`: per-address cache of foreign-chain attestations
//! and the time-decayed weighted average over them (spec §4.11).

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;
use wot_config::CrossChainConfig;
use wot_types::{Address, Timestamp};

use crate::error::{CrossChainError, CrossChainResult};
use crate::score::ForeignChainScore;

/// `time_decay(age_h) = max(0.5, 1 - age_h/48)` (spec §4.11).
pub fn time_decay(age_hours: f64, floor: f64, horizon_hours: f64) -> f64 {
    (1.0 - age_hours / horizon_hours).max(floor)
}

/// Caches recent foreign-chain attestations per address and aggregates them
/// into a single `0..=100` trust score.
pub struct CrossChainAggregator {
    config: CrossChainConfig,
    cache: RwLock<HashMap<Address, VecDeque<ForeignChainScore>>>,
}

impl CrossChainAggregator {
    pub fn new(config: CrossChainConfig) -> Self {
        CrossChainAggregator {
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Record a newly observed attestation for `addr`, evicting the oldest
    /// once the per-address cache exceeds `max_cache_entries` (spec §4.11:
    /// "capped at 20 entries, newest kept").
    pub fn submit_score(&self, addr: Address, score: ForeignChainScore) {
        let mut cache = self.cache.write();
        let entries = cache.entry(addr).or_default();
        entries.push_back(score);
        while entries.len() > self.config.max_cache_entries {
            entries.pop_front();
        }
    }

    fn chain_weight(&self, chain_id: u32) -> f64 {
        self.config
            .chain_weight
            .get(&chain_id)
            .copied()
            .unwrap_or(self.config.default_chain_weight)
    }

    /// Aggregate cached attestations for `addr` as of `now` into a single
    /// `0..=100` score (spec §4.11). Unverified or expired (age >
    /// `max_age_hours`) entries are skipped; if nothing is left to
    /// aggregate, returns [`CrossChainError::NoUsableAttestation`].
    pub fn aggregate(&self, addr: Address, now: Timestamp) -> CrossChainResult<u8> {
        let cache = self.cache.read();
        let Some(entries) = cache.get(&addr) else {
            return Err(CrossChainError::NoUsableAttestation);
        };

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for entry in entries.iter() {
            if !entry.is_verified {
                continue;
            }
            let age_hours = entry.age_hours(now);
            if age_hours > self.config.max_age_hours as f64 {
                continue;
            }
            let weight = self.chain_weight(entry.chain_id)
                * time_decay(
                    age_hours,
                    self.config.decay_floor,
                    self.config.decay_horizon_hours as f64,
                );
            weighted_sum += weight * entry.score as f64;
            weight_total += weight;
        }

        if weight_total <= f64::EPSILON {
            return Err(CrossChainError::NoUsableAttestation);
        }
        Ok((weighted_sum / weight_total).round().clamp(0.0, 100.0) as u8)
    }
}
