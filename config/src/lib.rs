//! Configuration knobs recognized by the reputation/trust-verification core
//! (spec §6). Unrecognized keys are rejected by `serde`'s default strictness
//! via `#[serde(deny_unknown_fields)]`, mirroring `witnet_config`'s strict
//! `Config` struct.

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use wot_types::Amount;

pub use error::ConfigError;

/// Top-level configuration for the core.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub trust_graph: TrustGraphConfig,
    pub dispute: DisputeConfig,
    pub hat: HatConfig,
    pub dos: DosConfig,
    pub degradation: DegradationConfig,
    pub cross_chain: CrossChainConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            trust_graph: TrustGraphConfig::default(),
            dispute: DisputeConfig::default(),
            hat: HatConfig::default(),
            dos: DosConfig::default(),
            degradation: DegradationConfig::default(),
            cross_chain: CrossChainConfig::default(),
        }
    }
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field invariants that `serde` cannot express, per
    /// spec §6: "Percentages must sum to 100 per branch; configuration load
    /// fails otherwise."
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dispute.validate()?;
        self.hat.validate()?;
        Ok(())
    }
}

/// Web-of-Trust graph configuration (spec §4.2, §6).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TrustGraphConfig {
    /// Flat minimum bond required regardless of vote weight.
    pub min_bond_floor: Amount,
    /// Additional bond required per point of `|weight|` (spec §4.2:
    /// `min_bond(v) = min_bond_floor + v * bond_per_vote_point`).
    pub bond_per_vote_point: Amount,
    /// Default maximum path depth for `weighted_reputation` (spec §4.2).
    pub max_trust_path_depth: u32,
}

impl Default for TrustGraphConfig {
    fn default() -> Self {
        TrustGraphConfig {
            min_bond_floor: 100,
            bond_per_vote_point: 10,
            max_trust_path_depth: 3,
        }
    }
}

impl TrustGraphConfig {
    /// Minimum bond required for a vote/edge of absolute weight `v`.
    pub fn min_bond(&self, v: i16) -> Amount {
        self.min_bond_floor + Amount::from(v.unsigned_abs()) * self.bond_per_vote_point
    }
}

/// DAO dispute / commit-reveal configuration (spec §4.6, §6).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisputeConfig {
    pub challenger_reward_pct: u8,
    pub dao_voter_reward_pct: u8,
    pub burn_pct: u8,
    pub wrongly_accused_reward_pct: u8,
    pub failed_challenge_burn_pct: u8,
    pub commit_phase_duration: u32,
    pub reveal_phase_duration: u32,
    pub enable_commit_reveal: bool,
}

impl Default for DisputeConfig {
    fn default() -> Self {
        DisputeConfig {
            challenger_reward_pct: 50,
            dao_voter_reward_pct: 30,
            burn_pct: 20,
            wrongly_accused_reward_pct: 70,
            failed_challenge_burn_pct: 30,
            commit_phase_duration: 10,
            reveal_phase_duration: 10,
            enable_commit_reveal: true,
        }
    }
}

impl DisputeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let slash_sum = u16::from(self.challenger_reward_pct)
            + u16::from(self.dao_voter_reward_pct)
            + u16::from(self.burn_pct);
        if slash_sum != 100 {
            return Err(ConfigError::PercentagesDoNotSumTo100 {
                branch: "slash",
                sum: slash_sum,
            });
        }
        let keep_sum = u16::from(self.wrongly_accused_reward_pct)
            + u16::from(self.failed_challenge_burn_pct);
        if keep_sum != 100 {
            return Err(ConfigError::PercentagesDoNotSumTo100 {
                branch: "keep",
                sum: keep_sum,
            });
        }
        Ok(())
    }
}

/// HAT v2 consensus validator configuration (spec §4.5, §6).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HatConfig {
    pub min_validators: u32,
    pub consensus_threshold: f64,
    pub wot_coverage_threshold: f64,
    pub score_tolerance: i16,
    pub validation_timeout_secs: u64,
    pub wot_vote_weight: f64,
    pub non_wot_vote_weight: f64,
    pub per_validator_rate_limit_per_60s: u32,
}

impl Default for HatConfig {
    fn default() -> Self {
        HatConfig {
            min_validators: 10,
            consensus_threshold: 0.70,
            wot_coverage_threshold: 0.30,
            score_tolerance: 5,
            validation_timeout_secs: 30,
            wot_vote_weight: 1.0,
            non_wot_vote_weight: 0.5,
            per_validator_rate_limit_per_60s: 100,
        }
    }
}

impl HatConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.consensus_threshold) {
            return Err(ConfigError::OutOfRange {
                field: "hat.consensus_threshold",
            });
        }
        if !(0.0..=1.0).contains(&self.wot_coverage_threshold) {
            return Err(ConfigError::OutOfRange {
                field: "hat.wot_coverage_threshold",
            });
        }
        Ok(())
    }
}

/// One reputation-tiered rate-limit row (spec §4.8).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitTier {
    pub tx_per_min: u32,
    pub deploys_per_hour: u32,
    pub rpc_per_min: u32,
}

/// DoS-protection configuration (spec §4.8, §6).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DosConfig {
    pub critical: RateLimitTier,
    pub high: RateLimitTier,
    pub normal: RateLimitTier,
    pub low: RateLimitTier,
    pub max_bandwidth_per_peer_bytes_per_sec: u64,
    pub max_messages_per_minute: u32,
    pub consecutive_violations_to_ban: u32,
    pub ban_seconds_per_violation: u64,
    pub bytecode_reject_risk_score: f64,
    pub low_reputation_fee_multiplier: u32,
}

impl Default for DosConfig {
    fn default() -> Self {
        DosConfig {
            critical: RateLimitTier {
                tx_per_min: 1000,
                deploys_per_hour: 100,
                rpc_per_min: 3000,
            },
            high: RateLimitTier {
                tx_per_min: 300,
                deploys_per_hour: 20,
                rpc_per_min: 600,
            },
            normal: RateLimitTier {
                tx_per_min: 60,
                deploys_per_hour: 5,
                rpc_per_min: 120,
            },
            low: RateLimitTier {
                tx_per_min: 10,
                deploys_per_hour: 1,
                rpc_per_min: 30,
            },
            max_bandwidth_per_peer_bytes_per_sec: 1_000_000,
            max_messages_per_minute: 1000,
            consecutive_violations_to_ban: 10,
            ban_seconds_per_violation: 300,
            bytecode_reject_risk_score: 0.9,
            low_reputation_fee_multiplier: 10,
        }
    }
}

/// Per-subsystem circuit breaker configuration (spec §4.9, §6).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub success_threshold: u32,
    pub open_duration_ms: u64,
    pub half_open_max_requests: u32,
    pub failure_rate_threshold: f64,
    pub window_size_ms: u64,
    pub min_requests_for_rate: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        CircuitBreakerConfig {
            failure_threshold: 5,
            success_threshold: 3,
            open_duration_ms: 30_000,
            half_open_max_requests: 3,
            failure_rate_threshold: 0.5,
            window_size_ms: 60_000,
            min_requests_for_rate: 10,
        }
    }
}

/// Graceful-degradation configuration: one breaker config applied to every
/// subsystem unless overridden (spec §4.9).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DegradationConfig {
    pub default_breaker: CircuitBreakerConfig,
    pub reputation_cache_ttl_secs: u64,
    pub default_reputation: i16,
}

impl Default for DegradationConfig {
    fn default() -> Self {
        DegradationConfig {
            default_breaker: CircuitBreakerConfig::default(),
            reputation_cache_ttl_secs: 300,
            default_reputation: 50,
        }
    }
}

/// Cross-chain trust aggregation configuration (spec §4.11, §6). Per-chain
/// weights default to `1.0` for any `chain_id` not listed here; `wot-crosschain`
/// falls back to that default rather than treating an unlisted chain as
/// zero-weight.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CrossChainConfig {
    pub chain_weight: std::collections::BTreeMap<u32, f64>,
    pub default_chain_weight: f64,
    pub max_age_hours: u32,
    pub decay_floor: f64,
    pub decay_horizon_hours: u32,
    pub max_cache_entries: usize,
}

impl Default for CrossChainConfig {
    fn default() -> Self {
        CrossChainConfig {
            chain_weight: std::collections::BTreeMap::new(),
            default_chain_weight: 1.0,
            max_age_hours: 24,
            decay_floor: 0.5,
            decay_horizon_hours: 48,
            max_cache_entries: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_slash_percentages_not_summing_to_100() {
        let mut config = Config::default();
        config.dispute.burn_pct = 21;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PercentagesDoNotSumTo100 { branch: "slash", .. })
        ));
    }

    #[test]
    fn rejects_keep_percentages_not_summing_to_100() {
        let mut config = Config::default();
        config.dispute.failed_challenge_burn_pct = 31;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PercentagesDoNotSumTo100 { branch: "keep", .. })
        ));
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config = Config::from_str("[hat]\nmin_validators = 20\n").unwrap();
        assert_eq!(config.hat.min_validators, 20);
        assert_eq!(config.hat.consensus_threshold, 0.70);
    }
}
