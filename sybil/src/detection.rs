//! `detect_validator_sybil_network` and `validate_validator_set_diversity`
//! (spec §4.7).

use std::collections::HashMap;

use wot_clustering::WalletClusterer;
use wot_storage::Database;
use wot_types::Address;

use crate::eligibility::MAX_PEER_OVERLAP;
use crate::profile::ValidatorProfile;

/// Confidence above which a selected validator set auto-escalates to DAO
/// review (spec §4.7).
pub const SYBIL_CONFIDENCE_THRESHOLD: f64 = 0.60;
/// Stake-source concentration above which a single funding source is
/// considered suspicious.
pub const SUSPICIOUS_FUNDING_CONCENTRATION: f64 = 0.20;
/// Minimum fraction of a validator set that must lack a direct WoT path to
/// the sender (spec §4.7 diversity requirement).
pub const MIN_NON_WOT_FRACTION: f64 = 0.40;

/// The most common subnet bucket's share of `profiles`, `0.0` if every
/// validator has an unknown subnet.
fn shared_subnet_ratio(profiles: &[&ValidatorProfile]) -> f64 {
    let mut counts: HashMap<wot_net::SubnetKey, usize> = HashMap::new();
    let mut known = 0usize;
    for p in profiles {
        if let Some(subnet) = p.subnet {
            *counts.entry(subnet).or_insert(0) += 1;
            known += 1;
        }
    }
    if known == 0 {
        return 0.0;
    }
    counts.values().copied().max().unwrap_or(0) as f64 / known as f64
}

/// Mean pairwise Jaccard overlap across every pair of peer sets in
/// `profiles`.
fn mean_peer_overlap(profiles: &[&ValidatorProfile]) -> f64 {
    if profiles.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    let mut pairs = 0;
    for i in 0..profiles.len() {
        for j in (i + 1)..profiles.len() {
            let a = &profiles[i].peers;
            let b = &profiles[j].peers;
            if a.is_empty() && b.is_empty() {
                continue;
            }
            let intersection = a.intersection(b).count();
            let union = a.union(b).count();
            total += intersection as f64 / union.max(1) as f64;
            pairs += 1;
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total / pairs as f64
    }
}

/// Largest `dominant_funding_source_share` across the set, standing in for
/// "stake derived predominantly from a single source" at the set level.
fn max_funding_concentration(profiles: &[&ValidatorProfile]) -> f64 {
    profiles
        .iter()
        .map(|p| p.dominant_funding_source_share)
        .fold(0.0, f64::max)
}

/// Whether every validator in `profiles` resolves to the same wallet
/// cluster (spec §4.7: "all from same WoT component").
fn all_in_one_cluster<D: Database>(clusterer: &WalletClusterer<D>, addresses: &[Address]) -> bool {
    if addresses.len() < 2 {
        return false;
    }
    let first_root = clusterer.find(addresses[0]);
    addresses.iter().all(|a| clusterer.find(*a) == first_root)
}

/// `detect_validator_sybil_network(set, h)` (spec §4.7): combine four
/// signals into a `[0,1]` confidence that `profiles` is a coordinated Sybil
/// set. Each signal contributes an equal quarter share.
pub fn detect_coordinated_sybil_network<D: Database>(
    clusterer: &WalletClusterer<D>,
    profiles: &[&ValidatorProfile],
) -> f64 {
    if profiles.is_empty() {
        return 0.0;
    }
    let addresses: Vec<Address> = profiles.iter().map(|p| p.address).collect();

    let subnet_signal = shared_subnet_ratio(profiles);
    let overlap_signal = (mean_peer_overlap(profiles) / MAX_PEER_OVERLAP).min(1.0);
    let concentration = max_funding_concentration(profiles);
    let concentration_signal = if concentration > SUSPICIOUS_FUNDING_CONCENTRATION {
        (concentration / 1.0).min(1.0)
    } else {
        0.0
    };
    let isolation_signal = if all_in_one_cluster(clusterer, &addresses) { 1.0 } else { 0.0 };

    (subnet_signal + overlap_signal + concentration_signal + isolation_signal) / 4.0
}

/// `validate_validator_set_diversity(set, h)` (spec §4.7): at least 40% of
/// the set must lack a direct WoT path to the sender.
pub fn validate_validator_set_diversity(has_wot_flags: &[bool]) -> bool {
    if has_wot_flags.is_empty() {
        return false;
    }
    let non_wot = has_wot_flags.iter().filter(|has_wot| !**has_wot).count();
    non_wot as f64 / has_wot_flags.len() as f64 >= MIN_NON_WOT_FRACTION
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wot_storage::backends::hashmap::HashMapBackend;

    use super::*;

    fn profile_with_subnet(addr: u8, subnet: wot_net::SubnetKey) -> ValidatorProfile {
        let mut p = ValidatorProfile::new(Address([addr; 20]), 0);
        p.subnet = Some(subnet);
        p
    }

    #[test]
    fn shared_subnet_across_all_validators_is_fully_suspicious() {
        let clusterer = WalletClusterer::load(Arc::new(HashMapBackend::new())).unwrap();
        let subnet = wot_net::SubnetKey::V4([10, 0, 0]);
        let profiles = vec![profile_with_subnet(1, subnet), profile_with_subnet(2, subnet)];
        let refs: Vec<&ValidatorProfile> = profiles.iter().collect();
        let confidence = detect_coordinated_sybil_network(&clusterer, &refs);
        assert!(confidence >= 0.25);
    }

    #[test]
    fn diversity_passes_with_enough_non_wot_validators() {
        assert!(validate_validator_set_diversity(&[true, true, false, false, false]));
        assert!(!validate_validator_set_diversity(&[true, true, true, true, false]));
    }

    #[test]
    fn single_shared_cluster_is_maximally_isolated() {
        let clusterer = WalletClusterer::load(Arc::new(HashMapBackend::new())).unwrap();
        clusterer.union(Address([1; 20]), Address([2; 20])).unwrap();
        let profiles = vec![ValidatorProfile::new(Address([1; 20]), 0), ValidatorProfile::new(Address([2; 20]), 0)];
        let refs: Vec<&ValidatorProfile> = profiles.iter().collect();
        // isolation signal alone contributes 0.25 to the blended confidence.
        assert!(detect_coordinated_sybil_network(&clusterer, &refs) >= 0.25);
    }
}
