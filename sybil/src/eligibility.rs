//! `is_validator_eligible` (spec §4.7 table).

use wot_net::SubnetKey;
use wot_types::BlockHeight;

use crate::profile::ValidatorProfile;

/// Minimum number of validations a candidate must have produced.
pub const MIN_VALIDATIONS: u32 = 50;
/// Minimum running accuracy.
pub const MIN_ACCURACY: f64 = 0.85;
/// Minimum blocks since first seen ("chain history").
pub const MIN_CHAIN_HISTORY_BLOCKS: BlockHeight = 10_000;
/// Minimum unspent-stake age in blocks.
pub const MIN_STAKE_AGE_BLOCKS: u32 = 1_000;
/// Minimum distinct funding sources behind the current stake.
pub const MIN_FUNDING_SOURCES: u32 = 3;
/// A validator's subnet must not be shared with more than this fraction of
/// already-selected validators (spec §4.7 does not give a literal number;
/// pinned here, see DESIGN.md).
pub const MAX_SUBNET_SHARE: f64 = 0.20;
/// Peer-set overlap with other eligible validators must stay under this
/// fraction.
pub const MAX_PEER_OVERLAP: f64 = 0.50;

/// Jaccard overlap between two peer sets, `0.0` if both are empty.
fn jaccard(a: &std::collections::HashSet<wot_types::Address>, b: &std::collections::HashSet<wot_types::Address>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// `is_validator_eligible(v, h)` (spec §4.7): every signal in the table must
/// pass. `selected_subnets` and `selected_peer_sets` describe validators
/// already chosen this selection round, so topology/overlap are evaluated
/// against the running selection rather than the whole validator set.
pub fn is_validator_eligible(
    profile: &ValidatorProfile,
    h: BlockHeight,
    selected_subnets: &[SubnetKey],
    selected_peer_sets: &[&std::collections::HashSet<wot_types::Address>],
) -> bool {
    if profile.validations_total < MIN_VALIDATIONS || profile.accuracy() < MIN_ACCURACY {
        return false;
    }
    if h - profile.first_seen_height < MIN_CHAIN_HISTORY_BLOCKS {
        return false;
    }
    if profile.stake_age_blocks < MIN_STAKE_AGE_BLOCKS {
        return false;
    }
    if profile.funding_sources < MIN_FUNDING_SOURCES {
        return false;
    }
    if let Some(subnet) = profile.subnet {
        if !selected_subnets.is_empty() {
            let shared = selected_subnets.iter().filter(|s| **s == subnet).count();
            let share = shared as f64 / selected_subnets.len() as f64;
            if share > MAX_SUBNET_SHARE {
                return false;
            }
        }
    }
    for other in selected_peer_sets {
        if jaccard(&profile.peers, other) >= MAX_PEER_OVERLAP {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use wot_types::Address;

    fn eligible_profile(addr: Address) -> ValidatorProfile {
        let mut p = ValidatorProfile::new(addr, 0);
        p.validations_total = 100;
        p.validations_correct = 90;
        p.stake_age_blocks = 2_000;
        p.funding_sources = 4;
        p
    }

    #[test]
    fn fresh_validator_with_no_history_is_ineligible() {
        let p = ValidatorProfile::new(Address([1; 20]), 0);
        assert!(!is_validator_eligible(&p, 20_000, &[], &[]));
    }

    #[test]
    fn seasoned_validator_with_clean_topology_is_eligible() {
        let p = eligible_profile(Address([1; 20]));
        assert!(is_validator_eligible(&p, 20_000, &[], &[]));
    }

    #[test]
    fn insufficient_chain_history_fails() {
        let mut p = eligible_profile(Address([1; 20]));
        p.first_seen_height = 15_000;
        assert!(!is_validator_eligible(&p, 20_000, &[], &[]));
    }

    #[test]
    fn oversaturated_subnet_fails() {
        let mut p = eligible_profile(Address([1; 20]));
        p.subnet = Some(SubnetKey::V4([10, 0, 0]));
        let selected = vec![SubnetKey::V4([10, 0, 0]); 5];
        assert!(!is_validator_eligible(&p, 20_000, &selected, &[]));
    }

    #[test]
    fn high_peer_overlap_fails() {
        let mut p = eligible_profile(Address([1; 20]));
        p.peers.insert(Address([2; 20]));
        p.peers.insert(Address([3; 20]));
        let mut other = std::collections::HashSet::new();
        other.insert(Address([2; 20]));
        other.insert(Address([3; 20]));
        assert!(!is_validator_eligible(&p, 20_000, &[], &[&other]));
    }
}
