//! Reward-distribution arithmetic for resolved disputes (spec §4.6).

use std::collections::HashMap;

use wot_config::DisputeConfig;
use wot_types::{Address, Amount};

/// Payout computed for one dispute resolution. `payouts` never includes a
/// zero-amount entry; `burned` is whatever pro-rata rounding left over, so
/// `payouts.values().sum::<Amount>() + burned` always equals the amount
/// distributed (spec §8 property 5, reward conservation).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RewardDistribution {
    pub payouts: HashMap<Address, Amount>,
    pub burned: Amount,
}

/// Split a slashed bond: `challenger_reward_pct` to the challenger,
/// `dao_voter_reward_pct` pro-rata by stake among `slash_voters`, the rest
/// burned.
///
/// Pro-rata rounding always floors, so the sum of voter payouts can fall
/// short of the nominal `dao_voter_reward_pct` share; the shortfall is
/// folded into `burned` rather than silently dropped, keeping the total
/// exactly equal to `slashed_bond`.
pub fn distribute_slash_reward(
    config: &DisputeConfig,
    challenger: Address,
    slashed_bond: Amount,
    slash_voters: &[(Address, Amount)],
) -> RewardDistribution {
    let mut dist = RewardDistribution::default();
    let challenger_share = slashed_bond * Amount::from(config.challenger_reward_pct) / 100;
    let voter_pool = slashed_bond * Amount::from(config.dao_voter_reward_pct) / 100;

    if challenger_share > 0 {
        dist.payouts.insert(challenger, challenger_share);
    }

    let total_stake: Amount = slash_voters.iter().map(|(_, s)| *s).sum();
    let mut distributed_to_voters = 0;
    if total_stake > 0 {
        for (voter, stake) in slash_voters {
            let share = voter_pool * stake / total_stake;
            if share > 0 {
                *dist.payouts.entry(*voter).or_insert(0) += share;
            }
            distributed_to_voters += share;
        }
    }

    let accounted = challenger_share + distributed_to_voters;
    dist.burned = slashed_bond - accounted;
    dist
}

/// Split a challenger's forfeited bond after a failed challenge:
/// `wrongly_accused_reward_pct` to the wrongly accused member, the rest
/// burned.
pub fn distribute_keep_reward(
    config: &DisputeConfig,
    wrongly_accused: Address,
    forfeited_bond: Amount,
) -> RewardDistribution {
    let mut dist = RewardDistribution::default();
    let accused_share = forfeited_bond * Amount::from(config.wrongly_accused_reward_pct) / 100;
    if accused_share > 0 {
        dist.payouts.insert(wrongly_accused, accused_share);
    }
    dist.burned = forfeited_bond - accused_share;
    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    #[test]
    fn s6_reward_split_sums_to_bond() {
        let config = DisputeConfig::default();
        let dist = distribute_slash_reward(
            &config,
            addr(1),
            100,
            &[(addr(2), 4), (addr(3), 6)],
        );
        assert_eq!(dist.payouts[&addr(1)], 50);
        assert_eq!(dist.payouts[&addr(2)], 12);
        assert_eq!(dist.payouts[&addr(3)], 18);
        assert_eq!(dist.burned, 20);
        assert_eq!(
            dist.payouts.values().sum::<Amount>() + dist.burned,
            100
        );
    }

    #[test]
    fn no_slash_voters_burns_their_share() {
        let config = DisputeConfig::default();
        let dist = distribute_slash_reward(&config, addr(1), 100, &[]);
        assert_eq!(dist.payouts[&addr(1)], 50);
        assert_eq!(dist.burned, 50);
    }

    #[test]
    fn keep_branch_splits_forfeited_bond() {
        let config = DisputeConfig::default();
        let dist = distribute_keep_reward(&config, addr(9), 100);
        assert_eq!(dist.payouts[&addr(9)], 70);
        assert_eq!(dist.burned, 30);
        assert_eq!(dist.payouts.values().sum::<Amount>() + dist.burned, 100);
    }
}
