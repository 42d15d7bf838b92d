//! `DAODispute` (spec §3, §4.6). The phase machine (commit/reveal window
//! arithmetic) and reward distribution live in `wot-dispute` (C6); this
//! crate only owns the record and the direct (non-commit-reveal) vote path
//! spec §4.2 lists as a C2 operation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use wot_types::{Address, Amount, BlockHeight, Timestamp, TxHash};

/// A challenge against a bonded vote, resolved either by direct DAO vote or
/// by commit-reveal (spec §3, §4.6).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DAODispute {
    /// Identity of this dispute.
    pub id: TxHash,
    /// The bonded vote under dispute.
    pub disputed_vote_tx: TxHash,
    /// Address that opened the dispute.
    pub challenger: Address,
    /// Bond the challenger staked to open the dispute.
    pub challenge_bond: Amount,
    /// Free-text justification.
    pub reason: String,
    /// Block height the dispute was created at.
    pub created_ts: Timestamp,
    /// Direct (non-commit-reveal) DAO votes: voter -> slash?.
    pub dao_votes: HashMap<Address, bool>,
    /// Stake backing each direct DAO vote.
    pub dao_stakes: HashMap<Address, Amount>,
    /// Whether this dispute has been resolved.
    pub resolved: bool,
    /// Resolution outcome: `true` = slash the disputed vote's bond.
    pub slash_decision: bool,
    /// Block height at which the dispute was resolved.
    pub resolved_ts: Timestamp,
    /// Block height the commit phase starts at.
    pub commit_phase_start: BlockHeight,
    /// Block height the reveal phase starts at.
    pub reveal_phase_start: BlockHeight,
    /// Whether this dispute uses commit-reveal voting rather than direct votes.
    pub use_commit_reveal: bool,
    /// Whether reward distribution has already run (spec §4.6: "re-distribution
    /// is rejected").
    pub rewards_distributed: bool,
    /// Identifier correlating this dispute with its reward-distribution event.
    pub reward_distribution_id: TxHash,
}

impl DAODispute {
    /// Weighted tally of direct DAO votes: `(slash_stake, keep_stake)`.
    pub fn direct_vote_tally(&self) -> (Amount, Amount) {
        let mut slash = 0i64;
        let mut keep = 0i64;
        for (voter, vote) in &self.dao_votes {
            let stake = self.dao_stakes.get(voter).copied().unwrap_or(0);
            if *vote {
                slash += stake;
            } else {
                keep += stake;
            }
        }
        (slash, keep)
    }
}
