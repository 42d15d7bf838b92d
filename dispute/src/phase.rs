//! Commit-reveal phase machine: a pure function of block height (spec §4.6).
//!
//! ```text
//! Created ─▶ CommitPhase ─▶ RevealPhase ─▶ Resolved
//!             (commit_dur)   (reveal_dur)
//! ```

use wot_trust_graph::DAODispute;
use wot_types::BlockHeight;

/// Where a dispute sits in the commit-reveal timeline at a given height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// `h < commit_phase_start`: the dispute has not opened for voting yet.
    NotStarted,
    /// `h ∈ [commit_start, commit_start+commit_dur)`.
    Commit,
    /// `h ∈ [commit_start+commit_dur, commit_start+commit_dur+reveal_dur)`.
    Reveal,
    /// `h ≥ commit_start+commit_dur+reveal_dur`: resolution and forfeiture
    /// are permitted.
    Resolvable,
}

/// Classify `dispute`'s phase at height `h`, given the reveal-phase duration
/// it was created with (the commit-phase end is already `reveal_phase_start`
/// on the record; only the reveal end needs the duration parameter).
pub fn phase_at(dispute: &DAODispute, h: BlockHeight, reveal_phase_duration: u32) -> Phase {
    let reveal_end = dispute.reveal_phase_start + reveal_phase_duration as BlockHeight;
    if h < dispute.commit_phase_start {
        Phase::NotStarted
    } else if h < dispute.reveal_phase_start {
        Phase::Commit
    } else if h < reveal_end {
        Phase::Reveal
    } else {
        Phase::Resolvable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wot_types::{Address, TxHash};

    fn dispute_at(commit_start: BlockHeight, commit_dur: BlockHeight) -> DAODispute {
        DAODispute {
            id: TxHash::zero(),
            disputed_vote_tx: TxHash::zero(),
            challenger: Address([0u8; 20]),
            challenge_bond: 0,
            reason: String::new(),
            created_ts: 0,
            dao_votes: Default::default(),
            dao_stakes: Default::default(),
            resolved: false,
            slash_decision: false,
            resolved_ts: 0,
            commit_phase_start: commit_start,
            reveal_phase_start: commit_start + commit_dur,
            use_commit_reveal: true,
            rewards_distributed: false,
            reward_distribution_id: TxHash::zero(),
        }
    }

    #[test]
    fn s5_phase_boundaries() {
        let dispute = dispute_at(1000, 10);
        assert_eq!(phase_at(&dispute, 1005, 10), Phase::Commit);
        assert_eq!(phase_at(&dispute, 1009, 10), Phase::Commit);
        assert_eq!(phase_at(&dispute, 1010, 10), Phase::Reveal);
        assert_eq!(phase_at(&dispute, 1015, 10), Phase::Reveal);
        assert_eq!(phase_at(&dispute, 1019, 10), Phase::Reveal);
        assert_eq!(phase_at(&dispute, 1020, 10), Phase::Resolvable);
        assert_eq!(phase_at(&dispute, 1025, 10), Phase::Resolvable);
    }

    #[test]
    fn before_commit_start_is_not_started() {
        let dispute = dispute_at(1000, 10);
        assert_eq!(phase_at(&dispute, 999, 10), Phase::NotStarted);
    }
}
