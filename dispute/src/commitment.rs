//! `VoteCommitment` record (spec §3) and its persisted key layout (spec §6).

use serde::{Deserialize, Serialize};
use wot_types::{Address, Amount, BlockHeight, TxHash};

/// One voter's commit-reveal ballot on a dispute.
///
/// `hash` must equal `H(vote_byte || nonce)` with `vote_byte = 0x01` for
/// slash and `0x00` for keep; `reveal_vote` checks this before accepting.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteCommitment {
    pub dispute: TxHash,
    pub voter: Address,
    pub hash: TxHash,
    pub stake: Amount,
    pub commit_height: BlockHeight,
    pub revealed: bool,
    pub vote: bool,
    pub nonce: TxHash,
    pub reveal_height: BlockHeight,
    pub forfeited: bool,
}

impl VoteCommitment {
    pub(crate) fn new(
        dispute: TxHash,
        voter: Address,
        hash: TxHash,
        stake: Amount,
        commit_height: BlockHeight,
    ) -> Self {
        VoteCommitment {
            dispute,
            voter,
            hash,
            stake,
            commit_height,
            revealed: false,
            vote: false,
            nonce: TxHash::zero(),
            reveal_height: 0,
            forfeited: false,
        }
    }
}

/// `commitment_{dispute}_{voter}`.
pub fn commitment_key(dispute: &TxHash, voter: &Address) -> Vec<u8> {
    format!("commitment_{}_{}", dispute, voter).into_bytes()
}

/// `commitments_dispute_{dispute}`: the list of voters who have committed.
pub fn commitments_dispute_key(dispute: &TxHash) -> Vec<u8> {
    format!("commitments_dispute_{}", dispute).into_bytes()
}

/// Prefix covering every commitment of every dispute (used to rebuild the
/// in-memory index on load).
pub fn commitment_prefix() -> Vec<u8> {
    b"commitment_".to_vec()
}
