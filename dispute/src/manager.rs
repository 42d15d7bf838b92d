//! `DisputeManager`: commit-reveal voting store plus reward distribution
//! (spec C6), layered on top of `wot-trust-graph`'s `DAODispute` record.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use wot_config::DisputeConfig;
use wot_crypto::hash::calculate_sha256_concat;
use wot_storage::Database;
use wot_trust_graph::TrustGraph;
use wot_types::{Address, Amount, BlockHeight, TxHash};

use crate::commitment::{self, VoteCommitment};
use crate::error::{DisputeError, DisputeResult};
use crate::phase::{phase_at, Phase};
use crate::rewards::{self, RewardDistribution};

const SLASH_VOTE_BYTE: u8 = 0x01;
const KEEP_VOTE_BYTE: u8 = 0x00;

/// Hash the vote+nonce pair a commitment binds to (spec §3 `VoteCommitment`
/// invariant).
pub fn commitment_hash(vote: bool, nonce: TxHash) -> TxHash {
    let vote_byte = if vote { SLASH_VOTE_BYTE } else { KEEP_VOTE_BYTE };
    let digest = calculate_sha256_concat(&[&[vote_byte], nonce.0.as_slice()]);
    TxHash(digest.0)
}

/// Commit-reveal voting store and reward distributor for DAO disputes.
pub struct DisputeManager<D: Database> {
    db: Arc<D>,
    config: DisputeConfig,
    commitments: RwLock<HashMap<(TxHash, Address), VoteCommitment>>,
    voters_by_dispute: RwLock<HashMap<TxHash, Vec<Address>>>,
    forfeited_pool: RwLock<HashMap<TxHash, Amount>>,
}

impl<D: Database> DisputeManager<D> {
    /// Build a manager backed by `db`, replaying persisted commitments.
    pub fn load(db: Arc<D>, config: DisputeConfig) -> DisputeResult<Self> {
        let manager = DisputeManager {
            db,
            config,
            commitments: RwLock::new(HashMap::new()),
            voters_by_dispute: RwLock::new(HashMap::new()),
            forfeited_pool: RwLock::new(HashMap::new()),
        };
        manager.reload()?;
        Ok(manager)
    }

    fn reload(&self) -> DisputeResult<()> {
        for (key, value) in self.db.list_prefix(&commitment::commitment_prefix())? {
            let commitment: VoteCommitment =
                bincode::deserialize(&value).map_err(|e| DisputeError::Decode {
                    key: String::from_utf8_lossy(&key).into_owned(),
                    msg: e.to_string(),
                })?;
            self.index_commitment(commitment);
        }
        Ok(())
    }

    fn index_commitment(&self, commitment: VoteCommitment) {
        self.voters_by_dispute
            .write()
            .entry(commitment.dispute)
            .or_default()
            .push(commitment.voter);
        self.commitments
            .write()
            .insert((commitment.dispute, commitment.voter), commitment);
    }

    fn persist_commitment(&self, commitment: &VoteCommitment) -> DisputeResult<()> {
        let bytes = bincode::serialize(commitment).expect("VoteCommitment is always serializable");
        self.db
            .write(&commitment::commitment_key(&commitment.dispute, &commitment.voter), bytes)?;
        let voters = self
            .voters_by_dispute
            .read()
            .get(&commitment.dispute)
            .cloned()
            .unwrap_or_default();
        let voters_bytes = bincode::serialize(&voters).expect("Vec<Address> is always serializable");
        self.db
            .write(&commitment::commitments_dispute_key(&commitment.dispute), voters_bytes)?;
        Ok(())
    }

    /// Fetch a single voter's commitment on a dispute.
    pub fn get_commitment(&self, dispute: TxHash, voter: Address) -> Option<VoteCommitment> {
        self.commitments.read().get(&(dispute, voter)).cloned()
    }

    /// Every voter who has committed on `dispute`, in submission order.
    pub fn voters_of(&self, dispute: TxHash) -> Vec<Address> {
        self.voters_by_dispute.read().get(&dispute).cloned().unwrap_or_default()
    }

    /// `submit_commitment(dispute, voter, hash, stake)` (spec §4.6): valid
    /// only in the commit phase, only with positive stake, only once per
    /// voter.
    pub fn submit_commitment<S: Database>(
        &self,
        trust_graph: &TrustGraph<S>,
        dispute_id: TxHash,
        voter: Address,
        hash: TxHash,
        stake: Amount,
        height: BlockHeight,
    ) -> DisputeResult<()> {
        let dispute = trust_graph
            .get_dispute(dispute_id)
            .ok_or(DisputeError::TrustGraph(wot_trust_graph::TrustGraphError::UnknownDispute(dispute_id)))?;
        if phase_at(&dispute, height, self.config.reveal_phase_duration) != Phase::Commit {
            return Err(DisputeError::NotInPhase(dispute_id));
        }
        if stake <= 0 {
            return Err(DisputeError::NonPositiveStake(stake));
        }
        if self.commitments.read().contains_key(&(dispute_id, voter)) {
            return Err(DisputeError::DuplicateCommitment(dispute_id, voter));
        }
        let commitment = VoteCommitment::new(dispute_id, voter, hash, stake, height);
        self.index_commitment(commitment.clone());
        self.persist_commitment(&commitment)
    }

    /// `reveal_vote(dispute, voter, vote, nonce)` (spec §4.6): valid only in
    /// the reveal phase, only against a matching commitment whose hash binds
    /// `vote`/`nonce`.
    pub fn reveal_vote<S: Database>(
        &self,
        trust_graph: &TrustGraph<S>,
        dispute_id: TxHash,
        voter: Address,
        vote: bool,
        nonce: TxHash,
        height: BlockHeight,
    ) -> DisputeResult<()> {
        let dispute = trust_graph
            .get_dispute(dispute_id)
            .ok_or(DisputeError::TrustGraph(wot_trust_graph::TrustGraphError::UnknownDispute(dispute_id)))?;
        if phase_at(&dispute, height, self.config.reveal_phase_duration) != Phase::Reveal {
            return Err(DisputeError::NotInPhase(dispute_id));
        }
        let mut commitment = self
            .commitments
            .read()
            .get(&(dispute_id, voter))
            .cloned()
            .ok_or(DisputeError::NoCommitment(dispute_id, voter))?;
        if commitment.revealed {
            return Err(DisputeError::AlreadyRevealed(dispute_id, voter));
        }
        if commitment_hash(vote, nonce) != commitment.hash {
            return Err(DisputeError::HashMismatch(dispute_id, voter));
        }
        commitment.revealed = true;
        commitment.vote = vote;
        commitment.nonce = nonce;
        commitment.reveal_height = height;
        self.commitments.write().insert((dispute_id, voter), commitment.clone());
        self.persist_commitment(&commitment)
    }

    /// Forfeit the stake of every commitment still unrevealed once the
    /// dispute reaches `Resolvable` (spec §4.6). Idempotent: already
    /// forfeited commitments are skipped.
    pub fn forfeit_unrevealed<S: Database>(
        &self,
        trust_graph: &TrustGraph<S>,
        dispute_id: TxHash,
        height: BlockHeight,
    ) -> DisputeResult<Amount> {
        let dispute = trust_graph
            .get_dispute(dispute_id)
            .ok_or(DisputeError::TrustGraph(wot_trust_graph::TrustGraphError::UnknownDispute(dispute_id)))?;
        if phase_at(&dispute, height, self.config.reveal_phase_duration) != Phase::Resolvable {
            return Err(DisputeError::NotInPhase(dispute_id));
        }
        let voters = self.voters_of(dispute_id);
        let mut newly_forfeited = 0;
        for voter in voters {
            let mut commitment = match self.commitments.read().get(&(dispute_id, voter)).cloned() {
                Some(c) => c,
                None => continue,
            };
            if commitment.revealed || commitment.forfeited {
                continue;
            }
            commitment.forfeited = true;
            newly_forfeited += commitment.stake;
            self.commitments.write().insert((dispute_id, voter), commitment.clone());
            self.persist_commitment(&commitment)?;
        }
        if newly_forfeited > 0 {
            *self.forfeited_pool.write().entry(dispute_id).or_insert(0) += newly_forfeited;
        }
        Ok(self.forfeited_pool.read().get(&dispute_id).copied().unwrap_or(0))
    }

    /// Total stake forfeited on `dispute` so far.
    pub fn forfeited_pool(&self, dispute_id: TxHash) -> Amount {
        self.forfeited_pool.read().get(&dispute_id).copied().unwrap_or(0)
    }

    /// Revealed commitments that voted to slash, as `(voter, stake)` pairs,
    /// used as the pro-rata basis for `dao_voter_reward_pct` (spec §4.6).
    fn revealed_slash_voters(&self, dispute_id: TxHash) -> Vec<(Address, Amount)> {
        self.voters_of(dispute_id)
            .into_iter()
            .filter_map(|voter| self.commitments.read().get(&(dispute_id, voter)).cloned())
            .filter(|c| c.revealed && c.vote)
            .map(|c| (c.voter, c.stake))
            .collect()
    }

    /// Distribute rewards for a dispute `resolve_dispute` has already
    /// settled, then mark it distributed on the trust graph so a second
    /// call is rejected (spec §4.6, §8 property 5).
    ///
    /// For `use_commit_reveal` disputes, DAO-voter pro-rata shares are
    /// computed from revealed commitments; for direct-vote disputes, from
    /// `DAODispute::dao_votes`/`dao_stakes`.
    pub fn distribute_rewards<S: Database>(
        &self,
        trust_graph: &TrustGraph<S>,
        dispute_id: TxHash,
        reward_distribution_id: TxHash,
    ) -> DisputeResult<RewardDistribution> {
        let dispute = trust_graph
            .get_dispute(dispute_id)
            .ok_or(DisputeError::TrustGraph(wot_trust_graph::TrustGraphError::UnknownDispute(dispute_id)))?;
        if !dispute.resolved {
            return Err(DisputeError::NotResolvable(dispute_id));
        }
        if dispute.rewards_distributed {
            return Err(DisputeError::AlreadyDistributed(dispute_id));
        }

        let disputed_vote = trust_graph
            .get_vote(dispute.disputed_vote_tx)
            .ok_or(DisputeError::TrustGraph(wot_trust_graph::TrustGraphError::UnknownVote(
                dispute.disputed_vote_tx,
            )))?;

        let dist = if dispute.slash_decision {
            let slash_voters = if dispute.use_commit_reveal {
                self.revealed_slash_voters(dispute_id)
            } else {
                dispute
                    .dao_votes
                    .iter()
                    .filter(|(_, slash)| **slash)
                    .map(|(voter, _)| (*voter, dispute.dao_stakes.get(voter).copied().unwrap_or(0)))
                    .collect()
            };
            rewards::distribute_slash_reward(
                &self.config,
                dispute.challenger,
                disputed_vote.bond,
                &slash_voters,
            )
        } else {
            rewards::distribute_keep_reward(&self.config, disputed_vote.voter, dispute.challenge_bond)
        };

        trust_graph.mark_rewards_distributed(dispute_id, reward_distribution_id)?;
        Ok(dist)
    }
}

#[cfg(test)]
mod tests {
    use wot_config::TrustGraphConfig;
    use wot_storage::backends::hashmap::HashMapBackend;

    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    fn tx(b: u8) -> TxHash {
        let mut h = TxHash::zero();
        h.0[0] = b;
        h
    }

    fn setup() -> (Arc<TrustGraph<HashMapBackend>>, DisputeManager<HashMapBackend>, TxHash) {
        let trust_graph = Arc::new(
            TrustGraph::load(Arc::new(HashMapBackend::new()), TrustGraphConfig::default()).unwrap(),
        );
        let manager = DisputeManager::load(Arc::new(HashMapBackend::new()), DisputeConfig::default()).unwrap();

        let disputed_vote_tx = tx(1);
        trust_graph
            .record_bonded_vote(wot_trust_graph::BondedVote {
                voter: addr(1),
                target: addr(2),
                value: -50,
                bond: 100,
                bond_tx: disputed_vote_tx,
                ts: 0,
                slashed: false,
                slash_tx: None,
                reason: String::new(),
            })
            .unwrap();

        let dispute_id = tx(2);
        trust_graph
            .create_dispute(
                dispute_id,
                disputed_vote_tx,
                addr(3),
                50,
                "bad vote".into(),
                1000,
                1000,
                10,
                10,
                true,
            )
            .unwrap();
        (trust_graph, manager, dispute_id)
    }

    #[test]
    fn s5_commit_reveal_timing() {
        let (trust_graph, manager, dispute_id) = setup();
        let nonce = tx(7);
        let hash = commitment_hash(true, nonce);

        manager
            .submit_commitment(&trust_graph, dispute_id, addr(4), hash, 10, 1005)
            .unwrap();

        // Same voter re-submitting inside the commit window is rejected as a
        // duplicate commitment, not a second independent ballot.
        let err = manager
            .submit_commitment(&trust_graph, dispute_id, addr(4), hash, 10, 1009)
            .unwrap_err();
        assert_eq!(err, DisputeError::DuplicateCommitment(dispute_id, addr(4)));

        manager
            .reveal_vote(&trust_graph, dispute_id, addr(4), true, nonce, 1015)
            .unwrap();

        let err = manager
            .reveal_vote(&trust_graph, dispute_id, addr(4), true, nonce, 1015)
            .unwrap_err();
        assert_eq!(err, DisputeError::AlreadyRevealed(dispute_id, addr(4)));

        manager
            .submit_commitment(&trust_graph, dispute_id, addr(5), commitment_hash(false, tx(8)), 5, 1006)
            .unwrap();

        let forfeited = manager.forfeit_unrevealed(&trust_graph, dispute_id, 1025).unwrap();
        assert_eq!(forfeited, 5);
    }

    #[test]
    fn reveal_with_wrong_vote_fails_hash_check() {
        let (trust_graph, manager, dispute_id) = setup();
        let nonce = tx(7);
        let hash = commitment_hash(true, nonce);
        manager
            .submit_commitment(&trust_graph, dispute_id, addr(4), hash, 10, 1005)
            .unwrap();

        let err = manager
            .reveal_vote(&trust_graph, dispute_id, addr(4), false, nonce, 1015)
            .unwrap_err();
        assert_eq!(err, DisputeError::HashMismatch(dispute_id, addr(4)));
    }

    #[test]
    fn s6_reward_distribution_on_slash() {
        let (trust_graph, manager, dispute_id) = setup();

        manager
            .submit_commitment(&trust_graph, dispute_id, addr(10), commitment_hash(true, tx(20)), 4, 1005)
            .unwrap();
        manager
            .submit_commitment(&trust_graph, dispute_id, addr(11), commitment_hash(true, tx(21)), 6, 1006)
            .unwrap();
        manager
            .reveal_vote(&trust_graph, dispute_id, addr(10), true, tx(20), 1015)
            .unwrap();
        manager
            .reveal_vote(&trust_graph, dispute_id, addr(11), true, tx(21), 1015)
            .unwrap();

        trust_graph.resolve_dispute(dispute_id, true, 1020).unwrap();
        let dist = manager
            .distribute_rewards(&trust_graph, dispute_id, tx(99))
            .unwrap();

        assert_eq!(dist.payouts[&addr(3)], 50);
        assert_eq!(dist.payouts[&addr(10)], 12);
        assert_eq!(dist.payouts[&addr(11)], 18);
        assert_eq!(dist.burned, 20);

        let err = manager
            .distribute_rewards(&trust_graph, dispute_id, tx(99))
            .unwrap_err();
        assert_eq!(err, DisputeError::AlreadyDistributed(dispute_id));
    }

    #[test]
    fn reward_distribution_on_keep_pays_accused() {
        let (trust_graph, manager, dispute_id) = setup();
        trust_graph.resolve_dispute(dispute_id, false, 1020).unwrap();
        let dist = manager
            .distribute_rewards(&trust_graph, dispute_id, tx(99))
            .unwrap();
        // addr(1) is the voter on the disputed bonded vote, i.e. the accused.
        assert_eq!(dist.payouts[&addr(1)], 35);
        assert_eq!(dist.burned, 15);
    }
}
