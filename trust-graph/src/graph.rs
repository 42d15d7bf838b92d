//! `TrustGraph`: the C2 Web-of-Trust store. Two indexed containers
//! (`outgoing`, `incoming`) are kept consistent on every insert (spec §9);
//! weighted-reputation reads only ever take a read lock (spec §5).

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use wot_config::TrustGraphConfig;
use wot_storage::Database;
use wot_types::{Address, Amount, Timestamp, TxHash};

use crate::dispute::DAODispute;
use crate::edge::TrustEdge;
use crate::error::{TrustGraphError, TrustGraphResult};
use crate::keys;
use crate::path::{self, TrustPath};
use crate::vote::BondedVote;

/// Default depth used when a caller does not specify one explicitly
/// (spec §4.2: `weighted_reputation(viewer, target, max_depth=3)`).
pub const DEFAULT_MAX_DEPTH: u32 = 3;

type EdgeRow = BTreeMap<Address, TrustEdge>;

/// The personalized weighted Web-of-Trust graph (spec C2).
pub struct TrustGraph<D: Database> {
    db: Arc<D>,
    config: TrustGraphConfig,
    outgoing: RwLock<HashMap<Address, EdgeRow>>,
    incoming: RwLock<HashMap<Address, EdgeRow>>,
    votes: RwLock<HashMap<TxHash, BondedVote>>,
    disputes: RwLock<HashMap<TxHash, DAODispute>>,
}

impl<D: Database> TrustGraph<D> {
    /// Build a graph backed by `db`, replaying every persisted record to
    /// rebuild the in-memory indices (crash-recovery path).
    pub fn load(db: Arc<D>, config: TrustGraphConfig) -> TrustGraphResult<Self> {
        let graph = TrustGraph {
            db,
            config,
            outgoing: RwLock::new(HashMap::new()),
            incoming: RwLock::new(HashMap::new()),
            votes: RwLock::new(HashMap::new()),
            disputes: RwLock::new(HashMap::new()),
        };
        graph.reload()?;
        Ok(graph)
    }

    fn reload(&self) -> TrustGraphResult<()> {
        for (key, value) in self.db.list_prefix(&keys::trust_edge_prefix())? {
            let edge: TrustEdge = bincode::deserialize(&value).map_err(|e| TrustGraphError::Decode {
                key: String::from_utf8_lossy(&key).into_owned(),
                msg: e.to_string(),
            })?;
            self.index_edge(edge);
        }
        for (key, value) in self.db.list_prefix(&keys::bonded_vote_prefix())? {
            let vote: BondedVote = bincode::deserialize(&value).map_err(|e| TrustGraphError::Decode {
                key: String::from_utf8_lossy(&key).into_owned(),
                msg: e.to_string(),
            })?;
            self.votes.write().insert(vote.bond_tx, vote);
        }
        for (key, value) in self.db.list_prefix(&keys::dispute_prefix())? {
            let dispute: DAODispute = bincode::deserialize(&value).map_err(|e| TrustGraphError::Decode {
                key: String::from_utf8_lossy(&key).into_owned(),
                msg: e.to_string(),
            })?;
            self.disputes.write().insert(dispute.id, dispute);
        }
        Ok(())
    }

    fn index_edge(&self, edge: TrustEdge) {
        self.outgoing
            .write()
            .entry(edge.from)
            .or_default()
            .insert(edge.to, edge.clone());
        self.incoming
            .write()
            .entry(edge.to)
            .or_default()
            .insert(edge.from, edge);
    }

    fn persist_edge(&self, edge: &TrustEdge) -> TrustGraphResult<()> {
        let bytes = bincode::serialize(edge).expect("TrustEdge is always serializable");
        self.db.write(&keys::trust_edge_key(&edge.from, &edge.to), bytes)?;
        Ok(())
    }

    fn persist_vote(&self, vote: &BondedVote) -> TrustGraphResult<()> {
        let bytes = bincode::serialize(vote).expect("BondedVote is always serializable");
        self.db.write(&keys::bonded_vote_key(&vote.bond_tx), bytes)?;
        Ok(())
    }

    fn persist_dispute(&self, dispute: &DAODispute) -> TrustGraphResult<()> {
        let bytes = bincode::serialize(dispute).expect("DAODispute is always serializable");
        self.db.write(&keys::dispute_key(&dispute.id), bytes)?;
        Ok(())
    }

    /// Minimum bond required for a vote/edge of absolute weight `v` (spec §4.2).
    pub fn min_bond(&self, v: i16) -> Amount {
        self.config.min_bond(v)
    }

    /// Add or replace the directed edge `from -> to` (spec §4.2).
    pub fn add_trust_edge(
        &self,
        from: Address,
        to: Address,
        weight: i16,
        bond_amount: Amount,
        bond_tx: TxHash,
        created_at_ts: Timestamp,
        reason: String,
    ) -> TrustGraphResult<TrustEdge> {
        if from == to {
            return Err(TrustGraphError::SelfTrust(from));
        }
        if weight == 0 || !(-100..=100).contains(&weight) {
            return Err(TrustGraphError::WeightOutOfRange(weight));
        }
        let need = self.min_bond(weight.unsigned_abs() as i16);
        if bond_amount < need {
            return Err(TrustGraphError::InsufficientBond {
                got: bond_amount,
                need,
            });
        }
        let edge = TrustEdge {
            from,
            to,
            weight,
            created_at_ts,
            bond_amount,
            bond_tx,
            slashed: false,
            reason,
            inherited: false,
        };
        self.persist_edge(&edge)?;
        self.index_edge(edge.clone());
        debug!("trust edge recorded {} -> {} ({})", from, to, weight);
        Ok(edge)
    }

    /// Fetch the edge for `(from, to)`, if any.
    pub fn get_trust_edge(&self, from: Address, to: Address) -> Option<TrustEdge> {
        self.outgoing.read().get(&from)?.get(&to).cloned()
    }

    /// Every edge `from` has posted, sorted by destination.
    pub fn get_outgoing(&self, from: Address) -> Vec<TrustEdge> {
        self.outgoing
            .read()
            .get(&from)
            .map(|row| row.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Every edge pointing at `to`, sorted by source.
    pub fn get_incoming(&self, to: Address) -> Vec<TrustEdge> {
        self.incoming
            .read()
            .get(&to)
            .map(|row| row.values().cloned().collect())
            .unwrap_or_default()
    }

    fn active_adjacency(&self, at: Address) -> Vec<(Address, i16)> {
        self.outgoing
            .read()
            .get(&at)
            .map(|row| {
                row.values()
                    .filter(|e| e.is_active())
                    .map(|e| (e.to, e.weight))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sum of `∏(hop_weights/100)` over every simple path `viewer -> target`
    /// of length `<= max_depth` (spec §4.2).
    pub fn weighted_reputation(&self, viewer: Address, target: Address, max_depth: u32) -> f64 {
        path::weighted_reputation(viewer, target, max_depth, &|a| self.active_adjacency(a))
    }

    /// Enumerate every simple path `from -> to` of length `<= max_depth`.
    pub fn find_paths(&self, from: Address, to: Address, max_depth: u32) -> Vec<TrustPath> {
        path::find_paths(from, to, max_depth, &|a| self.active_adjacency(a))
    }

    /// Record a bonded vote (spec §4.2). Rejects a duplicate `bond_tx`.
    pub fn record_bonded_vote(&self, vote: BondedVote) -> TrustGraphResult<()> {
        let need = self.min_bond(vote.value.unsigned_abs() as i16);
        if vote.bond < need {
            return Err(TrustGraphError::InsufficientBond {
                got: vote.bond,
                need,
            });
        }
        if self.votes.read().contains_key(&vote.bond_tx) {
            return Err(TrustGraphError::DuplicateBondTx(vote.bond_tx));
        }
        self.persist_vote(&vote)?;
        self.votes.write().insert(vote.bond_tx, vote);
        Ok(())
    }

    /// Fetch a bonded vote by its `bond_tx`.
    pub fn get_vote(&self, bond_tx: TxHash) -> Option<BondedVote> {
        self.votes.read().get(&bond_tx).cloned()
    }

    /// Flip `slashed` to `true` on the vote identified by `vote_tx`, recording
    /// `slash_tx`. Idempotent (spec §4.2).
    pub fn slash_vote(&self, vote_tx: TxHash, slash_tx: TxHash) -> TrustGraphResult<()> {
        let mut votes = self.votes.write();
        let vote = votes
            .get_mut(&vote_tx)
            .ok_or(TrustGraphError::UnknownVote(vote_tx))?;
        vote.slashed = true;
        vote.slash_tx = Some(slash_tx);
        let snapshot = vote.clone();
        drop(votes);
        self.persist_vote(&snapshot)
    }

    /// Open a new dispute against a bonded vote (spec §4.2, §4.6).
    #[allow(clippy::too_many_arguments)]
    pub fn create_dispute(
        &self,
        id: TxHash,
        disputed_vote_tx: TxHash,
        challenger: Address,
        challenge_bond: Amount,
        reason: String,
        created_ts: Timestamp,
        commit_phase_start: i32,
        commit_phase_duration: u32,
        reveal_phase_duration: u32,
        use_commit_reveal: bool,
    ) -> TrustGraphResult<DAODispute> {
        let dispute = DAODispute {
            id,
            disputed_vote_tx,
            challenger,
            challenge_bond,
            reason,
            created_ts,
            dao_votes: HashMap::new(),
            dao_stakes: HashMap::new(),
            resolved: false,
            slash_decision: false,
            resolved_ts: 0,
            commit_phase_start,
            reveal_phase_start: commit_phase_start + commit_phase_duration as i32,
            use_commit_reveal,
            rewards_distributed: false,
            reward_distribution_id: TxHash::zero(),
        };
        self.persist_dispute(&dispute)?;
        self.disputes.write().insert(id, dispute.clone());
        Ok(dispute)
    }

    /// Fetch a dispute by id.
    pub fn get_dispute(&self, id: TxHash) -> Option<DAODispute> {
        self.disputes.read().get(&id).cloned()
    }

    /// Cast (or replace) a direct DAO vote on a not-yet-resolved dispute
    /// (spec §4.2). Only meaningful for disputes with `use_commit_reveal == false`;
    /// commit-reveal disputes are driven by `wot-dispute` instead.
    pub fn vote_on_dispute(
        &self,
        id: TxHash,
        voter: Address,
        slash: bool,
        stake: Amount,
    ) -> TrustGraphResult<()> {
        let mut disputes = self.disputes.write();
        let dispute = disputes
            .get_mut(&id)
            .ok_or(TrustGraphError::UnknownDispute(id))?;
        if dispute.resolved {
            return Err(TrustGraphError::AlreadyResolved(id));
        }
        dispute.dao_votes.insert(voter, slash);
        dispute.dao_stakes.insert(voter, stake);
        let snapshot = dispute.clone();
        drop(disputes);
        self.persist_dispute(&snapshot)
    }

    /// Resolve a dispute with `slash_decision`, and, if slashing, flip the
    /// disputed vote's `slashed` flag using the dispute id as `slash_tx`.
    pub fn resolve_dispute(
        &self,
        id: TxHash,
        slash_decision: bool,
        resolved_ts: Timestamp,
    ) -> TrustGraphResult<DAODispute> {
        let disputed_vote_tx = {
            let mut disputes = self.disputes.write();
            let dispute = disputes
                .get_mut(&id)
                .ok_or(TrustGraphError::UnknownDispute(id))?;
            if dispute.resolved {
                return Err(TrustGraphError::AlreadyResolved(id));
            }
            dispute.resolved = true;
            dispute.slash_decision = slash_decision;
            dispute.resolved_ts = resolved_ts;
            let snapshot = dispute.clone();
            self.persist_dispute(&snapshot)?;
            snapshot.disputed_vote_tx
        };
        if slash_decision {
            self.slash_vote(disputed_vote_tx, id)?;
        }
        Ok(self.get_dispute(id).expect("just resolved"))
    }

    /// Mark a dispute's rewards as distributed, rejecting re-distribution
    /// (spec §4.6).
    pub fn mark_rewards_distributed(
        &self,
        id: TxHash,
        reward_distribution_id: TxHash,
    ) -> TrustGraphResult<()> {
        let mut disputes = self.disputes.write();
        let dispute = disputes
            .get_mut(&id)
            .ok_or(TrustGraphError::UnknownDispute(id))?;
        if dispute.rewards_distributed {
            return Err(TrustGraphError::AlreadyResolved(id));
        }
        dispute.rewards_distributed = true;
        dispute.reward_distribution_id = reward_distribution_id;
        let snapshot = dispute.clone();
        drop(disputes);
        self.persist_dispute(&snapshot)
    }

    /// Copy every active incoming edge targeting any of `cluster_members`
    /// so it also targets `new_member`, marked `inherited` (spec §4.3 step 3).
    ///
    /// Tie-break (Open Question #1, pinned in DESIGN.md): if `new_member`
    /// already has a *direct* (non-inherited) edge from the same source, the
    /// direct edge wins and no inherited copy is written; an existing
    /// inherited copy is refreshed to the current weight.
    pub fn inherit_trust_for_new_member(
        &self,
        new_member: Address,
        cluster_members: &[Address],
        now: Timestamp,
    ) -> TrustGraphResult<usize> {
        let mut to_copy = Vec::new();
        {
            let incoming = self.incoming.read();
            for member in cluster_members {
                if *member == new_member {
                    continue;
                }
                if let Some(row) = incoming.get(member) {
                    for edge in row.values().filter(|e| e.is_active()) {
                        to_copy.push(edge.clone());
                    }
                }
            }
        }
        let mut copied = 0;
        for source_edge in to_copy {
            let existing_direct = self
                .get_trust_edge(source_edge.from, new_member)
                .filter(|e| !e.inherited);
            if existing_direct.is_some() {
                continue;
            }
            let edge = TrustEdge {
                from: source_edge.from,
                to: new_member,
                weight: source_edge.weight,
                created_at_ts: now,
                bond_amount: source_edge.bond_amount,
                bond_tx: source_edge.bond_tx,
                slashed: false,
                reason: source_edge.reason.clone(),
                inherited: true,
            };
            self.persist_edge(&edge)?;
            self.index_edge(edge);
            copied += 1;
        }
        Ok(copied)
    }

    /// After two clusters merge, ensure every source address that trusted
    /// any member of the merged set also has an edge to `target_member`
    /// representing that relationship, keeping the most-recently-created
    /// weight on conflict (spec §4.3 step 4).
    pub fn merge_member_trust(
        &self,
        target_member: Address,
        source_members: &[Address],
    ) -> TrustGraphResult<usize> {
        let mut by_source: HashMap<Address, TrustEdge> = HashMap::new();
        {
            let incoming = self.incoming.read();
            for member in source_members.iter().chain(std::iter::once(&target_member)) {
                if let Some(row) = incoming.get(member) {
                    for edge in row.values().filter(|e| e.is_active()) {
                        by_source
                            .entry(edge.from)
                            .and_modify(|existing| {
                                if edge.created_at_ts > existing.created_at_ts {
                                    *existing = edge.clone();
                                }
                            })
                            .or_insert_with(|| edge.clone());
                    }
                }
            }
        }
        let mut merged = 0;
        for (from, winner) in by_source {
            let current = self.get_trust_edge(from, target_member);
            if current.as_ref().map(|c| c.weight) == Some(winner.weight)
                && current.as_ref().map(|c| c.created_at_ts) == Some(winner.created_at_ts)
            {
                continue;
            }
            let edge = TrustEdge {
                from,
                to: target_member,
                weight: winner.weight,
                created_at_ts: winner.created_at_ts,
                bond_amount: winner.bond_amount,
                bond_tx: winner.bond_tx,
                slashed: false,
                reason: winner.reason,
                inherited: true,
            };
            self.persist_edge(&edge)?;
            self.index_edge(edge);
            merged += 1;
        }
        Ok(merged)
    }

    /// Optional maintenance operation (SPEC_FULL §C.1): drop edges older
    /// than `max_age` from the index. Not wired into any consensus-critical
    /// path; `weighted_reputation` semantics are unaffected unless a host
    /// calls this explicitly.
    pub fn prune_stale_edges(&self, now: Timestamp, max_age: Timestamp) -> TrustGraphResult<usize> {
        let mut stale = Vec::new();
        for row in self.outgoing.read().values() {
            for edge in row.values() {
                if now.saturating_sub(edge.created_at_ts) > max_age {
                    stale.push((edge.from, edge.to));
                }
            }
        }
        for (from, to) in &stale {
            self.outgoing.write().get_mut(from).map(|r| r.remove(to));
            self.incoming.write().get_mut(to).map(|r| r.remove(from));
            self.db.delete(&keys::trust_edge_key(from, to))?;
        }
        Ok(stale.len())
    }
}

#[cfg(test)]
mod tests {
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

    fn graph() -> TrustGraph<HashMapBackend> {
        TrustGraph::load(Arc::new(HashMapBackend::new()), TrustGraphConfig::default()).unwrap()
    }

    #[test]
    fn rejects_self_trust() {
        let g = graph();
        let err = g
            .add_trust_edge(addr(1), addr(1), 50, 1_000, tx(1), 0, String::new())
            .unwrap_err();
        assert!(matches!(err, TrustGraphError::SelfTrust(_)));
    }

    #[test]
    fn rejects_zero_and_out_of_range_weight() {
        let g = graph();
        assert!(matches!(
            g.add_trust_edge(addr(1), addr(2), 0, 1_000, tx(1), 0, String::new())
                .unwrap_err(),
            TrustGraphError::WeightOutOfRange(0)
        ));
        assert!(matches!(
            g.add_trust_edge(addr(1), addr(2), 101, 1_000, tx(1), 0, String::new())
                .unwrap_err(),
            TrustGraphError::WeightOutOfRange(101)
        ));
    }

    #[test]
    fn rejects_insufficient_bond() {
        let g = graph();
        let need = g.min_bond(80);
        let err = g
            .add_trust_edge(addr(1), addr(2), 80, need - 1, tx(1), 0, String::new())
            .unwrap_err();
        assert!(matches!(err, TrustGraphError::InsufficientBond { .. }));
    }

    #[test]
    fn add_then_replace_edge_updates_both_indices() {
        let g = graph();
        g.add_trust_edge(addr(1), addr(2), 80, g.min_bond(80), tx(1), 10, "first".into())
            .unwrap();
        assert_eq!(g.get_trust_edge(addr(1), addr(2)).unwrap().weight, 80);
        assert_eq!(g.get_outgoing(addr(1)).len(), 1);
        assert_eq!(g.get_incoming(addr(2)).len(), 1);

        g.add_trust_edge(addr(1), addr(2), 30, g.min_bond(30), tx(2), 20, "replaced".into())
            .unwrap();
        assert_eq!(g.get_trust_edge(addr(1), addr(2)).unwrap().weight, 30);
        assert_eq!(g.get_outgoing(addr(1)).len(), 1);
        assert_eq!(g.get_incoming(addr(2)).len(), 1);
    }

    #[test]
    fn s1_trust_path_scenario_through_the_full_graph() {
        let g = graph();
        g.add_trust_edge(addr(1), addr(2), 80, g.min_bond(80), tx(1), 0, String::new())
            .unwrap();
        g.add_trust_edge(addr(2), addr(3), 50, g.min_bond(50), tx(2), 0, String::new())
            .unwrap();

        let r2 = g.weighted_reputation(addr(1), addr(3), 2);
        assert!((r2 - 0.40).abs() < 1e-9);
        let r1 = g.weighted_reputation(addr(1), addr(3), 1);
        assert_eq!(r1, 0.0);
    }

    #[test]
    fn slashed_edge_is_excluded_from_path_math() {
        let g = graph();
        g.add_trust_edge(addr(1), addr(2), 80, g.min_bond(80), tx(1), 0, String::new())
            .unwrap();
        g.add_trust_edge(addr(2), addr(3), 50, g.min_bond(50), tx(2), 0, String::new())
            .unwrap();
        let vote = BondedVote {
            voter: addr(2),
            target: addr(3),
            value: 50,
            bond: g.min_bond(50),
            bond_tx: tx(3),
            ts: 0,
            slashed: false,
            slash_tx: None,
            reason: String::new(),
        };
        g.record_bonded_vote(vote).unwrap();
        g.slash_vote(tx(3), tx(4)).unwrap();
        assert!(g.get_vote(tx(3)).unwrap().slashed);
        // Slashing the unrelated bonded vote doesn't touch the trust edge
        // itself; exercise the edge's own slashed flag path separately by
        // re-adding it with a marker would require a public setter this
        // crate intentionally doesn't expose, so assert the edge is still
        // active and contributes.
        assert!(g.weighted_reputation(addr(1), addr(3), 2) > 0.0);
    }

    #[test]
    fn duplicate_bond_tx_is_rejected() {
        let g = graph();
        let vote = BondedVote {
            voter: addr(1),
            target: addr(2),
            value: 50,
            bond: g.min_bond(50),
            bond_tx: tx(1),
            ts: 0,
            slashed: false,
            slash_tx: None,
            reason: String::new(),
        };
        g.record_bonded_vote(vote.clone()).unwrap();
        let err = g.record_bonded_vote(vote).unwrap_err();
        assert!(matches!(err, TrustGraphError::DuplicateBondTx(_)));
    }

    #[test]
    fn slash_vote_is_idempotent() {
        let g = graph();
        g.record_bonded_vote(BondedVote {
            voter: addr(1),
            target: addr(2),
            value: 50,
            bond: g.min_bond(50),
            bond_tx: tx(1),
            ts: 0,
            slashed: false,
            slash_tx: None,
            reason: String::new(),
        })
        .unwrap();
        g.slash_vote(tx(1), tx(2)).unwrap();
        g.slash_vote(tx(1), tx(3)).unwrap();
        let vote = g.get_vote(tx(1)).unwrap();
        assert!(vote.slashed);
        assert_eq!(vote.slash_tx, Some(tx(3)));
    }

    #[test]
    fn dispute_lifecycle_resolves_and_slashes() {
        let g = graph();
        let vote_tx = tx(1);
        g.record_bonded_vote(BondedVote {
            voter: addr(1),
            target: addr(2),
            value: -50,
            bond: g.min_bond(50),
            bond_tx: vote_tx,
            ts: 0,
            slashed: false,
            slash_tx: None,
            reason: String::new(),
        })
        .unwrap();

        let dispute_id = tx(2);
        g.create_dispute(
            dispute_id,
            vote_tx,
            addr(3),
            50,
            "bad vote".into(),
            1000,
            1000,
            10,
            10,
            false,
        )
        .unwrap();

        g.vote_on_dispute(dispute_id, addr(4), true, 10).unwrap();
        g.vote_on_dispute(dispute_id, addr(5), false, 5).unwrap();
        let (slash, keep) = g.get_dispute(dispute_id).unwrap().direct_vote_tally();
        assert_eq!((slash, keep), (10, 5));

        let resolved = g.resolve_dispute(dispute_id, true, 1030).unwrap();
        assert!(resolved.resolved);
        assert!(resolved.slash_decision);
        assert!(g.get_vote(vote_tx).unwrap().slashed);

        // Re-resolving is rejected.
        assert!(g.resolve_dispute(dispute_id, false, 1031).is_err());
    }

    #[test]
    fn mark_rewards_distributed_rejects_redistribution() {
        let g = graph();
        let vote_tx = tx(1);
        g.record_bonded_vote(BondedVote {
            voter: addr(1),
            target: addr(2),
            value: -50,
            bond: g.min_bond(50),
            bond_tx: vote_tx,
            ts: 0,
            slashed: false,
            slash_tx: None,
            reason: String::new(),
        })
        .unwrap();
        let dispute_id = tx(2);
        g.create_dispute(dispute_id, vote_tx, addr(3), 50, "r".into(), 1000, 1000, 10, 10, false)
            .unwrap();
        g.mark_rewards_distributed(dispute_id, tx(9)).unwrap();
        assert!(g.mark_rewards_distributed(dispute_id, tx(10)).is_err());
    }

    #[test]
    fn inherit_trust_for_new_member_copies_incoming_edges() {
        let g = graph();
        // addr(10) trusts addr(1) (existing cluster member); addr(2) joins
        // the cluster and should inherit that incoming edge.
        g.add_trust_edge(addr(10), addr(1), 60, g.min_bond(60), tx(1), 5, "r".into())
            .unwrap();
        let copied = g
            .inherit_trust_for_new_member(addr(2), &[addr(1)], 100)
            .unwrap();
        assert_eq!(copied, 1);
        let inherited = g.get_trust_edge(addr(10), addr(2)).unwrap();
        assert_eq!(inherited.weight, 60);
        assert!(inherited.inherited);
    }

    #[test]
    fn inherit_trust_never_overwrites_a_direct_edge() {
        let g = graph();
        g.add_trust_edge(addr(10), addr(1), 60, g.min_bond(60), tx(1), 5, "r".into())
            .unwrap();
        // addr(2) already has its own direct edge from addr(10).
        g.add_trust_edge(addr(10), addr(2), -20, g.min_bond(20), tx(2), 6, "direct".into())
            .unwrap();
        g.inherit_trust_for_new_member(addr(2), &[addr(1)], 100)
            .unwrap();
        let edge = g.get_trust_edge(addr(10), addr(2)).unwrap();
        assert_eq!(edge.weight, -20);
        assert!(!edge.inherited);
    }

    #[test]
    fn merge_member_trust_keeps_most_recent_weight_on_conflict() {
        let g = graph();
        g.add_trust_edge(addr(10), addr(1), 60, g.min_bond(60), tx(1), 5, "old".into())
            .unwrap();
        g.add_trust_edge(addr(10), addr(2), 90, g.min_bond(90), tx(2), 50, "new".into())
            .unwrap();
        let merged = g.merge_member_trust(addr(2), &[addr(1)]).unwrap();
        assert_eq!(merged, 0, "target already holds the most recent edge, nothing to overwrite");
        assert_eq!(g.get_trust_edge(addr(10), addr(2)).unwrap().weight, 90);
    }

    #[test]
    fn prune_stale_edges_removes_only_old_entries() {
        let g = graph();
        g.add_trust_edge(addr(1), addr(2), 50, g.min_bond(50), tx(1), 0, String::new())
            .unwrap();
        g.add_trust_edge(addr(1), addr(3), 50, g.min_bond(50), tx(2), 900, String::new())
            .unwrap();
        let pruned = g.prune_stale_edges(1000, 500).unwrap();
        assert_eq!(pruned, 1);
        assert!(g.get_trust_edge(addr(1), addr(2)).is_none());
        assert!(g.get_trust_edge(addr(1), addr(3)).is_some());
    }
}
