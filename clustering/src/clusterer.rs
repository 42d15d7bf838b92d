//! Wallet clusterer + cluster-update handler (spec C3).
//!
//! Co-control is inferred from the shared-input heuristic: every address
//! whose UTXOs are spent by the same transaction is assumed to be
//! controlled by one wallet. Membership is maintained with a union-find
//! structure; merging always keeps the *smaller* address as the surviving
//! cluster id (spec §3 `WalletCluster` invariant: "merging two clusters
//! yields a single cluster whose id is the smaller of the two" — this also
//! resolves spec §4.3's looser "smaller id absorbing into the larger id (or
//! the lower id, choice fixed and stable)" phrasing; see DESIGN.md).

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use wot_storage::Database;
use wot_trust_graph::TrustGraph;
use wot_types::{Address, BlockHeight, Timestamp, Transaction};

use crate::error::{ClusteringError, ClusteringResult};
use crate::events::{ClusterEventKind, ClusterUpdateEvent};
use crate::keys;

/// Number of attempts `inherit_trust_for_new_member` is retried on transient
/// failure before surfacing the error (spec §4.3 step 3).
const MAX_INHERIT_ATTEMPTS: u32 = 3;

/// A queryable view of one wallet cluster (spec §3 `WalletCluster`).
#[derive(Debug, Clone)]
pub struct WalletCluster {
    /// Canonical id: the smaller member address.
    pub id: Address,
    /// Every address in the cluster, including `id`.
    pub members: HashSet<Address>,
    /// Confidence this clustering is correct. The shared-input heuristic
    /// alone is taken as certain (`1.0`); a host free to add weaker signals
    /// can lower this per-cluster.
    pub confidence: f64,
}

/// The outcome of processing one block's transactions through the clusterer.
#[derive(Debug, Default, Clone)]
pub struct ClusterUpdateSummary {
    /// Events produced, in the order they were emitted.
    pub events: Vec<ClusterUpdateEvent>,
}

/// Union-find wallet clusterer, backed by a `Database` for the
/// `cluster_member_{addr}` records (spec §6).
pub struct WalletClusterer<S: Database> {
    db: Arc<S>,
    /// address -> parent address (path-compressed union-find).
    parent: RwLock<HashMap<Address, Address>>,
    event_seq: AtomicU64,
}

impl<S: Database> WalletClusterer<S> {
    /// Build a clusterer backed by `db`, replaying persisted memberships.
    pub fn load(db: Arc<S>) -> ClusteringResult<Self> {
        let clusterer = WalletClusterer {
            db,
            parent: RwLock::new(HashMap::new()),
            event_seq: AtomicU64::new(0),
        };
        clusterer.reload()?;
        Ok(clusterer)
    }

    fn reload(&self) -> ClusteringResult<()> {
        for (key, value) in self.db.list_prefix(&keys::cluster_member_prefix())? {
            let (addr, cluster_id): (Address, Address) =
                bincode::deserialize(&value).map_err(|e| ClusteringError::Decode {
                    key: String::from_utf8_lossy(&key).into_owned(),
                    msg: e.to_string(),
                })?;
            self.parent.write().insert(addr, cluster_id);
        }
        Ok(())
    }

    fn persist_membership(&self, addr: Address, cluster_id: Address) -> ClusteringResult<()> {
        let bytes = bincode::serialize(&(addr, cluster_id)).expect("always serializable");
        self.db.write(&keys::cluster_member_key(&addr), bytes)?;
        Ok(())
    }

    /// Find the current cluster id for `addr`, with path compression.
    /// Addresses never before observed are their own (singleton) cluster.
    pub fn find(&self, addr: Address) -> Address {
        let mut root = addr;
        loop {
            let next = self.parent.read().get(&root).copied();
            match next {
                Some(p) if p != root => root = p,
                _ => break,
            }
        }
        // Path compression: point every visited node directly at the root.
        let mut at = addr;
        while at != root {
            let next = self.parent.read().get(&at).copied().unwrap_or(at);
            self.parent.write().insert(at, root);
            at = next;
        }
        root
    }

    /// All members whose root is `cluster_id` (linear scan; clusters are
    /// expected to be small relative to the whole address space).
    pub fn members_of(&self, cluster_id: Address) -> Vec<Address> {
        let candidates: Vec<Address> = self.parent.read().keys().copied().collect();
        let root = self.find(cluster_id);
        let mut members: Vec<Address> = candidates
            .into_iter()
            .filter(|a| self.find(*a) == root)
            .collect();
        if !members.contains(&cluster_id) {
            members.push(cluster_id);
        }
        members.sort();
        members.dedup();
        members
    }

    /// Union `a` and `b`'s clusters, surviving id = smaller address.
    /// Returns `Some((surviving, absorbed))` if this actually merged two
    /// previously-distinct clusters, `None` if they were already the same.
    /// Build a [`WalletCluster`] view for the cluster containing `addr`.
    pub fn cluster_view(&self, addr: Address) -> WalletCluster {
        let id = self.find(addr);
        WalletCluster {
            id,
            members: self.members_of(id).into_iter().collect(),
            confidence: 1.0,
        }
    }

    /// Union the clusters containing `a` and `b`, the smaller root
    /// surviving (spec §3: "merging two clusters yields a single cluster
    /// whose id is the smaller of the two"). Returns `None` if they were
    /// already in the same cluster.
    pub fn union(&self, a: Address, b: Address) -> ClusteringResult<Option<(Address, Address)>> {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return Ok(None);
        }
        let (surviving, absorbed) = if root_a < root_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parent.write().insert(absorbed, surviving);
        self.persist_membership(absorbed, surviving)?;
        // Keep the surviving root's own membership row up to date too, so a
        // fresh `reload()` sees it even if it was never written before.
        self.persist_membership(surviving, surviving)?;
        Ok(Some((surviving, absorbed)))
    }

    fn next_seq(&self) -> u64 {
        self.event_seq.fetch_add(1, Ordering::Relaxed)
    }

    fn persist_event(&self, event: &ClusterUpdateEvent) -> ClusteringResult<()> {
        let bytes = bincode::serialize(event).expect("always serializable");
        let key = keys::cluster_event_key(event.ts, event.block_height, event.kind, self.next_seq());
        self.db.write(&key, bytes)?;
        Ok(())
    }

    /// Process one block's transactions: detect new members and cluster
    /// merges from the shared-input heuristic, union the affected clusters,
    /// inherit trust onto new members, and combine trust on merges (spec
    /// §4.3 "Update handler, per block").
    pub fn process_block<D: Database>(
        &self,
        trust_graph: &TrustGraph<D>,
        txs: &[Transaction],
        block_height: BlockHeight,
        now: Timestamp,
    ) -> ClusteringResult<ClusterUpdateSummary> {
        let mut summary = ClusterUpdateSummary::default();
        let mut seen_merge_pairs: HashSet<(Address, Address)> = HashSet::new();

        for tx in txs {
            if tx.is_coinbase || tx.input_addresses.len() < 2 {
                continue;
            }

            // Snapshot prior cluster ids before unioning, to detect both new
            // members and merges relative to pre-tx state (spec §4.3 steps 1-2).
            let mut prior_clusters: HashMap<Address, Address> = HashMap::new();
            let mut is_new: HashMap<Address, bool> = HashMap::new();
            for addr in &tx.input_addresses {
                let known_before = self.parent.read().contains_key(addr);
                prior_clusters.insert(*addr, self.find(*addr));
                is_new.insert(*addr, !known_before);
            }

            let distinct_clusters: HashSet<Address> = prior_clusters.values().copied().collect();
            let is_merge = distinct_clusters.len() >= 2;

            // Union everything onto the first address's cluster.
            let anchor = tx.input_addresses[0];
            for addr in &tx.input_addresses[1..] {
                if let Some((surviving, absorbed)) = self.union(anchor, *addr)? {
                    let pair = if surviving < absorbed {
                        (surviving, absorbed)
                    } else {
                        (absorbed, surviving)
                    };
                    if is_merge && seen_merge_pairs.insert(pair) {
                        let event = ClusterUpdateEvent {
                            kind: ClusterEventKind::ClusterMerge,
                            cluster_id: surviving,
                            affected_address: absorbed,
                            merged_from: Some(absorbed),
                            block_height,
                            ts: now,
                            inherited_edge_count: 0,
                        };
                        self.persist_event(&event)?;
                        summary.events.push(event);

                        let members = self.members_of(surviving);
                        trust_graph.merge_member_trust(surviving, &members)?;
                    }
                }
            }

            let final_cluster = self.find(anchor);
            for addr in &tx.input_addresses {
                if *is_new.get(addr).unwrap_or(&false) {
                    let event = ClusterUpdateEvent {
                        kind: ClusterEventKind::NewMember,
                        cluster_id: final_cluster,
                        affected_address: *addr,
                        merged_from: None,
                        block_height,
                        ts: now,
                        inherited_edge_count: 0,
                    };
                    self.persist_event(&event)?;
                    summary.events.push(event);

                    let members = self.members_of(final_cluster);
                    let mut attempts = 0;
                    let copied = loop {
                        attempts += 1;
                        match trust_graph.inherit_trust_for_new_member(*addr, &members, now) {
                            Ok(count) => break count,
                            Err(e) if attempts < MAX_INHERIT_ATTEMPTS => {
                                warn!(
                                    "trust inheritance for {} failed (attempt {}): {}",
                                    addr, attempts, e
                                );
                                continue;
                            }
                            Err(e) => {
                                return Err(ClusteringError::InheritanceFailed(
                                    *addr,
                                    attempts,
                                    e.to_string(),
                                ));
                            }
                        }
                    };
                    let inherited_event = ClusterUpdateEvent {
                        kind: ClusterEventKind::TrustInherited,
                        cluster_id: final_cluster,
                        affected_address: *addr,
                        merged_from: None,
                        block_height,
                        ts: now,
                        inherited_edge_count: copied as u32,
                    };
                    self.persist_event(&inherited_event)?;
                    summary.events.push(inherited_event);
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wot_config::TrustGraphConfig;
    use wot_storage::backends::hashmap::HashMapBackend;
    use wot_types::{Address, Transaction, TxHash};

    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    fn tx_spending(inputs: &[Address]) -> Transaction {
        Transaction {
            hash: TxHash::zero(),
            input_addresses: inputs.to_vec(),
            op_return_outputs: vec![],
            is_coinbase: false,
        }
    }

    #[test]
    fn unclustered_address_is_its_own_cluster() {
        let clusterer = WalletClusterer::load(Arc::new(HashMapBackend::new())).unwrap();
        assert_eq!(clusterer.find(addr(1)), addr(1));
    }

    #[test]
    fn union_keeps_smaller_address_as_surviving_id() {
        let clusterer = WalletClusterer::load(Arc::new(HashMapBackend::new())).unwrap();
        clusterer.union(addr(5), addr(2)).unwrap();
        assert_eq!(clusterer.find(addr(5)), addr(2));
        assert_eq!(clusterer.find(addr(2)), addr(2));
    }

    #[test]
    fn s2_cluster_absorption_scenario() {
        // Tx1 spends from X1(=addr(10)), X2(=addr(20)); tx2 spends from
        // X2, Y1(=addr(30)).
        let trust_graph = TrustGraph::load(
            Arc::new(HashMapBackend::new()),
            TrustGraphConfig::default(),
        )
        .unwrap();
        let clusterer = WalletClusterer::load(Arc::new(HashMapBackend::new())).unwrap();

        let txs = vec![
            tx_spending(&[addr(10), addr(20)]),
            tx_spending(&[addr(20), addr(30)]),
        ];
        let summary = clusterer
            .process_block(&trust_graph, &txs, 1, 1_000)
            .unwrap();

        assert_eq!(clusterer.find(addr(10)), clusterer.find(addr(20)));
        assert_eq!(clusterer.find(addr(20)), clusterer.find(addr(30)));

        let merges = summary
            .events
            .iter()
            .filter(|e| e.kind == ClusterEventKind::ClusterMerge)
            .count();
        assert_eq!(merges, 1, "exactly one ClusterMerge event, not two");
    }

    #[test]
    fn new_member_inherits_trust_from_existing_cluster_member() {
        let trust_graph = TrustGraph::load(
            Arc::new(HashMapBackend::new()),
            TrustGraphConfig::default(),
        )
        .unwrap();
        let clusterer = WalletClusterer::load(Arc::new(HashMapBackend::new())).unwrap();

        trust_graph
            .add_trust_edge(addr(99), addr(10), 70, 10_000, TxHash::zero(), 0, String::new())
            .unwrap();

        let txs = vec![tx_spending(&[addr(10), addr(20)])];
        clusterer.process_block(&trust_graph, &txs, 1, 1_000).unwrap();

        let inherited = trust_graph.get_trust_edge(addr(99), addr(20));
        assert!(inherited.is_some());
        assert_eq!(inherited.unwrap().weight, 70);
    }

    #[test]
    fn reload_reconstructs_union_find_state() {
        let db = Arc::new(HashMapBackend::new());
        {
            let clusterer = WalletClusterer::load(db.clone()).unwrap();
            clusterer.union(addr(10), addr(20)).unwrap();
        }
        let reloaded = WalletClusterer::load(db).unwrap();
        assert_eq!(reloaded.find(addr(10)), reloaded.find(addr(20)));
    }
}
