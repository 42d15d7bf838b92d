//! Cluster-aware trust query (spec C4): anti-evasion minimum-across-cluster
//! reputation.

use wot_storage::Database;
use wot_trust_graph::TrustGraph;
use wot_types::Address;

use crate::clusterer::WalletClusterer;

/// Global (viewer-less) reputation for an address: sum of `weight/100` over
/// every active incoming edge (spec §4.4: "global sum over incoming edges").
pub fn global_reputation<D: Database>(trust_graph: &TrustGraph<D>, target: Address) -> f64 {
    trust_graph
        .get_incoming(target)
        .into_iter()
        .filter(|e| e.is_active())
        .map(|e| f64::from(e.weight) / 100.0)
        .sum()
}

fn member_score<D: Database>(trust_graph: &TrustGraph<D>, viewer: Option<Address>, member: Address) -> f64 {
    match viewer {
        Some(v) => trust_graph.weighted_reputation(v, member, wot_trust_graph::DEFAULT_MAX_DEPTH),
        None => global_reputation(trust_graph, member),
    }
}

/// Minimum effective trust across `target`'s cluster: an actor cannot dodge
/// negative reputation by moving funds to a fresh address in the same
/// wallet (spec §4.4, §8 property 3).
pub fn effective_trust<S: Database, D: Database>(
    clusterer: &WalletClusterer<S>,
    trust_graph: &TrustGraph<D>,
    target: Address,
    viewer: Option<Address>,
) -> f64 {
    let cluster_id = clusterer.find(target);
    let members = clusterer.members_of(cluster_id);
    members
        .into_iter()
        .map(|m| member_score(trust_graph, viewer, m))
        .fold(f64::INFINITY, f64::min)
}

/// Whether any member of `address`'s cluster has global reputation `< 0`.
pub fn has_negative_cluster_trust<S: Database, D: Database>(
    clusterer: &WalletClusterer<S>,
    trust_graph: &TrustGraph<D>,
    address: Address,
) -> bool {
    let cluster_id = clusterer.find(address);
    clusterer
        .members_of(cluster_id)
        .into_iter()
        .any(|m| global_reputation(trust_graph, m) < 0.0)
}

/// The cluster member with the lowest global reputation, and that score.
pub fn worst_cluster_member<S: Database, D: Database>(
    clusterer: &WalletClusterer<S>,
    trust_graph: &TrustGraph<D>,
    address: Address,
) -> (Address, f64) {
    let cluster_id = clusterer.find(address);
    clusterer
        .members_of(cluster_id)
        .into_iter()
        .map(|m| (m, global_reputation(trust_graph, m)))
        .fold((address, f64::INFINITY), |acc, candidate| {
            if candidate.1 < acc.1 {
                candidate
            } else {
                acc
            }
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wot_config::TrustGraphConfig;
    use wot_storage::backends::hashmap::HashMapBackend;
    use wot_types::TxHash;

    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    #[test]
    fn effective_trust_is_minimum_across_cluster() {
        let trust_graph = TrustGraph::load(
            Arc::new(HashMapBackend::new()),
            TrustGraphConfig::default(),
        )
        .unwrap();
        let clusterer = WalletClusterer::load(Arc::new(HashMapBackend::new())).unwrap();

        // viewer=addr(0) trusts addr(1) at +80 and addr(2) at -50.
        trust_graph
            .add_trust_edge(addr(0), addr(1), 80, 10_000, TxHash::zero(), 0, String::new())
            .unwrap();
        let mut slashable = TxHash::zero();
        slashable.0[0] = 1;
        trust_graph
            .add_trust_edge(addr(0), addr(2), -50, 10_000, slashable, 0, String::new())
            .unwrap();

        // addr(1) and addr(2) are the same wallet cluster.
        clusterer.union(addr(1), addr(2)).unwrap();

        let trust = effective_trust(&clusterer, &trust_graph, addr(1), Some(addr(0)));
        assert!((trust - (-0.50)).abs() < 1e-9);
    }

    #[test]
    fn has_negative_cluster_trust_detects_any_member() {
        let trust_graph = TrustGraph::load(
            Arc::new(HashMapBackend::new()),
            TrustGraphConfig::default(),
        )
        .unwrap();
        let clusterer = WalletClusterer::load(Arc::new(HashMapBackend::new())).unwrap();

        let mut bad_tx = TxHash::zero();
        bad_tx.0[0] = 1;
        trust_graph
            .add_trust_edge(addr(9), addr(2), -90, 10_000, bad_tx, 0, String::new())
            .unwrap();
        clusterer.union(addr(1), addr(2)).unwrap();

        assert!(has_negative_cluster_trust(&clusterer, &trust_graph, addr(1)));
    }
}
