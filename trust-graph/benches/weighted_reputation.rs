//! Micro-benchmark for `weighted_reputation` over a synthetic chain graph,
//! mirroring the teacher's `reputation/benches/trs.rs` convention.

use std::sync::Arc;

use bencher::{benchmark_group, benchmark_main, Bencher};

use wot_config::TrustGraphConfig;
use wot_storage::backends::hashmap::HashMapBackend;
use wot_trust_graph::TrustGraph;
use wot_types::{Address, TxHash};

fn addr(i: u32) -> Address {
    let mut bytes = [0u8; 20];
    bytes[..4].copy_from_slice(&i.to_le_bytes());
    Address(bytes)
}

fn tx(i: u32) -> TxHash {
    let mut bytes = [0u8; 32];
    bytes[..4].copy_from_slice(&i.to_le_bytes());
    TxHash(bytes)
}

fn build_chain(len: u32) -> TrustGraph<HashMapBackend> {
    let graph = TrustGraph::load(Arc::new(HashMapBackend::new()), TrustGraphConfig::default())
        .expect("in-memory graph never fails to load");
    for i in 0..len {
        graph
            .add_trust_edge(addr(i), addr(i + 1), 80, 10_000, tx(i), 0, String::new())
            .expect("well-formed edge");
    }
    graph
}

fn weighted_reputation_depth_3(bench: &mut Bencher) {
    let graph = build_chain(50);
    bench.iter(|| graph.weighted_reputation(addr(0), addr(3), 3));
}

benchmark_group!(benches, weighted_reputation_depth_3);
benchmark_main!(benches);
