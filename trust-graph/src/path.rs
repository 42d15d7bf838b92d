//! Personalized weighted-path reputation (spec §4.2, §8 property 1, §9
//! "Path search under ownership rules": "DFS uses an explicit `visited: set<A>`
//! and an explicit `current_path: vec<(A, i16)>` both carried into recursion
//! ... no back-pointers needed").

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use wot_types::Address;

/// One simple path from a viewer to a target: the sequence of `(hop, weight)`
/// pairs traversed, viewer-exclusive, target-inclusive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrustPath {
    /// Hops in traversal order: `(address, edge weight into that address)`.
    pub hops: Vec<(Address, i16)>,
}

impl TrustPath {
    /// Product-of-weights contribution of this path to `weighted_reputation`
    /// (spec §4.2: "sums ∏(hop_weights/100) over all simple paths").
    pub fn contribution(&self) -> f64 {
        self.hops
            .iter()
            .map(|(_, w)| f64::from(*w) / 100.0)
            .product()
    }

    /// Number of hops (edges) in this path.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Whether this path has zero hops (not a valid path; kept for symmetry).
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }
}

/// Enumerate every simple path from `from` to `to` with length in
/// `1..=max_depth`, via `adjacency`, which must return a node's active
/// outgoing `(to, weight)` edges already sorted by `to` (spec §4.2: "children
/// visited in sorted-by-`to` order so every node computes the same result").
///
/// Self-loops are impossible by construction (the visited set rules them
/// out); slashed edges are expected to already be filtered out of whatever
/// `adjacency` returns.
pub fn find_paths<F>(from: Address, to: Address, max_depth: u32, adjacency: &F) -> Vec<TrustPath>
where
    F: Fn(Address) -> Vec<(Address, i16)>,
{
    let mut results = Vec::new();
    let mut visited = HashSet::new();
    let mut current = Vec::new();
    visited.insert(from);
    dfs(from, to, max_depth, adjacency, &mut visited, &mut current, &mut results);
    results
}

fn dfs<F>(
    at: Address,
    target: Address,
    remaining_depth: u32,
    adjacency: &F,
    visited: &mut HashSet<Address>,
    current: &mut Vec<(Address, i16)>,
    results: &mut Vec<TrustPath>,
) where
    F: Fn(Address) -> Vec<(Address, i16)>,
{
    if remaining_depth == 0 {
        return;
    }
    for (next, weight) in adjacency(at) {
        if visited.contains(&next) {
            continue;
        }
        current.push((next, weight));
        if next == target {
            results.push(TrustPath {
                hops: current.clone(),
            });
        } else {
            visited.insert(next);
            dfs(
                next,
                target,
                remaining_depth - 1,
                adjacency,
                visited,
                current,
                results,
            );
            visited.remove(&next);
        }
        current.pop();
    }
}

/// Sum of every simple path's contribution, `0.0` if no path exists (spec §4.2).
pub fn weighted_reputation<F>(from: Address, to: Address, max_depth: u32, adjacency: &F) -> f64
where
    F: Fn(Address) -> Vec<(Address, i16)>,
{
    if from == to {
        return 0.0;
    }
    find_paths(from, to, max_depth, adjacency)
        .iter()
        .map(TrustPath::contribution)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    /// A -> B (80), B -> C (50), A -> C (not direct).
    fn adjacency(at: Address) -> Vec<(Address, i16)> {
        if at == addr(1) {
            vec![(addr(2), 80)]
        } else if at == addr(2) {
            vec![(addr(3), 50)]
        } else {
            vec![]
        }
    }

    #[test]
    fn s1_trust_path_scenario() {
        // S1: weighted_reputation(A, C, max_depth=2) == 0.40
        let r = weighted_reputation(addr(1), addr(3), 2, &adjacency);
        assert!((r - 0.40).abs() < 1e-9);

        // weighted_reputation(A, C, max_depth=1) == 0.0 (no direct edge)
        let r1 = weighted_reputation(addr(1), addr(3), 1, &adjacency);
        assert_eq!(r1, 0.0);
    }

    #[test]
    fn no_path_returns_zero() {
        let r = weighted_reputation(addr(9), addr(3), 3, &adjacency);
        assert_eq!(r, 0.0);
    }

    #[test]
    fn self_loop_excluded() {
        let r = weighted_reputation(addr(1), addr(1), 3, &adjacency);
        assert_eq!(r, 0.0);
    }

    #[test]
    fn sums_over_multiple_distinct_paths() {
        // A trusts B (50) and D (50); both B and D trust C (50).
        fn adj(at: Address) -> Vec<(Address, i16)> {
            if at == addr(1) {
                vec![(addr(2), 50), (addr(4), 50)]
            } else if at == addr(2) || at == addr(4) {
                vec![(addr(3), 50)]
            } else {
                vec![]
            }
        }
        let r = weighted_reputation(addr(1), addr(3), 2, &adj);
        // 0.5*0.5 + 0.5*0.5 = 0.5
        assert!((r - 0.5).abs() < 1e-9);
    }

    #[test]
    fn cycles_do_not_cause_infinite_recursion() {
        fn adj(at: Address) -> Vec<(Address, i16)> {
            if at == addr(1) {
                vec![(addr(2), 50)]
            } else if at == addr(2) {
                vec![(addr(1), 50), (addr(3), 50)]
            } else {
                vec![]
            }
        }
        let r = weighted_reputation(addr(1), addr(3), 5, &adj);
        assert!((r - 0.25).abs() < 1e-9);
    }
}
