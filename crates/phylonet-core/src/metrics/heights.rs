//! Shortest path between the parents of a reticulation, and reticulation
//! heights.
//!
//! For each reticulation `r`, an upward BFS from every parent `u_i` gives
//! `d_i(a)`, the length of the shortest path from ancestor `a` down to
//! `u_i`. Vertices with a distance to every parent are common ancestors;
//! only the Pareto-minimal ones are kept (no other common ancestor is at
//! least as close to every parent and strictly closer to one). Over those
//! lowest common ancestors:
//!
//! | invariant | per reticulation                   | network |
//! |-----------|------------------------------------|---------|
//! | `sp`      | min over ancestors of `Σ d_i`      | max     |
//! | `srh`     | min over ancestors of `min_i d_i`  | max     |
//! | `brh`     | max over ancestors of `max_i d_i`  | max     |
//!
//! The three share one traversal.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::network::Network;

const UNREACHED: usize = usize::MAX;

/// The three height invariants of a network (all 0 without reticulations).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReticulationHeights {
    pub shortest_path: usize,
    pub small_height: usize,
    pub big_height: usize,
}

impl ReticulationHeights {
    /// Compute all three invariants.
    #[must_use]
    #[instrument(skip_all)]
    pub fn compute(network: &Network) -> Self {
        let mut heights = Self::default();
        for &r in network.reticulations() {
            let lowest = lowest_common_ancestors(network, r);
            let sp = lowest.iter().map(|d| d.iter().sum::<usize>()).min();
            let srh = lowest.iter().filter_map(|d| d.iter().copied().min()).min();
            let brh = lowest.iter().filter_map(|d| d.iter().copied().max()).max();
            debug!(
                reticulation = network.label(r),
                ancestors = lowest.len(),
                sp,
                srh,
                brh,
                "lowest common ancestors"
            );
            heights.shortest_path = heights.shortest_path.max(sp.unwrap_or(0));
            heights.small_height = heights.small_height.max(srh.unwrap_or(0));
            heights.big_height = heights.big_height.max(brh.unwrap_or(0));
        }
        heights
    }
}

/// Distance vectors of the Pareto-minimal common ancestors of the parents
/// of `r`.
fn lowest_common_ancestors(network: &Network, r: NodeIndex) -> Vec<Vec<usize>> {
    let parents: Vec<NodeIndex> = network.parents(r).collect();
    let distances: Vec<Vec<usize>> = parents
        .iter()
        .map(|&p| upward_distances(network, p))
        .collect();

    let mut common: Vec<Vec<usize>> = network
        .vertices()
        .filter(|v| distances.iter().all(|d| d[v.index()] != UNREACHED))
        .map(|v| distances.iter().map(|d| d[v.index()]).collect())
        .collect();

    // A dominating vector has a strictly smaller sum, so it is seen first.
    common.sort_by_key(|d: &Vec<usize>| d.iter().sum::<usize>());
    let mut minimal: Vec<Vec<usize>> = Vec::new();
    for candidate in common {
        if !minimal.iter().any(|m| dominates(m, &candidate)) {
            minimal.push(candidate);
        }
    }
    minimal
}

/// `a` is componentwise `<=` `b` and differs somewhere.
fn dominates(a: &[usize], b: &[usize]) -> bool {
    a.iter().zip(b).all(|(x, y)| x <= y) && a != b
}

/// BFS over parents from `start`; `UNREACHED` for non-ancestors.
fn upward_distances(network: &Network, start: NodeIndex) -> Vec<usize> {
    let mut dist = vec![UNREACHED; network.vertex_count()];
    dist[start.index()] = 0;
    let mut queue = VecDeque::from([start]);
    while let Some(u) = queue.pop_front() {
        let next = dist[u.index()] + 1;
        for p in network.parents(u) {
            if dist[p.index()] == UNREACHED {
                dist[p.index()] = next;
                queue.push_back(p);
            }
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heights(edges: &[(&str, &str)]) -> ReticulationHeights {
        let n = Network::from_edges(edges.iter().copied()).expect("valid network");
        ReticulationHeights::compute(&n)
    }

    #[test]
    fn tree_is_all_zero() {
        assert_eq!(
            heights(&[("r", "a"), ("r", "b"), ("a", "x"), ("a", "y")]),
            ReticulationHeights::default()
        );
    }

    #[test]
    fn gall_meets_at_the_root() {
        let h = heights(&[
            ("r", "a"),
            ("r", "b"),
            ("a", "h"),
            ("b", "h"),
            ("h", "x"),
            ("a", "y"),
            ("b", "z"),
        ]);
        assert_eq!(
            h,
            ReticulationHeights {
                shortest_path: 2,
                small_height: 1,
                big_height: 1,
            }
        );
    }

    #[test]
    fn uneven_sides() {
        // Left path r → a1 → a2 → h, right path r → b → h.
        let h = heights(&[
            ("r", "a1"),
            ("r", "b"),
            ("a1", "a2"),
            ("a1", "x1"),
            ("a2", "h"),
            ("a2", "x2"),
            ("b", "h"),
            ("b", "y"),
            ("h", "z"),
        ]);
        assert_eq!(h.shortest_path, 3);
        assert_eq!(h.small_height, 1);
        assert_eq!(h.big_height, 2);
    }

    #[test]
    fn parent_above_other_parent() {
        // a is both a parent of h and the parent of b.
        let h = heights(&[
            ("r", "a"),
            ("r", "w"),
            ("a", "b"),
            ("a", "h"),
            ("b", "h"),
            ("b", "x"),
            ("h", "y"),
        ]);
        // Only a is a lowest common ancestor: (0, 1).
        assert_eq!(h.shortest_path, 1);
        assert_eq!(h.small_height, 0);
        assert_eq!(h.big_height, 1);
    }

    #[test]
    fn incomparable_ancestors_are_both_kept() {
        assert!(!dominates(&[1, 3], &[2, 2]));
        assert!(!dominates(&[2, 2], &[1, 3]));
        assert!(dominates(&[1, 2], &[1, 3]));
        assert!(!dominates(&[1, 2], &[1, 2]));
    }
}
