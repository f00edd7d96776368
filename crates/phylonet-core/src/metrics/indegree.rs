//! Maximum in-degree of the reticulation subgraph.
//!
//! Contract every arc between two reticulations. Each connected component
//! of reticulations becomes one vertex; its in-degree is the number of arcs
//! entering the component from tree vertices.
//!
//! ```text
//!   a   b   c
//!    \ /    |
//!     h1    |      h1 → h2 is contracted:
//!      \   /       {h1, h2} has 3 incoming arcs
//!       h2
//! ```
//!
//! A sweep from the root accumulates this "collective in-degree": a
//! reticulation receives 1 per tree parent and the full accumulated value
//! of each reticulation parent. A vertex is visited once all of its parents
//! have been.

use std::collections::VecDeque;

use tracing::debug;

use crate::network::Network;

/// Largest collective in-degree of any reticulation component, or 0 if the
/// network has no reticulation.
#[must_use]
pub fn max_reticulation_subgraph_indegree(network: &Network) -> usize {
    let n = network.vertex_count();
    let mut collective = vec![0usize; n];
    let mut parents_seen = vec![0usize; n];

    let mut frontier = VecDeque::from([network.root()]);
    while let Some(v) = frontier.pop_front() {
        let incoming = if network.is_reticulation(v) {
            collective[v.index()]
        } else {
            1
        };
        for s in network.children(v) {
            if network.is_reticulation(s) {
                collective[s.index()] += incoming;
            }
            parents_seen[s.index()] += 1;
            if parents_seen[s.index()] == network.in_degree(s) {
                frontier.push_back(s);
            }
        }
    }

    let max = collective.iter().copied().max().unwrap_or(0);
    debug!(max, "reticulation subgraph in-degree");
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(edges: &[(&str, &str)]) -> Network {
        Network::from_edges(edges.iter().copied()).expect("valid network")
    }

    #[test]
    fn tree_has_zero() {
        let n = network(&[("r", "a"), ("r", "b"), ("a", "x"), ("a", "y")]);
        assert_eq!(max_reticulation_subgraph_indegree(&n), 0);
    }

    #[test]
    fn binary_reticulation_has_two() {
        let n = network(&[
            ("r", "a"),
            ("r", "b"),
            ("a", "h"),
            ("b", "h"),
            ("h", "x"),
            ("a", "y"),
            ("b", "z"),
        ]);
        assert_eq!(max_reticulation_subgraph_indegree(&n), 2);
    }

    #[test]
    fn chained_reticulations_pool_their_parents() {
        let n = network(&[
            ("r", "a"),
            ("r", "b"),
            ("r", "c"),
            ("a", "h1"),
            ("b", "h1"),
            ("a", "y"),
            ("b", "z"),
            ("h1", "h2"),
            ("c", "h2"),
            ("c", "w"),
            ("h2", "x"),
        ]);
        assert_eq!(max_reticulation_subgraph_indegree(&n), 3);
    }
}
