//! Level and unstable component roots.

use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::blocks::{Blocks, vertex_set};
use crate::network::Network;
use crate::stability::Stability;

/// Largest number of reticulations inside one block (0 for trees).
#[must_use]
pub fn level(network: &Network, blocks: &Blocks) -> usize {
    let reticulations = vertex_set(network, network.reticulations().iter().copied());
    blocks.max_per_block(&reticulations)
}

/// Children of unstable reticulations that are not reticulations
/// themselves, sorted by index.
///
/// A reticulation and its non-reticulation child are stable together, so
/// these are exactly the unstable roots of tree components.
#[must_use]
pub fn unstable_roots(network: &Network, stability: &Stability) -> Vec<NodeIndex> {
    let mut roots: Vec<NodeIndex> = network
        .reticulations()
        .iter()
        .filter(|&&r| !stability.is_stable(r))
        .filter_map(|&r| network.single_child(r))
        .filter(|&c| !network.is_reticulation(c))
        .collect();
    roots.sort_unstable();
    debug!(roots = ?network.labels(roots.iter().copied()), "unstable component roots");
    roots
}

/// Largest number of `roots` inside one block.
#[must_use]
pub fn unstable_roots_per_block(network: &Network, blocks: &Blocks, roots: &[NodeIndex]) -> usize {
    blocks.max_per_block(&vertex_set(network, roots.iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(edges: &[(&str, &str)]) -> Network {
        Network::from_edges(edges.iter().copied()).expect("valid network")
    }

    #[test]
    fn tree_has_level_zero() {
        let n = network(&[("r", "a"), ("r", "b"), ("a", "x"), ("a", "y")]);
        assert_eq!(level(&n, &Blocks::decompose(&n)), 0);
    }

    #[test]
    fn two_reticulations_in_one_block_give_level_two() {
        let n = network(&[
            ("r", "a"),
            ("r", "b"),
            ("a", "h1"),
            ("b", "h1"),
            ("a", "h2"),
            ("b", "h2"),
            ("h1", "x"),
            ("h2", "y"),
        ]);
        assert_eq!(level(&n, &Blocks::decompose(&n)), 2);
    }

    #[test]
    fn unstable_root_below_unstable_reticulation() {
        // h1's child t only has reticulation children that c also feeds,
        // so t dominates no leaf.
        let n = network(&[
            ("r", "a"),
            ("r", "b"),
            ("r", "c"),
            ("a", "h1"),
            ("b", "h1"),
            ("a", "y"),
            ("b", "z"),
            ("h1", "t"),
            ("t", "h2"),
            ("t", "h3"),
            ("c", "h2"),
            ("c", "h3"),
            ("c", "w"),
            ("h2", "x"),
            ("h3", "x2"),
        ]);
        let s = Stability::compute(&n);
        let t = n.node_index("t").expect("t");
        assert!(!s.is_stable(t));
        let roots = unstable_roots(&n, &s);
        assert_eq!(roots, vec![t]);
        let blocks = Blocks::decompose(&n);
        assert_eq!(unstable_roots_per_block(&n, &blocks, &roots), 1);
    }

    #[test]
    fn visible_gall_has_no_unstable_roots() {
        let n = network(&[
            ("r", "a"),
            ("r", "b"),
            ("a", "h"),
            ("b", "h"),
            ("h", "x"),
            ("a", "y"),
            ("b", "z"),
        ]);
        let s = Stability::compute(&n);
        assert!(unstable_roots(&n, &s).is_empty());
    }
}
