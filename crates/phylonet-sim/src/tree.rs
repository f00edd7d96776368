//! Random regular trees.
//!
//! Start from a lone root and repeatedly give `k` children to a uniformly
//! chosen leaf until the tree has `n` vertices. That only works when
//! `n = 1 + i·k`.

use petgraph::graph::{DiGraph, NodeIndex};
use phylonet_core::network::Network;
use rand::Rng;
use tracing::{debug, instrument};

use crate::error::GeneratorError;

/// A random `regularity`-regular rooted tree on `vertices` vertices.
///
/// # Errors
///
/// Returns [`GeneratorError::Regularity`] for `regularity < 2` and
/// [`GeneratorError::NoRegularTree`] unless `vertices = 1 + i·regularity`
/// for some `i ≥ 1`.
pub fn regular_tree<R: Rng + ?Sized>(
    vertices: usize,
    regularity: usize,
    rng: &mut R,
) -> Result<Network, GeneratorError> {
    let graph = tree_graph(vertices, regularity, rng)?;
    to_network(&graph)
}

#[instrument(skip(rng))]
pub(crate) fn tree_graph<R: Rng + ?Sized>(
    vertices: usize,
    regularity: usize,
    rng: &mut R,
) -> Result<DiGraph<(), ()>, GeneratorError> {
    if regularity < 2 {
        return Err(GeneratorError::Regularity { regularity });
    }
    if vertices < 2 || (vertices - 1) % regularity != 0 {
        return Err(GeneratorError::NoRegularTree {
            vertices,
            regularity,
        });
    }

    let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(vertices, vertices - 1);
    let root = graph.add_node(());
    let mut leaves = vec![root];
    for _ in 0..(vertices - 1) / regularity {
        let parent = leaves.swap_remove(rng.gen_range(0..leaves.len()));
        for _ in 0..regularity {
            let child = graph.add_node(());
            graph.add_edge(parent, child, ());
            leaves.push(child);
        }
    }
    debug!(leaves = leaves.len(), "regular tree");
    Ok(graph)
}

/// Label vertices by index and validate.
pub(crate) fn to_network(graph: &DiGraph<(), ()>) -> Result<Network, GeneratorError> {
    let label = |v: NodeIndex| v.index().to_string();
    let edges = graph
        .raw_edges()
        .iter()
        .map(|e| (label(e.source()), label(e.target())));
    Ok(Network::from_edges(edges)?)
}
