//! Random binary networks.
//!
//! # Overview
//!
//! A binary network with `n` vertices and `r` reticulations has `n - 1 + r`
//! arcs, so it has `(n - 1 - r) / 2` tree vertices (root included) and the
//! rest are leaves. `n` must be odd.
//!
//! ```text
//!   a        c             a        c
//!   │        │             │        │
//!   │        │    ──▶      w0 ────▶ w1
//!   │        │             │        │
//!   b        d             b        d
//! ```
//!
//! 1. Draw `r` from an exponential distribution with the requested mean,
//!    capped so that the starting tree keeps at least 3 vertices.
//! 2. Build a random binary tree on `n - 2r` vertices.
//! 3. `r` times: subdivide two distinct random arcs with fresh vertices `w0`
//!    and `w1` and join them. The new arc points away from the vertex that
//!    is reachable from the other one, so the graph stays acyclic.

use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use phylonet_core::network::Network;
use rand::Rng;
use rand::seq::index;
use rand_distr::{Distribution, Exp};
use tracing::{debug, info, instrument};

use crate::error::GeneratorError;
use crate::tree::{to_network, tree_graph};

/// Draw a reticulation number with mean `mean`, at most `cap`.
///
/// # Errors
///
/// Returns [`GeneratorError::InvalidMean`] if `mean` is negative or not
/// finite.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn reticulation_count<R: Rng + ?Sized>(
    mean: f64,
    cap: usize,
    rng: &mut R,
) -> Result<usize, GeneratorError> {
    if !mean.is_finite() || mean < 0.0 {
        return Err(GeneratorError::InvalidMean { mean });
    }
    if mean <= 0.0 || cap == 0 {
        return Ok(0);
    }
    let exp = Exp::new(1.0 / mean).map_err(|_| GeneratorError::InvalidMean { mean })?;
    let drawn = exp.sample(rng).floor().min(cap as f64);
    Ok(drawn as usize)
}

/// A random binary network on `vertices` vertices whose reticulation
/// number is exponentially distributed with mean `reticulation_mean`.
///
/// # Errors
///
/// Returns [`GeneratorError::EvenVertexCount`] for even `vertices`,
/// [`GeneratorError::TooFewVertices`] below 3, and
/// [`GeneratorError::InvalidMean`] for a negative mean.
#[instrument(skip(rng))]
pub fn random_binary<R: Rng + ?Sized>(
    vertices: usize,
    reticulation_mean: f64,
    rng: &mut R,
) -> Result<Network, GeneratorError> {
    if vertices % 2 == 0 {
        return Err(GeneratorError::EvenVertexCount { vertices });
    }
    if vertices < 3 {
        return Err(GeneratorError::TooFewVertices { vertices });
    }

    let cap = ((vertices - 1) / 2).saturating_sub(1);
    let reticulations = reticulation_count(reticulation_mean, cap, rng)?;
    let arcs = vertices - 1 + reticulations;
    let tree_vertices = (arcs - reticulations) / 2;
    info!(
        tree_vertices,
        reticulations,
        leaves = vertices - reticulations - tree_vertices,
        "creating random binary network"
    );

    let mut graph = tree_graph(vertices - 2 * reticulations, 2, rng)?;
    for _ in 0..reticulations {
        add_reticulation(&mut graph, rng);
    }
    to_network(&graph)
}

/// Subdivide two distinct arcs and join the new vertices.
fn add_reticulation<R: Rng + ?Sized>(graph: &mut DiGraph<(), ()>, rng: &mut R) {
    let arcs: Vec<(NodeIndex, NodeIndex)> = index::sample(rng, graph.edge_count(), 2)
        .iter()
        .filter_map(|i| graph.edge_endpoints(EdgeIndex::new(i)))
        .collect();
    let &[first, second] = arcs.as_slice() else {
        return;
    };
    let w0 = subdivide(graph, first);
    let w1 = subdivide(graph, second);

    if has_path_connecting(&*graph, w1, w0, None) {
        graph.add_edge(w1, w0, ());
        debug!(tree = w1.index(), reticulation = w0.index(), "joined");
    } else {
        graph.add_edge(w0, w1, ());
        debug!(tree = w0.index(), reticulation = w1.index(), "joined");
    }
}

/// Replace `a → b` by `a → w → b` and return `w`.
fn subdivide(graph: &mut DiGraph<(), ()>, (a, b): (NodeIndex, NodeIndex)) -> NodeIndex {
    if let Some(e) = graph.find_edge(a, b) {
        graph.remove_edge(e);
    }
    let w = graph.add_node(());
    graph.add_edge(a, w, ());
    graph.add_edge(w, b, ());
    w
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn generated_network_has_the_requested_size() {
        let mut rng = StdRng::seed_from_u64(42);
        for seed_offset in 0..20 {
            let n = random_binary(31, 4.0, &mut rng).expect("31 is odd");
            assert_eq!(n.vertex_count(), 31, "run {seed_offset}");
            assert!(n.is_binary());
            assert_eq!(
                n.reticulations().len(),
                n.edge_count() + 1 - n.vertex_count()
            );
        }
    }

    #[test]
    fn reticulation_number_respects_the_cap() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let n = random_binary(7, 100.0, &mut rng).expect("7 is odd");
            assert!(n.reticulations().len() <= 2);
        }
    }

    #[test]
    fn zero_mean_gives_a_tree() {
        let mut rng = StdRng::seed_from_u64(5);
        let n = random_binary(9, 0.0, &mut rng).expect("9 is odd");
        assert!(n.reticulations().is_empty());
        assert_eq!(n.leaves().len(), 5);
    }

    #[test]
    fn same_seed_same_network() {
        let a = random_binary(21, 3.0, &mut StdRng::seed_from_u64(99)).expect("odd");
        let b = random_binary(21, 3.0, &mut StdRng::seed_from_u64(99)).expect("odd");
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn bad_parameters_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            random_binary(8, 1.0, &mut rng).unwrap_err(),
            GeneratorError::EvenVertexCount { vertices: 8 }
        );
        assert_eq!(
            random_binary(1, 1.0, &mut rng).unwrap_err(),
            GeneratorError::TooFewVertices { vertices: 1 }
        );
        assert!(matches!(
            random_binary(9, -1.0, &mut rng),
            Err(GeneratorError::InvalidMean { .. })
        ));
        assert!(matches!(
            reticulation_count(f64::NAN, 3, &mut rng),
            Err(GeneratorError::InvalidMean { .. })
        ));
    }
}
