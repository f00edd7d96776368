//! Proptest strategies over generated networks.
//!
//! Each strategy draws the generator parameters and a seed, then runs the
//! generator with a seeded `StdRng`, so a failing case shrinks towards
//! smaller networks and replays exactly.

use phylonet_core::network::Network;
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

use crate::binary::random_binary;
use crate::tree::regular_tree;

/// Random binary networks with at most `max_vertices` vertices.
pub fn arb_binary_network(max_vertices: usize) -> impl Strategy<Value = Network> + Clone {
    let max_half = (max_vertices.max(3) - 1) / 2;
    (1..=max_half, 0.0f64..6.0, any::<u64>()).prop_filter_map(
        "generator rejected parameters",
        |(half, mean, seed)| random_binary(2 * half + 1, mean, &mut StdRng::seed_from_u64(seed)).ok(),
    )
}

/// Random binary trees with at most `max_vertices` vertices.
pub fn arb_binary_tree(max_vertices: usize) -> impl Strategy<Value = Network> + Clone {
    let max_inner = (max_vertices.max(3) - 1) / 2;
    (1..=max_inner, any::<u64>()).prop_filter_map(
        "generator rejected parameters",
        |(inner, seed)| regular_tree(2 * inner + 1, 2, &mut StdRng::seed_from_u64(seed)).ok(),
    )
}

/// The labelled edges of `network` with `extra` arcs subdivided by fresh
/// vertices `_s0`, `_s1`, ..., in shuffled order.
///
/// Contracting the result must give `network` back.
pub fn arb_subdivided_edges(
    network: &Network,
    extra: usize,
) -> impl Strategy<Value = Vec<(String, String)>> + use<> {
    let edges = network.edges();
    let count = edges.len();
    prop::collection::vec(any::<prop::sample::Index>(), 0..=extra)
        .prop_map(move |picks| {
            let mut edges = edges.clone();
            for (i, pick) in picks.iter().enumerate() {
                let at = pick.index(count + i);
                let (parent, child) = edges[at].clone();
                let fresh = format!("_s{i}");
                edges[at] = (parent, fresh.clone());
                edges.push((fresh, child));
            }
            edges
        })
        .prop_shuffle()
}
