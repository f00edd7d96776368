//! Nesting depth.
//!
//! # Overview
//!
//! In a nested network the cycles of each block are laminar: every
//! reticulation `r` closes a cycle that hangs from its stability parent
//! `target = dominator(r)`, and any other cycle it meets on the way up lies
//! entirely inside it.
//!
//! # Algorithm
//!
//! For every block with more than two vertices, climb from each parent of
//! each reticulation `r` towards `target`:
//!
//! ```text
//! climb(u):
//!   u == target        → done
//!   u is reticulation  → nesting edge r ⇒ u, continue from dominator(u)
//!   u already climbed  → not nested
//!   otherwise          → mark u, continue from its parent
//! ```
//!
//! Marked ("taboo") vertices are shared by every climb of the block, so two
//! cycles that share a tree path are caught. The nesting edges form a
//! forest on the block's reticulations; roots have depth 1 and every other
//! reticulation sits one deeper than the deepest reticulation jumping over
//! it. A lone cycle has an empty forest and depth 1. The network's nesting
//! depth is the maximum over all blocks, 0 for trees, and
//! [`NOT_NESTED`] as soon as any climb is blocked.

use std::collections::HashMap;

use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use tracing::{debug, error, instrument};

use crate::blocks::{Block, Blocks};
use crate::network::Network;
use crate::stability::Stability;

/// Value reported for networks that are not nested.
pub const NOT_NESTED: i64 = -1;

/// Where a climb stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Climb {
    Target,
    Reticulation(NodeIndex),
    Blocked(NodeIndex),
}

/// Nesting depth of `network`, or [`NOT_NESTED`].
///
/// With `exhaustive == false` the first blocked climb ends the computation.
#[must_use]
#[instrument(skip_all)]
pub fn nesting_depth(
    network: &Network,
    stability: &Stability,
    blocks: &Blocks,
    exhaustive: bool,
) -> i64 {
    let mut depth = 0;
    let mut nested = true;
    for block in blocks.cyclic() {
        if let Some(d) = block_depth(network, stability, block, exhaustive) {
            depth = depth.max(d);
        } else {
            nested = false;
            if !exhaustive {
                break;
            }
        }
    }
    if nested { depth } else { NOT_NESTED }
}

/// Depth of the nesting forest of one block, `None` if it is not nested.
fn block_depth(
    network: &Network,
    stability: &Stability,
    block: &Block,
    exhaustive: bool,
) -> Option<i64> {
    let reticulations: Vec<NodeIndex> = block
        .vertices
        .iter()
        .copied()
        .filter(|&v| network.is_reticulation(v))
        .collect();

    let mut taboo = FixedBitSet::with_capacity(network.vertex_count());
    // inner reticulation → reticulations that jumped over it
    let mut outer: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
    let mut nested = true;

    for &r in &reticulations {
        let Some(target) = stability.dominator(r) else {
            continue;
        };
        for p in network.parents(r) {
            let mut from = p;
            loop {
                match climb(network, from, target, &mut taboo) {
                    Climb::Target => break,
                    Climb::Reticulation(u) => {
                        debug!(
                            reticulation = network.label(r),
                            over = network.label(u),
                            "jump"
                        );
                        outer.entry(u).or_default().push(r);
                        let Some(next) = stability.dominator(u) else {
                            break;
                        };
                        from = next;
                    }
                    Climb::Blocked(u) => {
                        debug!(
                            reticulation = network.label(r),
                            vertex = network.label(u),
                            target = network.label(target),
                            "taboo vertex, not nested"
                        );
                        nested = false;
                        if !exhaustive {
                            return None;
                        }
                        break;
                    }
                }
            }
        }
    }

    if !nested {
        return None;
    }

    let mut memo: HashMap<NodeIndex, i64> = HashMap::new();
    let depth = reticulations
        .iter()
        .map(|&r| forest_depth(r, &outer, &mut memo))
        .max()
        .unwrap_or(1);
    debug!(
        reticulations = reticulations.len(),
        jumps = outer.values().map(Vec::len).sum::<usize>(),
        depth,
        "block nesting forest"
    );
    Some(depth)
}

fn climb(network: &Network, mut u: NodeIndex, target: NodeIndex, taboo: &mut FixedBitSet) -> Climb {
    loop {
        if u == target {
            return Climb::Target;
        }
        if network.is_reticulation(u) {
            return Climb::Reticulation(u);
        }
        if taboo.contains(u.index()) {
            return Climb::Blocked(u);
        }
        taboo.insert(u.index());
        let Some(parent) = network.parents(u).next() else {
            // The target dominates every vertex on the climb.
            error!(vertex = network.label(u), target = network.label(target), "climb passed the root");
            debug_assert!(u != network.root(), "climb passed the root");
            return Climb::Blocked(u);
        };
        u = parent;
    }
}

/// Depth of `start` in the nesting forest given by `outer`.
fn forest_depth(
    start: NodeIndex,
    outer: &HashMap<NodeIndex, Vec<NodeIndex>>,
    memo: &mut HashMap<NodeIndex, i64>,
) -> i64 {
    let mut stack = vec![start];
    while let Some(&v) = stack.last() {
        if memo.contains_key(&v) {
            stack.pop();
            continue;
        }
        let above = outer.get(&v).map_or(&[][..], Vec::as_slice);
        let pending: Vec<NodeIndex> = above
            .iter()
            .copied()
            .filter(|o| !memo.contains_key(o))
            .collect();
        if pending.is_empty() {
            let d = above
                .iter()
                .filter_map(|o| memo.get(o))
                .max()
                .map_or(1, |d| d + 1);
            memo.insert(v, d);
            stack.pop();
        } else {
            stack.extend(pending);
        }
    }
    memo.get(&start).copied().unwrap_or(1)
}
