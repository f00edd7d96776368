//! Biconnected-component ("block") decomposition of a network.
//!
//! # Overview
//!
//! Level, nesting depth, and the per-block unstable-root count all reason
//! about the blocks of the *undirected* version of the network. A block with
//! more than two vertices contains at least one cycle of the underlying
//! graph, so in a network it contains at least one reticulation. Two-vertex
//! blocks are bridges (tree edges) and are ignored by every metric.
//!
//! # Algorithm
//!
//! Hopcroft–Tarjan with an explicit DFS stack and an edge stack. Each
//! directed edge of the network is one undirected edge; the DFS skips only
//! the edge it arrived by, which is sufficient because the network has no
//! parallel edges. When a child `w` of `v` finishes with `low[w] >= disc[v]`
//! the edges pushed since the tree edge `v–w` form one block.

use std::collections::BTreeSet;

use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument};

use crate::network::Network;

const UNVISITED: usize = usize::MAX;

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// One biconnected component: its vertices, sorted by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub vertices: Vec<NodeIndex>,
}

impl Block {
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// `true` for blocks with more than two vertices.
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        self.vertices.len() > 2
    }

    #[must_use]
    pub fn contains(&self, v: NodeIndex) -> bool {
        self.vertices.binary_search(&v).is_ok()
    }
}

/// The block partition of a network's edges.
#[derive(Debug, Clone, Default)]
pub struct Blocks {
    blocks: Vec<Block>,
}

impl Blocks {
    /// Decompose `network` into its biconnected components.
    #[must_use]
    #[instrument(skip(network))]
    pub fn decompose(network: &Network) -> Self {
        let graph = network.graph();
        let n = graph.node_count();

        // Undirected adjacency: (neighbour, edge id).
        let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
        let mut ends: Vec<(usize, usize)> = Vec::with_capacity(graph.edge_count());
        for edge in graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            let id = ends.len();
            ends.push((a, b));
            adjacency[a].push((b, id));
            adjacency[b].push((a, id));
        }

        let mut disc = vec![UNVISITED; n];
        let mut low = vec![0usize; n];
        let mut time = 0usize;
        let mut edge_stack: Vec<usize> = Vec::new();
        let mut blocks = Vec::new();

        for start in 0..n {
            if disc[start] != UNVISITED {
                continue;
            }
            disc[start] = time;
            low[start] = time;
            time += 1;

            // Frames: (vertex, edge it was reached by, next adjacency slot).
            let mut stack: Vec<(usize, usize, usize)> = vec![(start, UNVISITED, 0)];

            while let Some(frame) = stack.last_mut() {
                let (v, via) = (frame.0, frame.1);

                if let Some(&(w, e)) = adjacency[v].get(frame.2) {
                    frame.2 += 1;
                    if e == via {
                        continue;
                    }
                    if disc[w] == UNVISITED {
                        edge_stack.push(e);
                        disc[w] = time;
                        low[w] = time;
                        time += 1;
                        stack.push((w, e, 0));
                    } else if disc[w] < disc[v] {
                        // Back edge to an ancestor.
                        edge_stack.push(e);
                        low[v] = low[v].min(disc[w]);
                    }
                    continue;
                }

                stack.pop();
                let Some(&(u, _, _)) = stack.last() else {
                    continue;
                };
                low[u] = low[u].min(low[v]);
                if low[v] >= disc[u] {
                    let mut members = BTreeSet::new();
                    while let Some(e) = edge_stack.pop() {
                        let (a, b) = ends[e];
                        members.insert(NodeIndex::new(a));
                        members.insert(NodeIndex::new(b));
                        if e == via {
                            break;
                        }
                    }
                    blocks.push(Block {
                        vertices: members.into_iter().collect(),
                    });
                }
            }
        }

        let cyclic = blocks.iter().filter(|b| b.is_cyclic()).count();
        debug!(blocks = blocks.len(), cyclic, "block decomposition");

        Self { blocks }
    }

    /// All blocks, bridges included.
    #[must_use]
    pub fn all(&self) -> &[Block] {
        &self.blocks
    }

    /// Blocks with more than two vertices.
    pub fn cyclic(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_cyclic())
    }

    /// Largest number of `members` inside any block with more than two
    /// vertices, or 0 if there is no such block.
    #[must_use]
    pub fn max_per_block(&self, members: &FixedBitSet) -> usize {
        self.cyclic()
            .map(|b| {
                b.vertices
                    .iter()
                    .filter(|v| members.contains(v.index()))
                    .count()
            })
            .max()
            .unwrap_or(0)
    }
}

/// Build a membership set over `network`'s vertices.
#[must_use]
pub fn vertex_set<I: IntoIterator<Item = NodeIndex>>(network: &Network, vs: I) -> FixedBitSet {
    let mut set = FixedBitSet::with_capacity(network.vertex_count());
    for v in vs {
        set.insert(v.index());
    }
    set
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
