//! Stable vertices and the stability (dominator) tree.
//!
//! # Overview
//!
//! A vertex `v` is *stable* on a leaf `x` if every path from the root to `x`
//! passes through `v`. Leaves are stable on themselves. Stability drives
//! reticulation visibility, nearly-stable and component-visible
//! recognition, the unstable-root counts, and the nesting-depth climbs.
//!
//! # Algorithm
//!
//! Bottom-up propagation over a frontier seeded with the leaves. A parent
//! joins the frontier once all of its children have been processed.
//!
//! - `reach[v]`: descendants of `v` collected from processed children and
//!   not yet claimed by a lower vertex.
//! - `spread[x]`: how many *active* vertices (some but not all children
//!   processed, or complete but not yet processed) currently hold `x` in
//!   their reach.
//!
//! When `p` completes, every `x` in `reach[p]` with `spread[x] == 1` lies
//! below `p` on every root path: `p` claims it, records the stability-tree
//! edge `p → x`, and drops `x` from tracking. `p` is stable on the leaf of
//! the first stable vertex it claims. Every non-root vertex is claimed by its
//! immediate dominator, so the stability tree is the dominator tree.

use std::collections::{HashSet, VecDeque};
use std::iter;

use petgraph::graph::NodeIndex;
use tracing::{debug, error, instrument};

use crate::network::Network;

// ---------------------------------------------------------------------------
// Stability
// ---------------------------------------------------------------------------

/// Per-vertex stability facts of one network.
#[derive(Debug, Clone)]
pub struct Stability {
    /// Leaf each vertex is stable on (`None` = not stable).
    stable_on: Vec<Option<NodeIndex>>,
    /// Stability-tree parent (immediate dominator); `None` for the root.
    dominator: Vec<Option<NodeIndex>>,
    /// Stability-tree children, sorted by index.
    claimed: Vec<Vec<NodeIndex>>,
}

impl Stability {
    /// Run the bottom-up propagation on `network`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the frontier fails to reach every vertex,
    /// which cannot happen on a validated network.
    #[must_use]
    #[instrument(skip(network), fields(vertices = network.vertex_count()))]
    pub fn compute(network: &Network) -> Self {
        let n = network.vertex_count();

        let mut stable_on: Vec<Option<NodeIndex>> = vec![None; n];
        let mut dominator: Vec<Option<NodeIndex>> = vec![None; n];
        let mut claimed: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

        let mut reach: Vec<HashSet<NodeIndex>> = vec![HashSet::new(); n];
        let mut spread: Vec<usize> = vec![0; n];
        let mut children_seen: Vec<usize> = vec![0; n];

        let mut frontier: VecDeque<NodeIndex> = VecDeque::with_capacity(n);
        for &leaf in network.leaves() {
            stable_on[leaf.index()] = Some(leaf);
            frontier.push_back(leaf);
        }

        let mut processed = 0usize;
        while let Some(v) = frontier.pop_front() {
            processed += 1;
            let reach_v = std::mem::take(&mut reach[v.index()]);

            // v is no longer active.
            for j in &reach_v {
                spread[j.index()] -= 1;
            }

            for p in network.parents(v) {
                children_seen[p.index()] += 1;
                let reach_p = &mut reach[p.index()];
                for j in reach_v.iter().copied().chain(iter::once(v)) {
                    if reach_p.insert(j) {
                        spread[j.index()] += 1;
                    }
                }
            }

            for p in network.parents(v) {
                if children_seen[p.index()] != network.out_degree(p) {
                    continue;
                }
                frontier.push_back(p);

                let mut claims: Vec<NodeIndex> = reach[p.index()]
                    .iter()
                    .copied()
                    .filter(|x| spread[x.index()] == 1)
                    .collect();
                claims.sort_unstable();

                for &x in &claims {
                    dominator[x.index()] = Some(p);
                    if stable_on[p.index()].is_none() {
                        stable_on[p.index()] = stable_on[x.index()];
                    }
                    reach[p.index()].remove(&x);
                    spread[x.index()] = 0;
                }

                if let Some(leaf) = stable_on[p.index()] {
                    debug!(
                        vertex = network.label(p),
                        leaf = network.label(leaf),
                        claims = ?network.labels(claims.iter().copied()),
                        "stable"
                    );
                }
                claimed[p.index()] = claims;
            }
        }

        if processed != n {
            error!(processed, vertices = n, "stability frontier did not reach every vertex");
            debug_assert_eq!(processed, n, "stability frontier did not drain");
        }

        Self {
            stable_on,
            dominator,
            claimed,
        }
    }

    /// `true` if `v` is stable on some leaf (leaves always are).
    #[must_use]
    pub fn is_stable(&self, v: NodeIndex) -> bool {
        self.stable_on[v.index()].is_some()
    }

    /// One leaf `v` is stable on.
    #[must_use]
    pub fn stable_leaf(&self, v: NodeIndex) -> Option<NodeIndex> {
        self.stable_on[v.index()]
    }

    /// Parent of `v` in the stability tree: the lowest vertex through which
    /// every root path to `v` passes. `None` for the root.
    #[must_use]
    pub fn dominator(&self, v: NodeIndex) -> Option<NodeIndex> {
        self.dominator[v.index()]
    }

    /// Children of `v` in the stability tree.
    #[must_use]
    pub fn claimed(&self, v: NodeIndex) -> &[NodeIndex] {
        &self.claimed[v.index()]
    }

    /// Number of stable vertices, leaves included.
    #[must_use]
    pub fn stable_count(&self) -> usize {
        self.stable_on.iter().filter(|s| s.is_some()).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
