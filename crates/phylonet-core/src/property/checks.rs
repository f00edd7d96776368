//! Recognition procedures for the boolean network classes.
//!
//! Each check scans for counterexamples. With `exhaustive == false` it
//! returns at the first one; otherwise it keeps scanning so every violation
//! is logged at `debug` level. The result is the same either way.

use petgraph::algo::maximum_matching;
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::debug;

use crate::network::Network;
use crate::stability::Stability;

/// `true` if `holds` is true for every vertex of `vertices`.
fn every<I, F>(vertices: I, exhaustive: bool, mut holds: F) -> bool
where
    I: IntoIterator<Item = NodeIndex>,
    F: FnMut(NodeIndex) -> bool,
{
    let mut result = true;
    for v in vertices {
        if !holds(v) {
            result = false;
            if !exhaustive {
                break;
            }
        }
    }
    result
}

/// Every non-leaf vertex has a child of in-degree 1.
#[must_use]
pub fn tree_child(network: &Network, exhaustive: bool) -> bool {
    every(
        network.vertices().filter(|&v| network.out_degree(v) > 0),
        exhaustive,
        |v| {
            let ok = network.children(v).any(|c| network.in_degree(c) == 1);
            if !ok {
                debug!(vertex = network.label(v), "no tree child");
            }
            ok
        },
    )
}

/// Every reticulation has a non-reticulation among its parents' children.
#[must_use]
pub fn tree_sibling(network: &Network, exhaustive: bool) -> bool {
    every(network.reticulations().iter().copied(), exhaustive, |r| {
        let ok = network
            .parents(r)
            .flat_map(|p| network.children(p))
            .any(|c| !network.is_reticulation(c));
        if !ok {
            debug!(reticulation = network.label(r), "no tree sibling");
        }
        ok
    })
}

/// Every reticulation is stable.
#[must_use]
pub fn reticulation_visible(network: &Network, stability: &Stability, exhaustive: bool) -> bool {
    every(network.reticulations().iter().copied(), exhaustive, |r| {
        let ok = stability.is_stable(r);
        if !ok {
            debug!(reticulation = network.label(r), "reticulation is not stable");
        }
        ok
    })
}

/// Every non-root vertex is stable or has only stable parents.
#[must_use]
pub fn nearly_stable(network: &Network, stability: &Stability, exhaustive: bool) -> bool {
    let root = network.root();
    every(
        network.vertices().filter(|&v| v != root),
        exhaustive,
        |v| {
            if stability.is_stable(v) {
                return true;
            }
            let unstable: Vec<NodeIndex> = network
                .parents(v)
                .filter(|&p| !stability.is_stable(p))
                .collect();
            if unstable.is_empty() {
                return true;
            }
            debug!(
                vertex = network.label(v),
                unstable_parents = ?network.labels(unstable),
                "unstable vertex with unstable parents"
            );
            false
        },
    )
}

/// The child of every reticulation is stable unless it is a reticulation.
#[must_use]
pub fn component_visible(network: &Network, stability: &Stability, exhaustive: bool) -> bool {
    every(network.reticulations().iter().copied(), exhaustive, |r| {
        let Some(child) = network.single_child(r) else {
            return true;
        };
        let ok = network.is_reticulation(child) || stability.is_stable(child);
        if !ok {
            debug!(vertex = network.label(child), "unstable component root");
        }
        ok
    })
}

/// No reticulation has a reticulation parent.
#[must_use]
pub fn compressed(network: &Network, exhaustive: bool) -> bool {
    every(network.reticulations().iter().copied(), exhaustive, |r| {
        let mut ok = true;
        for p in network.parents(r).filter(|&p| network.is_reticulation(p)) {
            debug!(
                reticulation = network.label(r),
                parent = network.label(p),
                "reticulation parent of a reticulation"
            );
            ok = false;
        }
        ok
    })
}

/// Every parent of a reticulation is a non-reticulation with a tree path: a
/// path to a leaf that avoids reticulations.
///
/// A reticulation with a reticulation parent fails outright.
#[must_use]
pub fn nearly_tree_child(network: &Network, exhaustive: bool) -> bool {
    let mut memo = TreePaths::new(network);
    every(network.reticulations().iter().copied(), exhaustive, |r| {
        let mut ok = true;
        for p in network.parents(r) {
            if network.is_reticulation(p) {
                debug!(
                    reticulation = network.label(r),
                    parent = network.label(p),
                    "reticulation parent"
                );
                ok = false;
            } else if !memo.has_tree_path(p) {
                debug!(vertex = network.label(p), "no tree path");
                ok = false;
            }
            if !ok && !exhaustive {
                break;
            }
        }
        ok
    })
}

/// Every reticulation is stable and has at least one stable parent.
#[must_use]
pub fn genetically_stable(network: &Network, stability: &Stability, exhaustive: bool) -> bool {
    every(network.reticulations().iter().copied(), exhaustive, |r| {
        if !stability.is_stable(r) {
            debug!(reticulation = network.label(r), "reticulation is not stable");
            return false;
        }
        let ok = network.parents(r).any(|p| stability.is_stable(p));
        if !ok {
            debug!(reticulation = network.label(r), "no stable parent");
        }
        ok
    })
}

/// Francis–Semple–Steel: the network is tree-based iff the bipartite graph
/// with an edge `(u_out, v_in)` per arc `u → v` has a matching of size
/// `|V| - |leaves|`.
#[must_use]
pub fn tree_based(network: &Network) -> bool {
    let n = network.vertex_count();
    let mut bipartite: UnGraph<(), ()> = UnGraph::with_capacity(2 * n, network.edge_count());
    for _ in 0..2 * n {
        bipartite.add_node(());
    }
    for (u, v) in network.graph().raw_edges().iter().map(|e| (e.source(), e.target())) {
        bipartite.add_edge(
            NodeIndex::new(u.index()),
            NodeIndex::new(n + v.index()),
            (),
        );
    }

    let matched = maximum_matching(&bipartite).len();
    let needed = n - network.leaves().len();
    debug!(matched, needed, "tree-based matching");
    matched == needed
}

// ---------------------------------------------------------------------------
// Tree paths
// ---------------------------------------------------------------------------

/// Memoized tree-path search with an explicit stack.
struct TreePaths<'n> {
    network: &'n Network,
    memo: Vec<Option<bool>>,
}

impl<'n> TreePaths<'n> {
    fn new(network: &'n Network) -> Self {
        let mut memo = vec![None; network.vertex_count()];
        for &leaf in network.leaves() {
            memo[leaf.index()] = Some(true);
        }
        for &r in network.reticulations() {
            memo[r.index()] = Some(false);
        }
        Self { network, memo }
    }

    fn has_tree_path(&mut self, start: NodeIndex) -> bool {
        if let Some(known) = self.memo[start.index()] {
            return known;
        }

        // Frames: (vertex, children still to try).
        let mut stack: Vec<(NodeIndex, Vec<NodeIndex>)> =
            vec![(start, self.network.children(start).collect())];

        while let Some((v, pending)) = stack.last_mut() {
            let v = *v;
            let Some(c) = pending.pop() else {
                self.memo[v.index()] = Some(false);
                stack.pop();
                continue;
            };
            match self.memo[c.index()] {
                Some(true) => {
                    // Everyone on the stack reaches a leaf through c.
                    for (u, _) in stack.drain(..) {
                        self.memo[u.index()] = Some(true);
                    }
                }
                Some(false) => {}
                None => {
                    let children = self.network.children(c).collect();
                    stack.push((c, children));
                }
            }
        }

        self.memo[start.index()].unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
