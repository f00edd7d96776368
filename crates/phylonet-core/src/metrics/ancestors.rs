//! Uncommon ancestors of the parents of a reticulation.
//!
//! For a reticulation `r` with parents `u_0 .. u_k`, every proper ancestor
//! `a` of `r` gets a label: the set of indices `i` such that `a` reaches
//! `u_i` (a parent reaches itself). Labels are built bottom-up as the union
//! of the children's labels. An ancestor whose label misses some parent is
//! *uncommon*.

use std::collections::{HashMap, VecDeque};

use fixedbitset::FixedBitSet;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use tracing::{debug, error};

use crate::network::Network;

/// Largest number of uncommon ancestors over all reticulations, or 0 if the
/// network has none.
#[must_use]
pub fn max_uncommon_ancestors(network: &Network) -> usize {
    if network.reticulations().is_empty() {
        return 0;
    }
    let order = match toposort(network.graph(), None) {
        Ok(order) => order,
        Err(cycle) => {
            error!(vertex = network.label(cycle.node_id()), "cycle in validated network");
            return 0;
        }
    };
    let mut position = vec![0usize; network.vertex_count()];
    for (i, v) in order.iter().enumerate() {
        position[v.index()] = i;
    }

    network
        .reticulations()
        .iter()
        .map(|&r| {
            let count = uncommon_ancestors(network, r, &position);
            debug!(reticulation = network.label(r), count, "uncommon ancestors");
            count
        })
        .max()
        .unwrap_or(0)
}

/// Number of proper ancestors of `r` that do not reach every parent of `r`.
fn uncommon_ancestors(network: &Network, r: NodeIndex, position: &[usize]) -> usize {
    let parents: Vec<NodeIndex> = network.parents(r).collect();
    let k = parents.len();

    let mut ancestors = ancestors_of(network, r);
    // Children before parents.
    ancestors.sort_unstable_by_key(|v| std::cmp::Reverse(position[v.index()]));

    let mut labels: HashMap<NodeIndex, FixedBitSet> = HashMap::with_capacity(ancestors.len());
    for &a in &ancestors {
        let mut label = FixedBitSet::with_capacity(k);
        for c in network.children(a) {
            if let Some(child_label) = labels.get(&c) {
                label.union_with(child_label);
            }
        }
        if let Some(i) = parents.iter().position(|&p| p == a) {
            label.insert(i);
        }
        labels.insert(a, label);
    }

    labels.values().filter(|l| l.count_ones(..) < k).count()
}

/// Proper ancestors of `v`.
fn ancestors_of(network: &Network, v: NodeIndex) -> Vec<NodeIndex> {
    let mut seen = FixedBitSet::with_capacity(network.vertex_count());
    seen.insert(v.index());
    let mut queue = VecDeque::from([v]);
    let mut out = Vec::new();
    while let Some(u) = queue.pop_front() {
        for p in network.parents(u) {
            if !seen.put(p.index()) {
                out.push(p);
                queue.push_back(p);
            }
        }
    }
    out
}
