//! Network construction from edge lists.
//!
//! # Overview
//!
//! Input networks arrive as a sequence of `(parent, child)` pairs, usually
//! read from a text file with one edge per line. [`RawNetwork`] holds that
//! edge set in a [`StableDiGraph`] so vertices can be removed without
//! invalidating the indices of the others, which is what
//! [`RawNetwork::contract_trivial_vertices`] needs.
//!
//! ## Edge list format
//!
//! ```text
//! <parent-id> <child-id>
//! ```
//!
//! Ids are opaque tokens separated by exactly one space. Blank and malformed
//! lines are skipped.
//!
//! ## Parallel edges
//!
//! A repeated `(parent, child)` pair is stored once. Contraction can also
//! produce a parallel edge (`u → v → w` next to an existing `u → w`); it is
//! merged the same way, which may expose further trivial vertices.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::{
    Direction,
    algo::toposort,
    stable_graph::{NodeIndex, StableDiGraph},
};
use tracing::{debug, instrument};

use crate::error::StructureError;

// ---------------------------------------------------------------------------
// Edge list parsing
// ---------------------------------------------------------------------------

/// Parse an edge-list text into `(parent, child)` pairs.
///
/// Lines that do not consist of two non-empty tokens separated by a single
/// space are ignored.
#[must_use]
pub fn parse_edge_list(text: &str) -> Vec<(String, String)> {
    text.lines().filter_map(parse_edge_line).collect()
}

fn parse_edge_line(line: &str) -> Option<(String, String)> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (parent, child) = line.split_once(' ')?;
    if parent.is_empty() || child.is_empty() || child.contains(' ') {
        return None;
    }
    Some((parent.to_string(), child.to_string()))
}

// ---------------------------------------------------------------------------
// RawNetwork
// ---------------------------------------------------------------------------

/// An unvalidated directed graph built from an edge list.
///
/// Nodes are vertex labels. An edge `A → B` means "A is a parent of B".
#[derive(Debug, Clone, Default)]
pub struct RawNetwork {
    /// Directed graph: nodes = vertex labels, edges = parent/child arcs.
    pub graph: StableDiGraph<String, ()>,
    /// Mapping from vertex label to `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
}

impl RawNetwork {
    /// Build a [`RawNetwork`] from `(parent, child)` pairs, in order.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::SelfLoop`] if a pair has the same label on
    /// both sides.
    pub fn from_edges<I, P, C>(edges: I) -> Result<Self, StructureError>
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        let mut raw = Self::default();
        for (parent, child) in edges {
            let (parent, child) = (parent.into(), child.into());
            if parent == child {
                return Err(StructureError::SelfLoop { vertex: parent });
            }
            let p = raw.vertex(parent);
            let c = raw.vertex(child);
            if !raw.graph.contains_edge(p, c) {
                raw.graph.add_edge(p, c, ());
            }
        }
        Ok(raw)
    }

    fn vertex(&mut self, label: String) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&label) {
            return idx;
        }
        let idx = self.graph.add_node(label.clone());
        self.node_map.insert(label, idx);
        idx
    }

    /// Return the number of vertices.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Labelled edges, sorted.
    #[must_use]
    pub fn sorted_edges(&self) -> Vec<(String, String)> {
        let mut edges: Vec<(String, String)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (self.graph[a].clone(), self.graph[b].clone()))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Remove every vertex with in-degree 1 and out-degree 1, joining its
    /// parent directly to its child, until no such vertex is left.
    ///
    /// Returns the number of vertices removed; a second call returns 0.
    /// A trivial vertex whose parent is also its child sits on a directed
    /// cycle and is left in place for [`RawNetwork::validate`] to report.
    #[instrument(skip(self))]
    pub fn contract_trivial_vertices(&mut self) -> usize {
        let mut worklist: Vec<NodeIndex> = self.graph.node_indices().collect();
        let mut contracted = 0usize;

        while let Some(v) = worklist.pop() {
            if !self.graph.contains_node(v) {
                continue;
            }
            let Some((parent, child)) = self.trivial_neighbours(v) else {
                continue;
            };
            if parent == child {
                continue;
            }

            if let Some(label) = self.graph.remove_node(v) {
                debug!(vertex = %label, "contracted indegree-1 outdegree-1 vertex");
                self.node_map.remove(&label);
            }
            if !self.graph.contains_edge(parent, child) {
                self.graph.add_edge(parent, child, ());
            }
            contracted += 1;

            // Merging a parallel edge changes both endpoints' degrees.
            worklist.push(parent);
            worklist.push(child);
        }

        contracted
    }

    /// `Some((parent, child))` if `v` has exactly one of each.
    fn trivial_neighbours(&self, v: NodeIndex) -> Option<(NodeIndex, NodeIndex)> {
        let mut parents = self.graph.neighbors_directed(v, Direction::Incoming);
        let parent = parents.next()?;
        if parents.next().is_some() {
            return None;
        }
        let mut children = self.graph.neighbors_directed(v, Direction::Outgoing);
        let child = children.next()?;
        if children.next().is_some() {
            return None;
        }
        Some((parent, child))
    }

    /// Check the structural invariants of a rooted phylogenetic network.
    ///
    /// Vertices are checked in insertion order, so the first offending
    /// vertex of the input is the one reported.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant:
    /// - [`StructureError::TrivialVertex`] for in-degree 1 and out-degree 1,
    /// - [`StructureError::ForbiddenDegrees`] for in- and out-degree > 1,
    /// - [`StructureError::ChildlessReticulation`] for in-degree > 1 without
    ///   a child,
    /// - [`StructureError::MultipleRoots`] / [`StructureError::NoRoot`] unless
    ///   exactly one vertex has in-degree 0,
    /// - [`StructureError::Cycle`] if the graph is not acyclic.
    pub fn validate(&self) -> Result<(), StructureError> {
        let mut root: Option<NodeIndex> = None;

        for v in self.graph.node_indices() {
            let in_degree = self
                .graph
                .neighbors_directed(v, Direction::Incoming)
                .count();
            let out_degree = self
                .graph
                .neighbors_directed(v, Direction::Outgoing)
                .count();
            let label = || self.graph[v].clone();

            if in_degree == 1 && out_degree == 1 {
                return Err(StructureError::TrivialVertex { vertex: label() });
            }
            if in_degree > 1 && out_degree > 1 {
                return Err(StructureError::ForbiddenDegrees {
                    vertex: label(),
                    in_degree,
                    out_degree,
                });
            }
            if in_degree > 1 && out_degree == 0 {
                return Err(StructureError::ChildlessReticulation { vertex: label() });
            }
            if in_degree == 0 {
                if let Some(first) = root {
                    return Err(StructureError::MultipleRoots {
                        first: self.graph[first].clone(),
                        second: label(),
                    });
                }
                root = Some(v);
            }
        }

        if root.is_none() {
            return Err(StructureError::NoRoot);
        }

        toposort(&self.graph, None).map_err(|cycle| StructureError::Cycle {
            vertex: self.graph[cycle.node_id()].clone(),
        })?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
