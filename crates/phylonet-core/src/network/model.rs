//! Validated rooted phylogenetic networks.
//!
//! A [`Network`] is built from a [`RawNetwork`] that passed
//! [`RawNetwork::validate`]. On construction the graph is compacted into a
//! dense [`DiGraph`] so every analysis can use `NodeIndex::index()` as an
//! array offset, and the per-vertex degrees and kinds are cached.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::Context;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::StructureError;
use crate::network::build::{RawNetwork, parse_edge_list};

// ---------------------------------------------------------------------------
// VertexKind
// ---------------------------------------------------------------------------

/// Structural role of a vertex, derived from its degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexKind {
    /// In-degree 0.
    Root,
    /// In-degree 1, out-degree 0.
    Leaf,
    /// In-degree 1, out-degree at least 1.
    Tree,
    /// In-degree at least 2.
    Reticulation,
}

impl VertexKind {
    #[must_use]
    pub const fn from_degrees(in_degree: usize, out_degree: usize) -> Self {
        match in_degree {
            0 => Self::Root,
            1 if out_degree == 0 => Self::Leaf,
            1 => Self::Tree,
            _ => Self::Reticulation,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Leaf => "leaf",
            Self::Tree => "tree",
            Self::Reticulation => "reticulation",
        }
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// A rooted phylogenetic network that satisfies every structural invariant.
///
/// The network owns its topology; analyses borrow it immutably.
#[derive(Debug, Clone)]
pub struct Network {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
    in_degree: Vec<usize>,
    out_degree: Vec<usize>,
    kinds: Vec<VertexKind>,
    root: NodeIndex,
    leaves: Vec<NodeIndex>,
    reticulations: Vec<NodeIndex>,
    regularity: usize,
    content_hash: String,
}

impl Network {
    /// Validate `raw` and compact it into a [`Network`].
    ///
    /// # Errors
    ///
    /// Returns the first [`StructureError`] found by [`RawNetwork::validate`].
    pub fn from_raw(raw: RawNetwork) -> Result<Self, StructureError> {
        raw.validate()?;
        let content_hash = compute_edge_hash(&raw.sorted_edges());
        let graph: DiGraph<String, ()> = DiGraph::from(raw.graph);

        let n = graph.node_count();
        let mut node_map = HashMap::with_capacity(n);
        let mut in_degree = Vec::with_capacity(n);
        let mut out_degree = Vec::with_capacity(n);
        let mut kinds = Vec::with_capacity(n);
        let mut root = None;
        let mut leaves = Vec::new();
        let mut reticulations = Vec::new();

        for v in graph.node_indices() {
            node_map.insert(graph[v].clone(), v);
            let i = graph.neighbors_directed(v, Direction::Incoming).count();
            let o = graph.neighbors_directed(v, Direction::Outgoing).count();
            let kind = VertexKind::from_degrees(i, o);
            match kind {
                VertexKind::Root => root = Some(v),
                VertexKind::Leaf => leaves.push(v),
                VertexKind::Reticulation => reticulations.push(v),
                VertexKind::Tree => {}
            }
            in_degree.push(i);
            out_degree.push(o);
            kinds.push(kind);
        }

        // validate() guarantees exactly one root.
        let root = root.ok_or(StructureError::NoRoot)?;
        let regularity = compute_regularity(&kinds, &in_degree, &out_degree, root);

        let network = Self {
            graph,
            node_map,
            in_degree,
            out_degree,
            kinds,
            root,
            leaves,
            reticulations,
            regularity,
            content_hash,
        };

        info!(
            vertices = network.vertex_count(),
            edges = network.edge_count(),
            root = %network.label(root),
            regularity = network.regularity,
            reticulations = network.reticulations.len(),
            leaves = network.leaves.len(),
            "network loaded"
        );

        Ok(network)
    }

    /// Build, contract, and validate a network from `(parent, child)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] if the contracted graph is not a valid
    /// rooted phylogenetic network.
    pub fn from_edges<I, P, C>(edges: I) -> Result<Self, StructureError>
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        let mut raw = RawNetwork::from_edges(edges)?;
        raw.contract_trivial_vertices();
        Self::from_raw(raw)
    }

    /// Parse an edge-list text and build the network from it.
    ///
    /// # Errors
    ///
    /// See [`Network::from_edges`].
    pub fn from_edge_list(text: &str) -> Result<Self, StructureError> {
        Self::from_edges(parse_edge_list(text))
    }

    /// Read an edge-list file and build the network from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or wraps the
    /// [`StructureError`] if the network is invalid (recover it with
    /// `downcast_ref`).
    #[instrument]
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_edge_list(&text)
            .with_context(|| format!("Invalid network in {}", path.display()))
    }

    // -- topology -----------------------------------------------------------

    /// The underlying graph (dense indices).
    #[must_use]
    pub const fn graph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All vertices in index order.
    pub fn vertices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    #[must_use]
    pub const fn root(&self) -> NodeIndex {
        self.root
    }

    #[must_use]
    pub fn leaves(&self) -> &[NodeIndex] {
        &self.leaves
    }

    #[must_use]
    pub fn reticulations(&self) -> &[NodeIndex] {
        &self.reticulations
    }

    pub fn parents(&self, v: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(v, Direction::Incoming)
    }

    pub fn children(&self, v: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(v, Direction::Outgoing)
    }

    /// The only child of a reticulation (or of any vertex with out-degree 1).
    #[must_use]
    pub fn single_child(&self, v: NodeIndex) -> Option<NodeIndex> {
        if self.out_degree(v) == 1 {
            self.children(v).next()
        } else {
            None
        }
    }

    #[must_use]
    pub fn in_degree(&self, v: NodeIndex) -> usize {
        self.in_degree[v.index()]
    }

    #[must_use]
    pub fn out_degree(&self, v: NodeIndex) -> usize {
        self.out_degree[v.index()]
    }

    // -- classification -----------------------------------------------------

    /// Kind of `v`, from the cached degrees.
    #[must_use]
    pub fn kind(&self, v: NodeIndex) -> VertexKind {
        self.kinds[v.index()]
    }

    #[must_use]
    pub fn is_reticulation(&self, v: NodeIndex) -> bool {
        self.in_degree(v) > 1
    }

    #[must_use]
    pub fn is_leaf(&self, v: NodeIndex) -> bool {
        self.kind(v) == VertexKind::Leaf
    }

    /// Number of vertices of the given kind.
    #[must_use]
    pub fn count_kind(&self, kind: VertexKind) -> usize {
        match kind {
            VertexKind::Root => 1,
            VertexKind::Leaf => self.leaves.len(),
            VertexKind::Reticulation => self.reticulations.len(),
            VertexKind::Tree => self.vertex_count() - 1 - self.leaves.len() - self.reticulations.len(),
        }
    }

    /// Common in-degree × out-degree product of all inner vertices when it
    /// also equals the root's out-degree (2 means binary), otherwise 0.
    #[must_use]
    pub const fn regularity(&self) -> usize {
        self.regularity
    }

    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.regularity == 2
    }

    // -- labels -------------------------------------------------------------

    /// External label of `v`.
    #[must_use]
    pub fn label(&self, v: NodeIndex) -> &str {
        self.graph[v].as_str()
    }

    /// Look up the vertex with the given external label.
    #[must_use]
    pub fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.node_map.get(label).copied()
    }

    /// Labels of `vs`, sorted; used in log messages.
    #[must_use]
    pub fn labels<I: IntoIterator<Item = NodeIndex>>(&self, vs: I) -> Vec<&str> {
        let mut out: Vec<&str> = vs.into_iter().map(|v| self.label(v)).collect();
        out.sort_unstable();
        out
    }

    /// Labelled edges, sorted.
    #[must_use]
    pub fn edges(&self) -> Vec<(String, String)> {
        let mut edges: Vec<(String, String)> = self
            .graph
            .raw_edges()
            .iter()
            .map(|e| (self.graph[e.source()].clone(), self.graph[e.target()].clone()))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// BLAKE3 hash of the sorted edge list.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn compute_regularity(
    kinds: &[VertexKind],
    in_degree: &[usize],
    out_degree: &[usize],
    root: NodeIndex,
) -> usize {
    let mut product: Option<usize> = None;
    for (i, kind) in kinds.iter().enumerate() {
        if matches!(kind, VertexKind::Tree | VertexKind::Reticulation) {
            let p = in_degree[i] * out_degree[i];
            match product {
                None => product = Some(p),
                Some(k) if k != p => return 0,
                Some(_) => {}
            }
        }
    }
    match product {
        Some(k) if out_degree[root.index()] == k => k,
        _ => 0,
    }
}

/// Compute a BLAKE3 hash of the sorted edge list.
fn compute_edge_hash(edges: &[(String, String)]) -> String {
    let mut hasher = blake3::Hasher::new();
    for (parent, child) in edges {
        hasher.update(parent.as_bytes());
        hasher.update(b"\x00");
        hasher.update(child.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
