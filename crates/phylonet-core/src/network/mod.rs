//! Network model: construction, contraction, validation, classification.
//!
//! # Pipeline
//!
//! ```text
//! edge list text
//!        ↓  build::parse_edge_list()
//! Vec<(parent, child)>
//!        ↓  build::RawNetwork::from_edges()
//! RawNetwork (StableDiGraph, may hold trivial vertices)
//!        ↓  RawNetwork::contract_trivial_vertices()
//!        ↓  model::Network::from_raw()   (validate + compact)
//! Network (dense DiGraph, cached degrees and kinds)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use phylonet_core::network::{Network, VertexKind};
//!
//! let n = Network::from_edge_list("r a\nr b\na h\nb h\nh x\na y\nb z\n")?;
//! let h = n.node_index("h").expect("h is a vertex");
//! assert_eq!(n.kind(h), VertexKind::Reticulation);
//! # Ok::<(), phylonet_core::error::StructureError>(())
//! ```

pub mod build;
pub mod model;

// Re-export primary types at module level for convenience.
pub use build::{RawNetwork, parse_edge_list};
pub use model::{Network, VertexKind};
