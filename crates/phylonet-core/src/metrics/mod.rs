//! Numeric structural invariants of a network.
//!
//! # Overview
//!
//! Each submodule computes one family of invariants. They are pure
//! functions of the [`Network`](crate::network::Network) and the derived
//! [`Stability`](crate::stability::Stability) and
//! [`Blocks`](crate::blocks::Blocks); caching and cross-property effects
//! live in [`PropertyEngine`](crate::property::PropertyEngine).
//!
//! - **`level`**: reticulation count, level, and unstable component roots
//!   (overall and per block).
//! - **`indegree`**: largest number of arcs entering a connected component
//!   of reticulations.
//! - **`nesting`**: nesting depth, or −1 for networks that are not nested.
//! - **`ancestors`**: uncommon ancestors of the parents of a reticulation.
//! - **`heights`**: shortest path and small/big reticulation heights, from
//!   one shared traversal.
//!
//! # Usage
//!
//! ```rust
//! use phylonet_core::blocks::Blocks;
//! use phylonet_core::metrics::level::level;
//! use phylonet_core::network::Network;
//!
//! let n = Network::from_edge_list("r a\nr b\na h\nb h\nh x\na y\nb z\n")?;
//! let blocks = Blocks::decompose(&n);
//! assert_eq!(level(&n, &blocks), 1);
//! # Ok::<(), phylonet_core::error::StructureError>(())
//! ```

pub mod ancestors;
pub mod heights;
pub mod indegree;
pub mod level;
pub mod nesting;

/// Convert a count to the `i64` used by property values.
pub(crate) fn as_value(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
