#![forbid(unsafe_code)]
//! phylonet-sim library.
//!
//! Random network generators and proptest strategies built on them.
//!
//! ```text
//! regular_tree ──▶ random_binary ──▶ strategies
//!                        │
//!                        └──▶ phylonet-cli `random`
//! ```
//!
//! # Conventions
//!
//! - **Errors**: [`GeneratorError`] for impossible parameters.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Randomness**: every generator takes `&mut impl Rng`; seed a
//!   `StdRng` for reproducible runs.
//!
//! Vertices of generated networks are labelled `0`, `1`, ... in creation
//! order; `0` is the root.

pub mod binary;
pub mod error;
pub mod strategies;
pub mod tree;

pub use binary::{random_binary, reticulation_count};
pub use error::GeneratorError;
pub use tree::regular_tree;
