#![forbid(unsafe_code)]
//! phylonet-core library.
//!
//! Structural classification of rooted phylogenetic networks.
//!
//! ```text
//! network  ──▶ blocks ───────┐
//!    │                       ├──▶ metrics ──▶ property ──▶ report
//!    └──────▶ stability ─────┘
//! ```
//!
//! # Conventions
//!
//! - **Errors**: [`error::StructureError`] for invalid networks,
//!   `anyhow::Result` for I/O and configuration.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Indices**: every analysis addresses vertices by dense `NodeIndex`;
//!   labels only appear at the edges of the API and in log fields.

pub mod blocks;
pub mod config;
pub mod error;
pub mod metrics;
pub mod network;
pub mod property;
pub mod report;
pub mod stability;

pub use config::AnalysisConfig;
pub use error::{PropertyError, StructureError};
pub use network::{Network, VertexKind};
pub use property::{Property, PropertyEngine, Value};
pub use report::NetworkReport;
