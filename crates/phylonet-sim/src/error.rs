use phylonet_core::StructureError;
use thiserror::Error;

/// Parameters no network can satisfy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneratorError {
    #[error("regularity must be at least 2, got {regularity}")]
    Regularity { regularity: usize },

    #[error("no {regularity}-regular tree with {vertices} vertices exists")]
    NoRegularTree { vertices: usize, regularity: usize },

    #[error("no network with an even number of vertices ({vertices}) can be binary")]
    EvenVertexCount { vertices: usize },

    #[error("a binary network needs at least 3 vertices, got {vertices}")]
    TooFewVertices { vertices: usize },

    #[error("mean reticulation number must be finite and non-negative, got {mean}")]
    InvalidMean { mean: f64 },

    #[error("generated an invalid network: {0}")]
    Structure(#[from] StructureError),
}
