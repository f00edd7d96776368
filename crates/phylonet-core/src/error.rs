//! Error types surfaced by the network model and the property engine.
//!
//! Structural errors are fatal for the network they were raised on: no
//! partial classification is attempted once a [`StructureError`] is returned.

/// A violated structural invariant of a rooted phylogenetic network.
///
/// Every variant names the offending vertex (or vertices) by its external
/// label so the message can be shown to users as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    /// The edge list yielded no vertex of in-degree 0.
    #[error("no root in network")]
    NoRoot,

    /// More than one vertex has in-degree 0.
    #[error("more than one root in the network: {first} & {second}")]
    MultipleRoots { first: String, second: String },

    /// A vertex with in-degree 1 and out-degree 1 survived contraction.
    #[error("{vertex} has indegree & outdegree 1")]
    TrivialVertex { vertex: String },

    /// A vertex is both a reticulation and a branching vertex.
    #[error("{vertex} has indegree {in_degree} & outdegree {out_degree} (both > 1)")]
    ForbiddenDegrees {
        vertex: String,
        in_degree: usize,
        out_degree: usize,
    },

    /// A reticulation without a child.
    #[error("reticulation {vertex} has no child")]
    ChildlessReticulation { vertex: String },

    /// An edge from a vertex to itself.
    #[error("self-loop on {vertex}")]
    SelfLoop { vertex: String },

    /// The edge list contains a directed cycle through `vertex`.
    #[error("network contains a directed cycle through {vertex}")]
    Cycle { vertex: String },
}

/// Errors raised when addressing properties by their short codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    /// The short code does not name any known property.
    #[error("unknown property code: {0}")]
    UnknownCode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_vertex() {
        let err = StructureError::TrivialVertex {
            vertex: "v7".to_string(),
        };
        assert_eq!(err.to_string(), "v7 has indegree & outdegree 1");

        let err = StructureError::MultipleRoots {
            first: "a".to_string(),
            second: "b".to_string(),
        };
        assert!(err.to_string().contains("a & b"));
    }

    #[test]
    fn forbidden_degrees_reports_both_degrees() {
        let err = StructureError::ForbiddenDegrees {
            vertex: "x".to_string(),
            in_degree: 2,
            out_degree: 3,
        };
        assert_eq!(err.to_string(), "x has indegree 2 & outdegree 3 (both > 1)");
    }
}
