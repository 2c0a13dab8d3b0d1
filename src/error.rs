//! Error types for formula construction, compilation and graph queries.

use thiserror::Error;

use crate::graph::NodeId;
use crate::types::EdgeId;

/// Errors reported at the input boundary.
///
/// Everything here is caused by malformed input and is never retried:
/// compilation is deterministic, so the same input fails the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An edge weight is not a probability (outside `[0, 1]`, or NaN).
    #[error("weight of {id} must be in [0, 1], got {weight}")]
    WeightOutOfRange { id: EdgeId, weight: f64 },

    /// A path or term without any edge.
    #[error("term must contain at least one variable")]
    EmptyTerm,

    /// A variable is referenced but missing from the declared universe.
    #[error("variable {0} is not declared in the universe")]
    UndeclaredVariable(EdgeId),

    /// A variable is declared in the universe but no term refers to it.
    #[error("variable {0} is declared but not used by any term")]
    UnusedVariable(EdgeId),

    /// The same edge was declared twice with different weights.
    #[error("variable {id} declared with conflicting weights {first} and {second}")]
    ConflictingWeight { id: EdgeId, first: f64, second: f64 },

    /// A graph operation refers to a node that does not exist.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// A blank node name in the named-node graph.
    #[error("invalid node name {0:?}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
