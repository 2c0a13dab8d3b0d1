//! Edge identifiers and weighted Boolean variables.
//!
//! Every graph edge becomes a Boolean random variable: "the edge is present".
//! The variable carries the edge's stable identifier and its independent
//! probability of being present.
use std::fmt;

use crate::error::{Error, Result};

/// A stable edge identifier (1-indexed).
///
/// Identifiers are opaque apart from their ordering, which fixes the
/// elimination order used by the compiler.
///
/// # Invariants
///
/// - Edge IDs must be >= 1 (0 is reserved for terminals)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Creates a new edge identifier.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Edge IDs must be 1-indexed.
    pub fn new(id: u64) -> Self {
        assert_ne!(id, 0, "Edge IDs must be >= 1");
        EdgeId(id)
    }

    /// Returns the raw identifier.
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl From<EdgeId> for u64 {
    fn from(id: EdgeId) -> Self {
        id.0
    }
}

/// A Boolean random variable modelling the presence of one edge.
///
/// Immutable once created. The weight is validated on construction, so a
/// `Variable` always holds a probability in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Variable {
    id: EdgeId,
    weight: f64,
}

impl Variable {
    /// Creates a variable, rejecting weights outside `[0, 1]` (including NaN).
    pub fn new(id: EdgeId, weight: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(Error::WeightOutOfRange { id, weight });
        }
        Ok(Self { id, weight })
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Probability that the edge is present.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Weight of the "present" branch.
    pub fn high_weight(&self) -> f64 {
        self.weight
    }

    /// Weight of the "absent" branch.
    pub fn low_weight(&self) -> f64 {
        1.0 - self.weight
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.weight)
    }
}
