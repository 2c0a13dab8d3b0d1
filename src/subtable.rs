//! Per-variable canonicalization subtables.
//!
//! The compiler keeps one subtable per edge variable, mapping the `(low, high)`
//! children of a decision node to the handle of the unique node with that
//! variable and those children:
//!
//! ```text
//! subtables[e2] → {(@0, @1) → @2, (@3, @2) → @5, ...}
//! subtables[e3] → {(@0, @1) → @3, ...}
//! ...
//! ```
//!
//! Since all nodes in a subtable decide the same variable, the variable is not
//! part of the key. Together, the subtables form the canonicalization cache
//! keyed on `(variable, low, high)`.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::reference::Ref;
use crate::types::EdgeId;

/// Decision nodes on a single variable, keyed by their children.
#[derive(Debug, Clone)]
pub struct Subtable {
    /// The variable decided by every node in this subtable.
    pub variable: EdgeId,

    nodes: HashMap<(Ref, Ref), Ref>,
}

impl Subtable {
    /// Create a new empty subtable for the given variable.
    pub fn new(variable: EdgeId) -> Self {
        Self {
            variable,
            nodes: HashMap::new(),
        }
    }

    /// Look up a node by its children.
    pub fn find(&self, low: Ref, high: Ref) -> Option<Ref> {
        self.nodes.get(&(low, high)).copied()
    }

    /// Register a node under its children.
    ///
    /// # Panics
    ///
    /// Panics if a different node is already registered for the same children,
    /// which would break the uniqueness invariant.
    pub fn insert(&mut self, low: Ref, high: Ref, node: Ref) {
        match self.nodes.entry((low, high)) {
            Entry::Occupied(existing) => {
                assert_eq!(*existing.get(), node, "duplicate node for {} ({}, {})", self.variable, low, high);
            }
            Entry::Vacant(slot) => {
                slot.insert(node);
            }
        }
    }

    /// Get the number of nodes in this subtable.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the subtable is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all (low, high, node) tuples.
    pub fn iter(&self) -> impl Iterator<Item = (Ref, Ref, Ref)> + '_ {
        self.nodes.iter().map(|(&(low, high), &node)| (low, high, node))
    }
}
