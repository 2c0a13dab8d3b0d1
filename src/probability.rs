//! Weighted evaluation of compiled diagrams.
//!
//! The probability of a diagram is the sum, over every path from the root to
//! the `One` terminal, of the product of the branch weights along that path:
//! `1 - w` for each low edge taken and `w` for each high edge taken. Because
//! the diagram is a DAG, the sum is accumulated per node and shared between
//! parents, instead of enumerating every path separately (see
//! [`paths`](crate::paths) for the enumerating form).

use std::collections::HashMap;

use log::{debug, info};
use num_bigint::BigUint;

use crate::diagram::Diagram;
use crate::node::Node;
use crate::reference::Ref;

impl Diagram {
    /// Probability that at least one path of the compiled formula holds.
    ///
    /// Computed on the first call and memoized; later calls return the cached
    /// value.
    ///
    /// # Panics
    ///
    /// Panics if a path longer than [`max_depth`](Diagram::max_depth) is
    /// encountered, which would mean the diagram is malformed.
    pub fn probability(&self) -> f64 {
        *self.probability.get_or_init(|| {
            let mut cache = HashMap::new();
            let value = self._probability(self.root(), 0, &mut cache);
            info!("probability({}) = {}", self.root(), value);
            value
        })
    }

    fn _probability(&self, node: Ref, depth: usize, cache: &mut HashMap<Ref, f64>) -> f64 {
        assert!(
            depth <= self.max_depth(),
            "path exceeds the depth bound {} at {}",
            self.max_depth(),
            node
        );

        match self.node(node) {
            Node::Zero => 0.0,
            Node::One => 1.0,
            Node::Decision { variable, low, high } => {
                if let Some(&value) = cache.get(&node) {
                    return value;
                }
                let p_low = self._probability(*low, depth + 1, cache);
                let p_high = self._probability(*high, depth + 1, cache);
                let value = variable.low_weight() * p_low + variable.high_weight() * p_high;
                debug!(
                    "probability({}) = {} * {} + {} * {} = {}",
                    node,
                    variable.low_weight(),
                    p_low,
                    variable.high_weight(),
                    p_high,
                    value
                );
                cache.insert(node, value);
                value
            }
        }
    }

    /// Number of distinct paths from the root to the `One` terminal.
    pub fn path_count(&self) -> BigUint {
        let mut cache = HashMap::new();
        self._path_count(self.root(), &mut cache)
    }

    fn _path_count(&self, node: Ref, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        match self.node(node) {
            Node::Zero => BigUint::ZERO,
            Node::One => BigUint::from(1u32),
            Node::Decision { low, high, .. } => {
                if let Some(count) = cache.get(&node) {
                    return count.clone();
                }
                let count = self._path_count(*low, cache) + self._path_count(*high, cache);
                cache.insert(node, count.clone());
                count
            }
        }
    }
}
