//! Graphs whose nodes are addressed by name.
//!
//! This is the form used for biological association networks, where edges are
//! given as `(tail, head, cost)` triples and the cost is a scaled negative
//! log-probability: `prob = exp(-cost / 1000)`. Edges are traversed in both
//! directions.

use std::collections::HashMap;

use log::debug;

use crate::error::{Error, Result};
use crate::graph::{Direction, EdgeFilter, NodeId, PathEnumerator, ProbGraph};
use crate::query::correlate;
use crate::types::EdgeId;

const EDGE: &str = "EDGE";

/// Converts a scaled negative log-probability into a probability.
pub fn cost_to_probability(cost: u32) -> f64 {
    (f64::from(cost) / -1000.0).exp()
}

fn normalize(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(name)
}

/// An undirected uncertain graph with string-named nodes.
#[derive(Debug, Clone, Default)]
pub struct NamedGraph {
    graph: ProbGraph,
    names: HashMap<String, NodeId>,
}

impl NamedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = self.graph.add_node(name, Vec::<String>::new());
        self.names.insert(name.to_string(), id);
        id
    }

    /// Links `tail` to `head` with probability `exp(-cost / 1000)`.
    ///
    /// Nodes are created on first mention. Returns `None` when the opposite
    /// edge `head -> tail` with the same probability already exists, since the
    /// graph is queried without regard to direction.
    pub fn add(&mut self, tail: &str, head: &str, cost: u32) -> Result<Option<EdgeId>> {
        let tail = normalize(tail)?;
        let head = normalize(head)?;
        let prob = cost_to_probability(cost);

        let start = self.node(tail);
        let end = self.node(head);

        if self
            .graph
            .edges_between(end, start, EDGE)
            .any(|e| e.variable.weight() == prob)
        {
            debug!("add: {} -- {} already linked with {}", tail, head, prob);
            return Ok(None);
        }

        self.graph.add_edge(EDGE, start, end, prob).map(Some)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name.trim())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The underlying graph.
    pub fn graph(&self) -> &ProbGraph {
        &self.graph
    }

    /// Probability that `source` and `target` are connected.
    ///
    /// Unknown names are not connected to anything (probability 0).
    pub fn probability(&self, source: &str, target: &str) -> Result<f64> {
        let source = normalize(source)?;
        let target = normalize(target)?;
        let (Some(&start), Some(&end)) = (self.names.get(source), self.names.get(target)) else {
            return Ok(0.0);
        };
        let filter = EdgeFilter::new().allow(EDGE, Direction::Both);
        correlate(&self.graph, start, end, &filter)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_cost_to_probability() {
        assert_eq!(cost_to_probability(0), 1.0);
        assert!((cost_to_probability(1000) - (-1.0f64).exp()).abs() < 1e-15);
        assert!(cost_to_probability(663) < 1.0);
    }

    #[test]
    fn test_names_are_trimmed() {
        let mut g = NamedGraph::new();
        g.add(" a ", "b", 100).unwrap();
        assert!(g.contains("a"));
        assert!(g.contains(" b"));
        assert_eq!(g.node_count(), 2);
        let a = g.names["a"];
        assert_eq!(g.graph().name(a), Some("a"));
        assert_eq!(g.graph().labels(a).count(), 0);
        assert_eq!(g.add("  ", "b", 100), Err(Error::InvalidName(String::new())));
        assert_eq!(g.probability("", "b"), Err(Error::InvalidName(String::new())));
    }

    #[test]
    fn test_reverse_duplicate_skipped() {
        let mut g = NamedGraph::new();
        assert!(g.add("a", "b", 100).unwrap().is_some());
        assert!(g.add("b", "a", 100).unwrap().is_none());
        assert!(g.add("b", "a", 200).unwrap().is_some());
        assert!(g.add("a", "b", 100).unwrap().is_some());
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn test_probability() {
        let mut g = NamedGraph::new();
        g.add("a", "b", 0).unwrap();
        g.add("c", "b", 1000).unwrap();

        assert_eq!(g.probability("a", "a").unwrap(), 1.0);
        assert_eq!(g.probability("a", "zzz").unwrap(), 0.0);

        // Edges are traversed against their direction too.
        let p = g.probability("a", "c").unwrap();
        assert!((p - cost_to_probability(1000)).abs() < 1e-12);
    }

    #[test]
    fn test_disconnected() {
        let mut g = NamedGraph::new();
        g.add("a", "b", 10).unwrap();
        g.add("c", "d", 10).unwrap();
        assert_eq!(g.probability("a", "d").unwrap(), 0.0);
    }
}
