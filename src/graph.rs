//! Uncertain graphs and bounded all-simple-paths enumeration.
//!
//! [`PathEnumerator`] is the only capability the probability computation needs
//! from a graph store: list every loop-free path between two nodes whose edges
//! are admitted by an [`EdgeFilter`], up to a maximum number of edges.
//! [`ProbGraph`] is a small in-memory implementation of it.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use log::debug;

use crate::dot::DotConfig;
use crate::error::{Error, Result};
use crate::types::{EdgeId, Variable};

/// A path as seen by the compiler: the weighted edges it traverses, in order.
pub type Path = Vec<Variable>;

/// Traversal direction of an edge relative to the current node.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Direction {
    /// From tail to head.
    Outgoing,
    /// From head to tail.
    Incoming,
    /// Either way.
    Both,
}

impl Direction {
    fn admits(self, outgoing: bool) -> bool {
        match self {
            Direction::Outgoing => outgoing,
            Direction::Incoming => !outgoing,
            Direction::Both => true,
        }
    }
}

/// Admissible `(kind, direction)` combinations for a traversal step.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct EdgeFilter {
    rules: BTreeSet<(String, Direction)>,
}

impl EdgeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit edges of `kind` traversed in `direction`.
    pub fn allow(mut self, kind: impl Into<String>, direction: Direction) -> Self {
        self.rules.insert((kind.into(), direction));
        self
    }

    /// Whether an edge of `kind` may be traversed (`outgoing` = tail to head).
    pub fn admits(&self, kind: &str, outgoing: bool) -> bool {
        self.rules
            .iter()
            .any(|(k, direction)| k == kind && direction.admits(outgoing))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Source of candidate paths between two nodes.
pub trait PathEnumerator {
    type Node: Copy + Eq + fmt::Debug;

    /// Number of edges known to the graph.
    fn edge_count(&self) -> usize;

    /// All loop-free paths from `source` to `target` with at most `max_length`
    /// edges, every step admitted by `filter`.
    fn find_all_paths(
        &self,
        source: Self::Node,
        target: Self::Node,
        filter: &EdgeFilter,
        max_length: usize,
    ) -> Result<Vec<Path>>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    labels: BTreeSet<String>,
    /// Incident edges (as indices into `edges`), both directions.
    incident: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub kind: String,
    pub tail: NodeId,
    pub head: NodeId,
    pub variable: Variable,
}

/// In-memory directed graph with typed, probabilistic edges.
#[derive(Debug, Clone, Default)]
pub struct ProbGraph {
    nodes: Vec<NodeData>,
    edges: Vec<Edge>,
}

impl ProbGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: impl Into<String>, labels: impl IntoIterator<Item = impl Into<String>>) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("too many nodes"));
        self.nodes.push(NodeData {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            incident: Vec::new(),
        });
        id
    }

    /// Adds an edge `tail -> head` of the given kind, present with probability `prob`.
    ///
    /// Edge ids are assigned sequentially from 1.
    pub fn add_edge(&mut self, kind: impl Into<String>, tail: NodeId, head: NodeId, prob: f64) -> Result<EdgeId> {
        self.check(tail)?;
        self.check(head)?;
        let id = EdgeId::new(self.edges.len() as u64 + 1);
        let variable = Variable::new(id, prob)?;
        let index = self.edges.len();
        self.edges.push(Edge {
            kind: kind.into(),
            tail,
            head,
            variable,
        });
        self.nodes[tail.index()].incident.push(index);
        if head != tail {
            self.nodes[head.index()].incident.push(index);
        }
        debug!("add_edge: {} = {} -> {} ({})", id, tail, head, prob);
        Ok(id)
    }

    fn check(&self, node: NodeId) -> Result<()> {
        if node.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::UnknownNode(node))
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.index()).map(|n| n.name.as_str())
    }

    pub fn labels(&self, node: NodeId) -> impl Iterator<Item = &str> + '_ {
        self.nodes
            .get(node.index())
            .into_iter()
            .flat_map(|n| n.labels.iter().map(String::as_str))
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.id() as usize - 1)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }

    /// Edges `tail -> head` of the given kind.
    pub fn edges_between<'a>(&'a self, tail: NodeId, head: NodeId, kind: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.nodes
            .get(tail.index())
            .into_iter()
            .flat_map(|n| n.incident.iter())
            .map(move |&i| &self.edges[i])
            .filter(move |e| e.tail == tail && e.head == head && e.kind == kind)
    }

    /// Renders the graph itself (not a compiled diagram) as Graphviz DOT.
    ///
    /// Nodes are labelled with their name and labels, edges with their kind and,
    /// if `config.show_weights`, their probability.
    pub fn to_dot(&self, config: &DotConfig) -> std::result::Result<String, fmt::Error> {
        use std::fmt::Write as _;

        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "node [shape={}];", config.node_shape)?;
        for (index, node) in self.nodes.iter().enumerate() {
            let mut label = node.name.clone();
            for l in &node.labels {
                write!(label, "\\n:{}", l)?;
            }
            writeln!(dot, "{} [label=\"{}\"];", index, label.replace('"', "\\\""))?;
        }
        for edge in &self.edges {
            let label = if config.show_weights {
                format!("{} {}", edge.kind, edge.variable)
            } else {
                edge.kind.clone()
            };
            writeln!(
                dot,
                "{} -> {} [style={}, label=\"{}\"];",
                edge.tail.index(),
                edge.head.index(),
                config.high_edge_style,
                label.replace('"', "\\\"")
            )?;
        }
        writeln!(dot, "}}")?;
        Ok(dot)
    }

    #[allow(clippy::too_many_arguments)]
    fn walk(
        &self,
        current: NodeId,
        target: NodeId,
        filter: &EdgeFilter,
        max_length: usize,
        visited: &mut HashSet<NodeId>,
        stack: &mut Path,
        result: &mut Vec<Path>,
    ) {
        if current == target {
            result.push(stack.clone());
            return;
        }
        if stack.len() == max_length {
            return;
        }
        for &index in &self.nodes[current.index()].incident {
            let edge = &self.edges[index];
            // A self-loop never extends a simple path.
            if edge.tail == edge.head {
                continue;
            }
            let outgoing = edge.tail == current;
            if !filter.admits(&edge.kind, outgoing) {
                continue;
            }
            let next = if outgoing { edge.head } else { edge.tail };
            if !visited.insert(next) {
                continue;
            }
            stack.push(edge.variable);
            self.walk(next, target, filter, max_length, visited, stack, result);
            stack.pop();
            visited.remove(&next);
        }
    }
}

impl PathEnumerator for ProbGraph {
    type Node = NodeId;

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn find_all_paths(&self, source: NodeId, target: NodeId, filter: &EdgeFilter, max_length: usize) -> Result<Vec<Path>> {
        self.check(source)?;
        self.check(target)?;

        let mut result = Vec::new();
        let mut visited = HashSet::from([source]);
        let mut stack = Vec::new();
        self.walk(source, target, filter, max_length, &mut visited, &mut stack, &mut result);
        debug!(
            "find_all_paths({}, {}, max_length = {}): {} paths",
            source,
            target,
            max_length,
            result.len()
        );
        Ok(result)
    }
}
