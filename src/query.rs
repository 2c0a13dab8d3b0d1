//! Source-to-target connection probability queries.
//!
//! A query asks a [`PathEnumerator`] for every admissible loop-free path
//! between two nodes, turns the paths into a [`Formula`], compiles it and
//! evaluates the resulting [`Diagram`].
//!
//! ```
//! use probreach::graph::{Direction, EdgeFilter, ProbGraph};
//! use probreach::query::correlate;
//!
//! let mut graph = ProbGraph::new();
//! let a = graph.add_node("A", ["Person"]);
//! let b = graph.add_node("B", ["Person"]);
//! graph.add_edge("KNOWS", a, b, 0.5)?;
//!
//! let filter = EdgeFilter::new().allow("KNOWS", Direction::Outgoing);
//! assert_eq!(correlate(&graph, a, b, &filter)?, 0.5);
//! assert_eq!(correlate(&graph, b, a, &filter)?, 0.0);
//! assert_eq!(correlate(&graph, a, a, &filter)?, 1.0);
//! # Ok::<(), probreach::error::Error>(())
//! ```

use log::info;

use crate::diagram::Diagram;
use crate::error::Result;
use crate::formula::{Formula, Term};
use crate::graph::{EdgeFilter, NodeId, PathEnumerator, ProbGraph};
use crate::types::Variable;

/// Options for a single query.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Maximum number of edges per path. Defaults to `1 + edge_count`, which
    /// covers every loop-free path.
    pub max_length: Option<usize>,
}

/// Builds the diagram answering "is `source` connected to `target`?".
///
/// Identical endpoints give the constant `One` diagram without consulting the
/// enumerator; no admissible path gives the constant `Zero` diagram.
pub fn build_diagram<G: PathEnumerator>(
    graph: &G,
    source: G::Node,
    target: G::Node,
    filter: &EdgeFilter,
    options: &QueryOptions,
) -> Result<Diagram> {
    if source == target {
        info!("build_diagram({:?}, {:?}): same node", source, target);
        return Ok(Diagram::constant(true));
    }

    let max_length = options.max_length.unwrap_or(1 + graph.edge_count());
    let paths = graph.find_all_paths(source, target, filter, max_length)?;
    info!(
        "build_diagram({:?}, {:?}): {} paths with at most {} edges",
        source,
        target,
        paths.len(),
        max_length
    );
    if paths.is_empty() {
        return Ok(Diagram::constant(false));
    }

    let formula = Formula::from_paths(paths)?;
    Ok(Diagram::compile(&formula))
}

/// Probability that at least one admissible path connects `source` to `target`.
pub fn correlate<G: PathEnumerator>(graph: &G, source: G::Node, target: G::Node, filter: &EdgeFilter) -> Result<f64> {
    correlate_with(graph, source, target, filter, &QueryOptions::default())
}

pub fn correlate_with<G: PathEnumerator>(
    graph: &G,
    source: G::Node,
    target: G::Node,
    filter: &EdgeFilter,
    options: &QueryOptions,
) -> Result<f64> {
    let diagram = build_diagram(graph, source, target, filter, options)?;
    Ok(diagram.probability())
}

/// Compiles already-built terms over a declared universe and evaluates them.
pub fn compile_and_evaluate(
    terms: impl IntoIterator<Item = Term>,
    universe: impl IntoIterator<Item = Variable>,
) -> Result<f64> {
    let formula = Formula::new(terms, universe)?;
    Ok(Diagram::compile(&formula).probability())
}

impl ProbGraph {
    /// Probability that `source` is connected to `target` through edges admitted by `filter`.
    pub fn probability_of_connection(&self, source: NodeId, target: NodeId, filter: &EdgeFilter) -> Result<f64> {
        correlate(self, source, target, filter)
    }
}
