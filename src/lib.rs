//! # probreach: connection probability in uncertain graphs
//!
//! **`probreach`** computes the probability that two nodes of an *uncertain graph* are connected.
//! Every edge is present independently with its own probability; the answer is the probability
//! that at least one admissible path between the two nodes has all of its edges present.
//!
//! ## How it works
//!
//! 1. A [`PathEnumerator`][crate::graph::PathEnumerator] lists every loop-free path from the source
//!    to the target whose edges pass an [`EdgeFilter`][crate::graph::EdgeFilter].
//! 2. The paths become a [`Formula`][crate::formula::Formula]: a disjunction of conjunctive terms,
//!    one term per path, one Boolean variable per edge.
//! 3. The formula is compiled into a reduced, shared [`Diagram`][crate::diagram::Diagram]. Equal
//!    sub-diagrams are stored once (hash consing), and nodes whose two children coincide are dropped.
//! 4. The diagram is evaluated bottom-up as a weighted sum, memoized per node.
//!
//! Sharing is what keeps the evaluation tractable: paths in real graphs overlap heavily, and
//! the overlapping parts are built and weighed once.
//!
//! ## Basic Usage
//!
//! ```rust
//! use probreach::graph::{Direction, EdgeFilter, ProbGraph};
//!
//! let mut graph = ProbGraph::new();
//! let a = graph.add_node("A", ["Person"]);
//! let b = graph.add_node("B", ["Person"]);
//! let c = graph.add_node("C", ["Person"]);
//! graph.add_edge("KNOWS", a, b, 0.5)?;
//! graph.add_edge("KNOWS", b, c, 0.5)?;
//! graph.add_edge("KNOWS", a, c, 0.2)?;
//!
//! let filter = EdgeFilter::new().allow("KNOWS", Direction::Outgoing);
//! let p = graph.probability_of_connection(a, c, &filter)?;
//! assert!(p > 0.2 && p < 1.0);
//! # Ok::<(), probreach::error::Error>(())
//! ```
//!
//! ## Core Components
//!
//! - **[`diagram`]**: Compilation of formulas into reduced decision diagrams.
//! - **[`probability`]**: Evaluation and path counting.
//! - **[`query`]**: End-to-end source/target queries over any [`PathEnumerator`][crate::graph::PathEnumerator].
//! - **[`named`]**: Undirected graphs with named nodes and cost-weighted edges.
//! - **[`dot`]**: Utilities for visualizing diagrams using Graphviz.

pub mod diagram;
pub mod dot;
pub mod error;
pub mod formula;
pub mod graph;
pub mod named;
pub mod node;
pub mod paths;
pub mod probability;
pub mod query;
pub mod reference;
pub mod subtable;
pub mod types;
