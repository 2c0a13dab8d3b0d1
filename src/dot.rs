//! Diagram to DOT (Graphviz) conversion.
//!
//! The generated DOT output follows these conventions:
//! - **Terminal nodes** (0 and 1) are rendered as squares at the bottom (sink rank)
//! - **Decision nodes** are rendered as circles, grouped by their edge variable
//! - **Edges**:
//!   - Solid lines represent high (edge present) branches
//!   - Dashed lines represent low (edge absent) branches
//!   - Optionally labelled with the branch weight
//! - **The root** is rendered as a rectangle at the top (source rank)
//!
//! Export is a debugging aid; it plays no part in computing probabilities.
//!
//! # Examples
//!
//! ```
//! use probreach::diagram::Diagram;
//! use probreach::formula::Formula;
//! use probreach::types::{EdgeId, Variable};
//!
//! let x = Variable::new(EdgeId::new(1), 0.5)?;
//! let diagram = Diagram::compile(&Formula::from_paths([vec![x]])?);
//!
//! let dot = diagram.to_dot().unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! assert!(dot.starts_with("digraph {"));
//! # Ok::<(), probreach::error::Error>(())
//! ```

use std::collections::BTreeMap;

use crate::diagram::Diagram;
use crate::node::Node;
use crate::reference::Ref;
use crate::types::EdgeId;

/// Configuration options for DOT output generation.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for decision nodes (default: "circle")
    pub node_shape: &'static str,
    /// Shape for terminal nodes (default: "square")
    pub terminal_shape: &'static str,
    /// Shape for the root marker (default: "rect")
    pub root_shape: &'static str,
    /// Style for high (present) edges (default: "solid")
    pub high_edge_style: &'static str,
    /// Style for low (absent) edges (default: "dashed")
    pub low_edge_style: &'static str,
    /// Whether to label edges with their branch weight (default: true)
    pub show_weights: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            terminal_shape: "square",
            root_shape: "rect",
            high_edge_style: "solid",
            low_edge_style: "dashed",
            show_weights: true,
        }
    }
}

impl Diagram {
    /// Converts the diagram to DOT format with the default configuration.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the diagram to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        use std::fmt::Write as _;

        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "node [shape={}];", config.node_shape)?;

        writeln!(dot, "{{ rank=sink")?;
        writeln!(dot, "0 [shape={}, label=\"0\"];", config.terminal_shape)?;
        writeln!(dot, "1 [shape={}, label=\"1\"];", config.terminal_shape)?;
        writeln!(dot, "}}")?;

        let mut all_nodes: Vec<Ref> = self.descendants().into_iter().filter(|n| !n.is_terminal()).collect();
        all_nodes.sort();

        // Group nodes deciding the same edge on one rank
        let mut levels = BTreeMap::<EdgeId, Vec<Ref>>::new();
        for &node in all_nodes.iter() {
            if let Some(edge) = self.node(node).edge() {
                levels.entry(edge).or_default().push(node);
            }
        }
        for (edge, nodes) in levels.iter() {
            writeln!(dot, "{{ rank=same")?;
            for node in nodes {
                writeln!(dot, "{} [label=\"{}\"];", node.index(), edge)?;
            }
            writeln!(dot, "}}")?;
        }

        for &node in all_nodes.iter() {
            let Node::Decision { variable, low, high } = self.node(node) else {
                continue;
            };
            let (high_label, low_label) = if config.show_weights {
                (
                    format!(", label=\"{}\"", variable.high_weight()),
                    format!(", label=\"{}\"", variable.low_weight()),
                )
            } else {
                (String::new(), String::new())
            };
            writeln!(
                dot,
                "{} -> {} [style={}{}];",
                node.index(),
                high.index(),
                config.high_edge_style,
                high_label
            )?;
            writeln!(
                dot,
                "{} -> {} [style={}{}];",
                node.index(),
                low.index(),
                config.low_edge_style,
                low_label
            )?;
        }

        writeln!(dot, "{{ rank=source")?;
        writeln!(dot, "r [shape={}, label=\"{}\"];", config.root_shape, self.root())?;
        writeln!(dot, "}}")?;
        writeln!(dot, "r -> {};", self.root().index())?;

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
