//! Iterator over weighted paths to `One` in a compiled diagram.
//!
//! Each yielded [`WeightedPath`] lists the decisions taken from the root
//! (`(edge, present?)`) and the product of the corresponding branch weights.
//! Summing the weights of all yielded paths gives exactly
//! [`Diagram::probability`].
//!
//! # Example
//!
//! ```
//! use probreach::diagram::Diagram;
//! use probreach::formula::Formula;
//! use probreach::types::{EdgeId, Variable};
//!
//! let a = Variable::new(EdgeId::new(1), 0.5)?;
//! let b = Variable::new(EdgeId::new(2), 0.5)?;
//! let diagram = Diagram::compile(&Formula::from_paths([vec![a], vec![b]])?);
//!
//! let paths: Vec<_> = diagram.paths().collect();
//! assert_eq!(paths.len(), 2); // {e1} and {!e1, e2}
//!
//! let total: f64 = paths.iter().map(|p| p.weight).sum();
//! assert!((total - diagram.probability()).abs() < 1e-12);
//! # Ok::<(), probreach::error::Error>(())
//! ```
//!
//! Note: the number of paths can be exponential in the number of variables.

use std::fmt;

use crate::diagram::Diagram;
use crate::node::Node;
use crate::reference::Ref;
use crate::types::EdgeId;

/// One decision on a path: the edge and whether it was taken as present.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Step {
    pub edge: EdgeId,
    pub present: bool,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", if self.present { "" } else { "!" }, self.edge)
    }
}

/// A root-to-`One` path and the product of its branch weights.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPath {
    pub steps: Vec<Step>,
    pub weight: f64,
}

impl Diagram {
    /// Returns an iterator over all paths from the root to `One`.
    pub fn paths(&self) -> DiagramPaths<'_> {
        DiagramPaths::new(self)
    }
}

#[derive(Debug, Clone, Copy)]
enum Branch {
    High,
    Low,
}

#[derive(Debug)]
struct StackFrame {
    node: Ref,
    /// Which branch to explore next (None if both explored)
    next_branch: Option<Branch>,
    /// Product of branch weights from the root to this node.
    weight: f64,
}

/// Depth-first iterator over weighted paths.
///
/// Created by [`Diagram::paths()`]. The current path is kept in a single
/// vector that grows and shrinks with the stack.
pub struct DiagramPaths<'a> {
    diagram: &'a Diagram,
    stack: Vec<StackFrame>,
    current_path: Vec<Step>,
}

impl<'a> DiagramPaths<'a> {
    pub fn new(diagram: &'a Diagram) -> Self {
        DiagramPaths {
            diagram,
            stack: vec![StackFrame {
                node: diagram.root(),
                next_branch: Some(Branch::High),
                weight: 1.0,
            }],
            current_path: Vec::new(),
        }
    }

    fn backtrack(&mut self) {
        self.stack.pop();
        if !self.stack.is_empty() {
            self.current_path.pop();
        }
    }
}

impl Iterator for DiagramPaths<'_> {
    type Item = WeightedPath;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let diagram = self.diagram;
            let max_depth = diagram.max_depth();
            let frame = self.stack.last_mut()?;
            let node = frame.node;
            let weight = frame.weight;
            let next_branch = frame.next_branch;

            let (variable, low, high) = match diagram.node(node) {
                Node::One => {
                    let result = WeightedPath {
                        steps: self.current_path.clone(),
                        weight,
                    };
                    self.backtrack();
                    return Some(result);
                }
                Node::Zero => {
                    self.backtrack();
                    continue;
                }
                Node::Decision { variable, low, high } => (*variable, *low, *high),
            };

            match next_branch {
                Some(Branch::High) => {
                    frame.next_branch = Some(Branch::Low);
                    self.current_path.push(Step {
                        edge: variable.id(),
                        present: true,
                    });
                    self.stack.push(StackFrame {
                        node: high,
                        next_branch: Some(Branch::High),
                        weight: weight * variable.high_weight(),
                    });
                }
                Some(Branch::Low) => {
                    frame.next_branch = None;
                    self.current_path.push(Step {
                        edge: variable.id(),
                        present: false,
                    });
                    self.stack.push(StackFrame {
                        node: low,
                        next_branch: Some(Branch::High),
                        weight: weight * variable.low_weight(),
                    });
                }
                None => {
                    self.backtrack();
                    continue;
                }
            }

            assert!(
                self.current_path.len() <= max_depth,
                "path exceeds the depth bound {}",
                max_depth
            );
        }
    }
}
