//! Compilation of path formulas into reduced, shared decision diagrams.
//!
//! A [`Diagram`] owns an arena of [`Node`]s addressed by [`Ref`] handles.
//! Handles `@0` and `@1` are the `Zero` and `One` terminals; every other node
//! decides one edge variable and points to a `low` child (edge absent) and a
//! `high` child (edge present). Nodes are shared between parents, so the
//! diagram is a DAG rather than a tree.
//!
//! # Compilation
//!
//! The formula is decomposed by Shannon-style splitting on one variable at a
//! time. Variables are eliminated in ascending [`EdgeId`] order, fixed once per
//! compilation. At each step, with `v` the first remaining variable:
//!
//! - terms containing `v` go to the high side, the others to the low side;
//! - the low child is `Zero` if no term is left, `One` if no variable is left,
//!   and the recursive result otherwise;
//! - the high child is `One` if no term is left or no variable is left, and
//!   the recursive result otherwise.
//!
//! The resulting node goes through [`mk_node`](Compiler::mk_node), which
//! applies the reduction rule (`low == high` collapses to the child) and looks
//! up the canonicalization cache, so no two decision nodes share the same
//! `(variable, low, high)` triple.
//!
//! # Example
//!
//! ```
//! use probreach::diagram::Diagram;
//! use probreach::formula::Formula;
//! use probreach::types::{EdgeId, Variable};
//!
//! let a = Variable::new(EdgeId::new(1), 0.3)?;
//! let b = Variable::new(EdgeId::new(2), 0.6)?;
//!
//! // Two edge-disjoint paths: {a} or {b}.
//! let formula = Formula::from_paths([vec![a], vec![b]])?;
//! let diagram = Diagram::compile(&formula);
//!
//! let expected = 1.0 - (1.0 - 0.3) * (1.0 - 0.6);
//! assert!((diagram.probability() - expected).abs() < 1e-12);
//! # Ok::<(), probreach::error::Error>(())
//! ```

use std::cell::OnceCell;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::formula::{Formula, Term};
use crate::node::Node;
use crate::reference::Ref;
use crate::subtable::Subtable;
use crate::types::{EdgeId, Variable};

/// Counters collected while compiling one diagram.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct CompileStats {
    /// Lookups answered by the canonicalization cache.
    pub hits: usize,
    /// Lookups that allocated a new decision node.
    pub misses: usize,
    /// Requests collapsed by the reduction rule (`low == high`).
    pub reductions: usize,
}

/// Builder state for a single compilation.
///
/// The canonicalization cache lives here and is dropped with the compiler, so
/// nothing is shared between compilations.
struct Compiler {
    nodes: Vec<Node>,
    subtables: HashMap<EdgeId, Subtable>,
    stats: CompileStats,
}

impl Compiler {
    fn new() -> Self {
        Self {
            nodes: vec![Node::Zero, Node::One],
            subtables: HashMap::new(),
            stats: CompileStats::default(),
        }
    }

    fn mk_node(&mut self, variable: Variable, low: Ref, high: Ref) -> Ref {
        debug!("mk(v = {}, low = {}, high = {})", variable.id(), low, high);

        // Handle duplicates
        if low == high {
            debug!("mk: duplicates {} == {}", low, high);
            self.stats.reductions += 1;
            return low;
        }

        let subtable = self
            .subtables
            .entry(variable.id())
            .or_insert_with(|| Subtable::new(variable.id()));
        if let Some(node) = subtable.find(low, high) {
            debug!("mk: cache hit {}", node);
            self.stats.hits += 1;
            return node;
        }

        let index = u32::try_from(self.nodes.len()).expect("diagram exceeds u32::MAX nodes");
        let node = Ref::new(index);
        self.nodes.push(Node::Decision { variable, low, high });
        subtable.insert(low, high, node);
        self.stats.misses += 1;
        node
    }

    /// Decompose `terms` over the remaining `variables` (a suffix of the
    /// elimination order).
    fn build(&mut self, terms: &[&Term], variables: &[Variable]) -> Ref {
        let Some((&v, rest)) = variables.split_first() else {
            return Ref::ZERO;
        };

        let (hi_terms, lo_terms): (Vec<&Term>, Vec<&Term>) = terms.iter().partition(|t| t.contains(v.id()));
        debug!(
            "build: split on {} with {} high / {} low terms, {} variables left",
            v.id(),
            hi_terms.len(),
            lo_terms.len(),
            rest.len()
        );

        let low = if lo_terms.is_empty() {
            Ref::ZERO
        } else if rest.is_empty() {
            Ref::ONE
        } else {
            self.build(&lo_terms, rest)
        };

        let high = if hi_terms.is_empty() || rest.is_empty() {
            Ref::ONE
        } else {
            self.build(&hi_terms, rest)
        };

        self.mk_node(v, low, high)
    }
}

/// A compiled decision diagram for one query.
///
/// Immutable after construction. The probability is computed on first request
/// and memoized.
pub struct Diagram {
    nodes: Vec<Node>,
    root: Ref,
    variable_count: usize,
    stats: CompileStats,
    pub(crate) probability: OnceCell<f64>,
}

impl Diagram {
    /// Compiles a formula, eliminating every declared variable.
    pub fn compile(formula: &Formula) -> Self {
        let variables: Vec<Variable> = formula.variables().copied().collect();
        Self::compile_ordered(formula, variables)
    }

    /// Compiles a formula, eliminating only the given variables.
    ///
    /// Every variable must be declared in the formula's universe. Duplicates
    /// are ignored; the elimination order is still ascending edge id.
    pub fn compile_with(formula: &Formula, variables: impl IntoIterator<Item = EdgeId>) -> Result<Self> {
        let ids: BTreeSet<EdgeId> = variables.into_iter().collect();
        let mut order = Vec::with_capacity(ids.len());
        for id in ids {
            let variable = formula.variable(id).ok_or(Error::UndeclaredVariable(id))?;
            order.push(*variable);
        }
        Ok(Self::compile_ordered(formula, order))
    }

    fn compile_ordered(formula: &Formula, variables: Vec<Variable>) -> Self {
        debug_assert!(variables.windows(2).all(|w| w[0].id() < w[1].id()));
        debug_assert!(variables.iter().all(|v| (0.0..=1.0).contains(&v.weight())));

        let terms: Vec<&Term> = formula.terms().collect();
        let mut compiler = Compiler::new();
        let root = compiler.build(&terms, &variables);

        let diagram = Self {
            nodes: compiler.nodes,
            root,
            variable_count: variables.len(),
            stats: compiler.stats,
            probability: OnceCell::new(),
        };
        info!(
            "compiled {} terms over {} variables into {} nodes (root = {}, {:?})",
            terms.len(),
            diagram.variable_count,
            diagram.node_count(),
            root,
            diagram.stats
        );
        diagram
    }

    /// A diagram consisting of a single terminal.
    pub fn constant(value: bool) -> Self {
        Self {
            nodes: vec![Node::Zero, Node::One],
            root: if value { Ref::ONE } else { Ref::ZERO },
            variable_count: 0,
            stats: CompileStats::default(),
            probability: OnceCell::new(),
        }
    }
}

impl Diagram {
    pub fn root(&self) -> Ref {
        self.root
    }

    pub fn node(&self, node: Ref) -> &Node {
        &self.nodes[node.index()]
    }

    pub fn low(&self, node: Ref) -> Ref {
        match self.node(node) {
            Node::Decision { low, .. } => *low,
            _ => panic!("terminal {} has no children", node),
        }
    }

    pub fn high(&self, node: Ref) -> Ref {
        match self.node(node) {
            Node::Decision { high, .. } => *high,
            _ => panic!("terminal {} has no children", node),
        }
    }

    pub fn variable(&self, node: Ref) -> Option<Variable> {
        match self.node(node) {
            Node::Decision { variable, .. } => Some(*variable),
            _ => None,
        }
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == Ref::ZERO
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == Ref::ONE
    }

    /// Number of variables eliminated during compilation.
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Upper bound on the length of any root-to-terminal path.
    pub fn max_depth(&self) -> usize {
        self.variable_count + 1
    }

    /// Number of decision nodes (terminals excluded).
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 2
    }

    pub fn stats(&self) -> CompileStats {
        self.stats
    }

    /// All nodes reachable from the root, terminals included.
    pub fn descendants(&self) -> HashSet<Ref> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([self.root]);

        while let Some(node) = queue.pop_front() {
            if visited.insert(node) {
                if let Node::Decision { low, high, .. } = self.node(node) {
                    queue.push_back(*low);
                    queue.push_back(*high);
                }
            }
        }

        visited
    }

    pub fn to_bracket_string(&self, node: Ref) -> String {
        match self.node(node) {
            Node::Zero => "(0)".to_string(),
            Node::One => "(1)".to_string(),
            Node::Decision { variable, low, high } => format!(
                "{}:({}, {}, {})",
                node,
                variable.id(),
                self.to_bracket_string(*high),
                self.to_bracket_string(*low)
            ),
        }
    }
}

impl fmt::Debug for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagram")
            .field("root", &self.root)
            .field("nodes", &self.node_count())
            .field("variables", &self.variable_count)
            .field("stats", &self.stats)
            .finish()
    }
}
