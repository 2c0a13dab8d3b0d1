//! Monotone DNF formulas built from enumerated paths.
//!
//! One path becomes one [`Term`]: the conjunction "every edge on this path is
//! present". A [`Formula`] is the disjunction of its terms, i.e. the event
//! "at least one path exists", together with the universe of all variables the
//! terms refer to.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::debug;

use crate::error::{Error, Result};
use crate::types::{EdgeId, Variable};

/// A conjunction of edge variables (set semantics).
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Term(BTreeSet<EdgeId>);

impl Term {
    /// Builds a term, rejecting the empty conjunction.
    pub fn new(edges: impl IntoIterator<Item = EdgeId>) -> Result<Self> {
        let edges: BTreeSet<EdgeId> = edges.into_iter().collect();
        if edges.is_empty() {
            return Err(Error::EmptyTerm);
        }
        Ok(Self(edges))
    }

    pub fn contains(&self, id: EdgeId) -> bool {
        self.0.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edges: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", edges.join(" & "))
    }
}

/// A disjunction of terms over a declared variable universe.
///
/// # Invariants
///
/// - Every variable referenced by a term is declared in the universe.
/// - No term is empty; duplicate terms collapse.
#[derive(Debug, Clone, Default)]
pub struct Formula {
    terms: BTreeSet<Term>,
    universe: BTreeMap<EdgeId, Variable>,
}

impl Formula {
    /// Builds a formula from explicit terms and a variable universe.
    ///
    /// The universe must be exactly the set of variables the terms refer to: an
    /// undeclared variable and a declared but unused one are both rejected.
    pub fn new(terms: impl IntoIterator<Item = Term>, universe: impl IntoIterator<Item = Variable>) -> Result<Self> {
        let mut formula = Formula::default();
        for variable in universe {
            formula.declare(variable)?;
        }
        let mut used = BTreeSet::new();
        for term in terms {
            if let Some(id) = term.iter().find(|id| !formula.universe.contains_key(id)) {
                return Err(Error::UndeclaredVariable(id));
            }
            used.extend(term.iter());
            formula.terms.insert(term);
        }
        if let Some(&id) = formula.universe.keys().find(|id| !used.contains(*id)) {
            return Err(Error::UnusedVariable(id));
        }
        Ok(formula)
    }

    /// Builds a formula from enumerated paths, one term per path.
    ///
    /// Two paths over the same edge set produce a single term. A path without
    /// edges is rejected.
    pub fn from_paths<P>(paths: impl IntoIterator<Item = P>) -> Result<Self>
    where
        P: IntoIterator<Item = Variable>,
    {
        let mut formula = Formula::default();
        for path in paths {
            let mut edges = BTreeSet::new();
            for variable in path {
                formula.declare(variable)?;
                edges.insert(variable.id());
            }
            let term = Term::new(edges)?;
            debug!("from_paths: term {}", term);
            formula.terms.insert(term);
        }
        debug!(
            "from_paths: {} terms over {} variables",
            formula.terms.len(),
            formula.universe.len()
        );
        Ok(formula)
    }

    fn declare(&mut self, variable: Variable) -> Result<()> {
        // Variables are immutable, but a `Variable` could still be built twice
        // for the same edge with different weights.
        match self.universe.get(&variable.id()) {
            Some(existing) if existing.weight() != variable.weight() => Err(Error::ConflictingWeight {
                id: variable.id(),
                first: existing.weight(),
                second: variable.weight(),
            }),
            Some(_) => Ok(()),
            None => {
                self.universe.insert(variable.id(), variable);
                Ok(())
            }
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> + '_ {
        self.terms.iter()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Look up a declared variable.
    pub fn variable(&self, id: EdgeId) -> Option<&Variable> {
        self.universe.get(&id)
    }

    /// The declared variables, in ascending edge id order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.universe.values()
    }

    pub fn num_variables(&self) -> usize {
        self.universe.len()
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "false");
        }
        let terms: Vec<String> = self.terms.iter().map(|t| format!("({})", t)).collect();
        write!(f, "{}", terms.join(" | "))
    }
}
