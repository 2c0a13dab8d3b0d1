use crate::reference::Ref;
use crate::types::{EdgeId, Variable};

/// A diagram node: one of the two terminals or a decision on one variable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Node {
    Zero,
    One,
    Decision {
        variable: Variable,
        low: Ref,
        high: Ref,
    },
}

impl Node {
    /// The decided edge, if this is a decision node.
    pub fn edge(&self) -> Option<EdgeId> {
        match self {
            Node::Decision { variable, .. } => Some(variable.id()),
            _ => None,
        }
    }
}
