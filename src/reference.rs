use std::fmt::{Display, Formatter};

/// Handle of a node in a diagram's node arena.
///
/// Handles `0` and `1` are reserved for the `Zero` and `One` terminals.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ref(u32);

impl Ref {
    pub const ZERO: Ref = Ref(0);
    pub const ONE: Ref = Ref(1);

    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the index of the node in the arena.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_terminal(self) -> bool {
        self.0 <= 1
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminals() {
        assert!(Ref::ZERO.is_terminal());
        assert!(Ref::ONE.is_terminal());
        assert!(!Ref::new(2).is_terminal());
        assert_eq!(Ref::new(5).index(), 5);
        assert_eq!(Ref::new(5).to_string(), "@5");
    }
}
