//! Moves over planning variables.
//!
//! A move records the values it replaces, so [`Move::inverse`] restores the
//! solution exactly.

mod change;
mod swap;


use std::fmt;

use plansmith_scoring::VariableChange;
use smallvec::SmallVec;

pub use change::ChangeMove;
pub use swap::SwapMove;

/// A candidate modification of the current solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    Change(ChangeMove),
    Swap(SwapMove),
}

impl Move {
    /// Variable assignments performed by this move.
    pub fn changes(&self) -> SmallVec<[VariableChange; 2]> {
        match self {
            Move::Change(m) => m.changes(),
            Move::Swap(m) => m.changes(),
        }
    }

    /// The move that undoes this one.
    pub fn inverse(&self) -> Move {
        match self {
            Move::Change(m) => Move::Change(m.inverse()),
            Move::Swap(m) => Move::Swap(m.inverse()),
        }
    }

    /// False for moves that would leave the solution unchanged.
    pub fn is_doable(&self) -> bool {
        match self {
            Move::Change(m) => m.is_doable(),
            Move::Swap(m) => m.is_doable(),
        }
    }

    pub fn move_type(&self) -> &'static str {
        match self {
            Move::Change(_) => "ChangeMove",
            Move::Swap(_) => "SwapMove",
        }
    }
}

impl From<ChangeMove> for Move {
    fn from(m: ChangeMove) -> Self {
        Move::Change(m)
    }
}

impl From<SwapMove> for Move {
    fn from(m: SwapMove) -> Self {
        Move::Swap(m)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Change(m) => write!(
                f,
                "{}[{}].{}: {} -> {}",
                m.class, m.entity, m.field, m.from, m.to
            ),
            Move::Swap(m) => write!(
                f,
                "{}[{}].{} <-> {}[{}].{}",
                m.class, m.left, m.field, m.class, m.right, m.field
            ),
        }
    }
}
