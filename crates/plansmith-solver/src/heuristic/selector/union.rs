//! Union of move selectors.

use plansmith_core::{Solution, ValueRangeRegistry};

use super::{ChangeMoveSelector, MoveSelector, SwapMoveSelector};
use crate::heuristic::Move;

/// Concatenates the moves of its children, in order.
#[derive(Debug)]
pub struct UnionMoveSelector {
    selectors: Vec<Box<dyn MoveSelector>>,
}

impl UnionMoveSelector {
    pub fn new(selectors: Vec<Box<dyn MoveSelector>>) -> Self {
        Self { selectors }
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

/// Change moves followed by swap moves over every variable.
impl Default for UnionMoveSelector {
    fn default() -> Self {
        Self::new(vec![
            Box::new(ChangeMoveSelector::new()),
            Box::new(SwapMoveSelector::new()),
        ])
    }
}

impl MoveSelector for UnionMoveSelector {
    fn collect_moves(&self, solution: &Solution, registry: &ValueRangeRegistry, out: &mut Vec<Move>) {
        for selector in &self.selectors {
            selector.collect_moves(solution, registry, out);
        }
    }
}
