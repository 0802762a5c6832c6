//! Swap move selector.

use plansmith_core::{Solution, ValueRangeRegistry};

use super::{MoveSelector, VariableFilter};
use crate::heuristic::{Move, SwapMove};

/// Generates a swap move for every unordered pair of entities of a class
/// holding different values, for each variable with a shared value range.
#[derive(Debug, Clone, Default)]
pub struct SwapMoveSelector {
    filter: VariableFilter,
}

impl SwapMoveSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_class(class: usize) -> Self {
        Self {
            filter: VariableFilter::new(Some(class), None),
        }
    }

    pub fn for_variable(class: usize, field: usize) -> Self {
        Self {
            filter: VariableFilter::new(Some(class), Some(field)),
        }
    }
}

impl MoveSelector for SwapMoveSelector {
    fn collect_moves(&self, solution: &Solution, registry: &ValueRangeRegistry, out: &mut Vec<Move>) {
        for (class, field) in self.filter.variables(solution, registry) {
            // per-entity ranges could put a value out of its new range
            if !registry.is_shared(class, field) {
                continue;
            }
            let count = solution.entities(class).len();
            for left in 0..count {
                let left_value = solution.value(class, left, field);
                for right in left + 1..count {
                    let right_value = solution.value(class, right, field);
                    if left_value != right_value {
                        out.push(Move::Swap(SwapMove::new(
                            class,
                            left,
                            right,
                            field,
                            left_value.clone(),
                            right_value.clone(),
                        )));
                    }
                }
            }
        }
    }
}
