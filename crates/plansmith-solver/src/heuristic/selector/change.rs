//! Change move selector.

use plansmith_core::{Solution, ValueRangeRegistry};

use super::{MoveSelector, VariableFilter};
use crate::heuristic::{ChangeMove, Move};

/// Generates a change move for every entity, variable and in-range value
/// other than the current one.
#[derive(Debug, Clone, Default)]
pub struct ChangeMoveSelector {
    filter: VariableFilter,
}

impl ChangeMoveSelector {
    /// Targets every planning variable of every entity class.
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

impl MoveSelector for ChangeMoveSelector {
    fn collect_moves(&self, solution: &Solution, registry: &ValueRangeRegistry, out: &mut Vec<Move>) {
        for (class, field) in self.filter.variables(solution, registry) {
            for entity in 0..solution.entities(class).len() {
                let current = solution.value(class, entity, field);
                for value in registry.values(class, entity, field) {
                    if value != current {
                        out.push(Move::Change(ChangeMove::new(
                            class,
                            entity,
                            field,
                            current.clone(),
                            value.clone(),
                        )));
                    }
                }
            }
        }
    }
}
