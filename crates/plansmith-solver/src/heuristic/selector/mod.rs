//! Move selectors.
//!
//! Selectors enumerate every candidate move of the current solution in a
//! deterministic order; [`MoveArranger`] then applies the step's
//! selection order.

mod change;
mod selection_order;
mod swap;
mod union;

#[cfg(test)]
mod tests;

use std::fmt::Debug;

use plansmith_core::{Solution, ValueRangeRegistry};

use super::Move;

pub use change::ChangeMoveSelector;
pub use plansmith_config::SelectionOrder;
pub use selection_order::MoveArranger;
pub use swap::SwapMoveSelector;
pub use union::UnionMoveSelector;

/// Enumerates candidate moves for the current solution.
pub trait MoveSelector: Send + Sync + Debug {
    /// Appends every move of this selector to `out`.
    fn collect_moves(&self, solution: &Solution, registry: &ValueRangeRegistry, out: &mut Vec<Move>);
}

/// Which planning variables a selector targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct VariableFilter {
    class: Option<usize>,
    field: Option<usize>,
}

impl VariableFilter {
    pub(crate) fn new(class: Option<usize>, field: Option<usize>) -> Self {
        Self { class, field }
    }

    /// (class, field) pairs matching the filter, in declaration order.
    pub(crate) fn variables<'a>(
        &'a self,
        solution: &'a Solution,
        registry: &'a ValueRangeRegistry,
    ) -> impl Iterator<Item = (usize, usize)> + 'a {
        (0..solution.entity_class_count())
            .filter(move |class| self.class.map_or(true, |c| c == *class))
            .flat_map(move |class| {
                registry
                    .variables(class)
                    .iter()
                    .copied()
                    .filter(move |field| self.field.map_or(true, |f| f == *field))
                    .map(move |field| (class, field))
            })
    }
}
