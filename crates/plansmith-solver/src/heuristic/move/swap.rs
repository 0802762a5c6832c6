//! SwapMove - exchanges one variable's values between two entities.

use plansmith_core::Value;
use plansmith_scoring::VariableChange;
use smallvec::{smallvec, SmallVec};

/// Swaps `field` between entities `left` and `right` of one class.
///
/// Only generated for variables whose value range is shared by every
/// entity of the class, so both values stay in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapMove {
    pub class: usize,
    pub left: usize,
    pub right: usize,
    pub field: usize,
    pub left_value: Value,
    pub right_value: Value,
}

impl SwapMove {
    pub fn new(
        class: usize,
        left: usize,
        right: usize,
        field: usize,
        left_value: Value,
        right_value: Value,
    ) -> Self {
        Self {
            class,
            left,
            right,
            field,
            left_value,
            right_value,
        }
    }

    pub fn changes(&self) -> SmallVec<[VariableChange; 2]> {
        smallvec![
            VariableChange::new(self.class, self.left, self.field, self.right_value.clone()),
            VariableChange::new(self.class, self.right, self.field, self.left_value.clone()),
        ]
    }

    /// After the swap the left entity holds the right value and vice versa.
    pub fn inverse(&self) -> SwapMove {
        SwapMove::new(
            self.class,
            self.left,
            self.right,
            self.field,
            self.right_value.clone(),
            self.left_value.clone(),
        )
    }

    pub fn is_doable(&self) -> bool {
        self.left != self.right && self.left_value != self.right_value
    }
}
