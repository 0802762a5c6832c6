//! ChangeMove - assigns a value to one planning variable.

use plansmith_core::Value;
use plansmith_scoring::VariableChange;
use smallvec::{smallvec, SmallVec};

/// Assigns `to` to a variable currently holding `from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeMove {
    pub class: usize,
    pub entity: usize,
    pub field: usize,
    pub from: Value,
    pub to: Value,
}

impl ChangeMove {
    pub fn new(class: usize, entity: usize, field: usize, from: Value, to: Value) -> Self {
        Self {
            class,
            entity,
            field,
            from,
            to,
        }
    }

    pub fn changes(&self) -> SmallVec<[VariableChange; 2]> {
        smallvec![VariableChange::new(
            self.class,
            self.entity,
            self.field,
            self.to.clone()
        )]
    }

    pub fn inverse(&self) -> ChangeMove {
        ChangeMove::new(
            self.class,
            self.entity,
            self.field,
            self.to.clone(),
            self.from.clone(),
        )
    }

    pub fn is_doable(&self) -> bool {
        self.from != self.to
    }
}
