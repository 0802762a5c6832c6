//! Read-only view of one entity handed to constraint closures.

use super::solution::{Entity, Fact, Facts};
use super::value::Value;

/// An entity together with the facts it may reference.
///
/// Constraint filters, group keys and measures see entities only through
/// this view, so the scoring engine can evaluate hypothetical values
/// without touching the working solution.
#[derive(Debug, Clone, Copy)]
pub struct EntityView<'a> {
    class: usize,
    index: usize,
    entity: &'a Entity,
    facts: &'a Facts,
}

impl<'a> EntityView<'a> {
    pub fn new(class: usize, index: usize, entity: &'a Entity, facts: &'a Facts) -> Self {
        Self {
            class,
            index,
            entity,
            facts,
        }
    }

    #[inline]
    pub fn class(&self) -> usize {
        self.class
    }

    /// Position of the entity within its class.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn get(&self, field: usize) -> &'a Value {
        self.entity.get(field)
    }

    /// Follows the fact reference stored in `field`.
    #[inline]
    pub fn fact(&self, field: usize) -> Option<&'a Fact> {
        self.facts.resolve(self.entity.get(field))
    }

    pub fn facts(&self) -> &'a Facts {
        self.facts
    }

    pub fn entity(&self) -> &'a Entity {
        self.entity
    }
}
