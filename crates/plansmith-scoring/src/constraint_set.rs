//! An ordered collection of constraints.

use std::collections::HashSet;
use std::sync::Arc;

use plansmith_core::{ConfigurationError, SolutionDescriptor};

use crate::constraint::Constraint;

/// The constraints a solution is scored against.
///
/// Cloning is cheap: constraints are shared behind `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<Arc<Constraint>>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint, builder style.
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.add(constraint);
        self
    }

    pub fn add(&mut self, constraint: Constraint) {
        self.constraints.push(Arc::new(constraint));
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Constraint>> {
        self.constraints.iter()
    }

    /// Looks up a constraint by name or full name.
    pub fn get(&self, name: &str) -> Option<&Arc<Constraint>> {
        self.constraints
            .iter()
            .find(|c| c.name() == name || c.constraint_ref().full_name() == name)
    }

    /// Checks every constraint targets a known entity class and that no two
    /// constraints share a full name.
    pub fn validate(&self, descriptor: &SolutionDescriptor) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::new();
        for constraint in &self.constraints {
            descriptor.require_entity_class(constraint.entity_class())?;
            let full_name = constraint.constraint_ref().full_name();
            if !seen.insert(full_name.clone()) {
                return Err(ConfigurationError::InvalidConfig(format!(
                    "duplicate constraint '{}'",
                    full_name
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        Self {
            constraints: iter.into_iter().map(Arc::new).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ConstraintSet {
    type Item = &'a Arc<Constraint>;
    type IntoIter = std::slice::Iter<'a, Arc<Constraint>>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.iter()
    }
}
