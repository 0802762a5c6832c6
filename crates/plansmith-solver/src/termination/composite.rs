//! Composite termination.

use super::Termination;
use crate::scope::SolverScope;

/// Terminates when ANY child terminates. Empty means never.
#[derive(Debug, Default)]
pub struct OrTermination {
    terminations: Vec<Box<dyn Termination>>,
}

impl OrTermination {
    pub fn new(terminations: Vec<Box<dyn Termination>>) -> Self {
        Self { terminations }
    }

    pub fn with(mut self, termination: impl Termination + 'static) -> Self {
        self.push(Box::new(termination));
        self
    }

    pub fn push(&mut self, termination: Box<dyn Termination>) {
        self.terminations.push(termination);
    }

    pub fn extend(&mut self, other: OrTermination) {
        self.terminations.extend(other.terminations);
    }

    pub fn len(&self) -> usize {
        self.terminations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminations.is_empty()
    }
}

impl Termination for OrTermination {
    fn is_terminated(&self, solver_scope: &SolverScope) -> bool {
        self.terminations.iter().any(|t| t.is_terminated(solver_scope))
    }
}
