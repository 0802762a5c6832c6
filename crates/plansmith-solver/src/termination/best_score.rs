//! Best score termination.

use plansmith_core::HardSoftScore;

use super::Termination;
use crate::scope::SolverScope;

/// Terminates once the best score reaches a target.
#[derive(Debug, Clone)]
pub struct BestScoreTermination {
    target: HardSoftScore,
}

impl BestScoreTermination {
    pub fn new(target: HardSoftScore) -> Self {
        Self { target }
    }
}

impl Termination for BestScoreTermination {
    fn is_terminated(&self, solver_scope: &SolverScope) -> bool {
        solver_scope.best_score() >= self.target
    }
}
