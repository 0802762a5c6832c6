//! Step count termination.

use super::{Termination, TerminationLevel};
use crate::scope::SolverScope;

/// Terminates once the step count reaches a limit.
#[derive(Debug, Clone)]
pub struct StepCountTermination {
    limit: u64,
    level: TerminationLevel,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            level: TerminationLevel::Solver,
        }
    }

    /// Counts only the steps of the running phase.
    pub fn for_phase(limit: u64) -> Self {
        Self {
            limit,
            level: TerminationLevel::Phase,
        }
    }
}

impl Termination for StepCountTermination {
    fn is_terminated(&self, solver_scope: &SolverScope) -> bool {
        let steps = match self.level {
            TerminationLevel::Solver => solver_scope.total_step_count(),
            TerminationLevel::Phase => solver_scope.phase().step_count(),
        };
        steps >= self.limit
    }
}
