//! Termination on stagnation.

use super::{Termination, TerminationLevel};
use crate::scope::SolverScope;

/// Terminates when the best score has not improved for `limit` steps.
#[derive(Debug, Clone)]
pub struct UnimprovedStepCountTermination {
    limit: u64,
    level: TerminationLevel,
}

impl UnimprovedStepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            level: TerminationLevel::Solver,
        }
    }

    pub fn for_phase(limit: u64) -> Self {
        Self {
            limit,
            level: TerminationLevel::Phase,
        }
    }
}

impl Termination for UnimprovedStepCountTermination {
    fn is_terminated(&self, solver_scope: &SolverScope) -> bool {
        let unimproved = match self.level {
            TerminationLevel::Solver => solver_scope.steps_since_improvement(),
            TerminationLevel::Phase => solver_scope.phase().steps_since_improvement(),
        };
        unimproved >= self.limit
    }
}
