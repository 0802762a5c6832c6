//! Wall-clock termination.

use std::time::Duration;

use super::{Termination, TerminationLevel};
use crate::scope::SolverScope;

/// Terminates once the elapsed time reaches a limit.
///
/// Elapsed time is measured from solver start, or from phase start for
/// [`for_phase`](Self::for_phase).
#[derive(Debug, Clone)]
pub struct TimeTermination {
    limit: Duration,
    level: TerminationLevel,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            level: TerminationLevel::Solver,
        }
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn for_phase(limit: Duration) -> Self {
        Self {
            limit,
            level: TerminationLevel::Phase,
        }
    }
}

impl Termination for TimeTermination {
    fn is_terminated(&self, solver_scope: &SolverScope) -> bool {
        let elapsed = match self.level {
            TerminationLevel::Solver => solver_scope.elapsed(),
            TerminationLevel::Phase => solver_scope.phase().elapsed(),
        };
        elapsed >= self.limit
    }
}
