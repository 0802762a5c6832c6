//! Termination conditions for solver phases.

mod best_score;
mod composite;
mod external;
mod step_count;
mod time;
mod unimproved;

use std::fmt::Debug;

use crate::scope::SolverScope;

pub use best_score::BestScoreTermination;
pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use step_count::StepCountTermination;
pub use time::TimeTermination;
pub use unimproved::UnimprovedStepCountTermination;

/// Trait for determining when to stop solving.
///
/// Checked before each phase and at the end of every step, so a move is
/// never left half applied.
pub trait Termination: Send + Sync + Debug {
    /// Returns true if solving should terminate.
    fn is_terminated(&self, solver_scope: &SolverScope) -> bool;
}

/// Whether a counter is read from the whole run or the running phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TerminationLevel {
    #[default]
    Solver,
    Phase,
}
