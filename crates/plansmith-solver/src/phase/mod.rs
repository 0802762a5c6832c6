//! Solver phases.
//!
//! Phases run in sequence against the same [`SolverScope`]:
//! - [`ConstructionHeuristicPhase`] assigns unassigned variables
//! - [`LocalSearchPhase`] improves a complete assignment

pub mod construction;
pub mod localsearch;

use std::fmt::Debug;

use tracing::info;

use crate::scope::SolverScope;
use crate::statistics::PhaseStatistics;
use crate::termination::{OrTermination, Termination};

pub use construction::ConstructionHeuristicPhase;
pub use localsearch::LocalSearchPhase;

/// A phase of the solving process.
pub trait Phase: Send + Debug {
    /// Runs the phase until it finishes or `termination` fires.
    ///
    /// Termination is only honoured between steps.
    fn solve(&mut self, solver_scope: &mut SolverScope, termination: &dyn Termination);

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}

/// Runs one phase with its lifecycle events and statistics.
pub(crate) fn run_phase(
    phase: &mut dyn Phase,
    phase_index: usize,
    solver_scope: &mut SolverScope,
    termination: &dyn Termination,
) -> PhaseStatistics {
    let phase_type = phase.phase_type_name();
    solver_scope.start_phase(phase_index, phase_type);
    info!(
        event = "phase_start",
        phase = phase_type,
        phase_index = phase_index,
        score = %solver_scope.current_score(),
    );

    phase.solve(solver_scope, termination);

    let stats = solver_scope.end_phase();
    let secs = stats.duration.as_secs_f64();
    let speed = if secs > 0.0 {
        (stats.moves_evaluated as f64 / secs) as u64
    } else {
        0
    };
    info!(
        event = "phase_end",
        phase = phase_type,
        phase_index = phase_index,
        duration_ms = stats.duration.as_millis() as u64,
        steps = stats.step_count,
        moves_evaluated = stats.moves_evaluated,
        speed = speed,
        score = %solver_scope.current_score(),
        best_score = %solver_scope.best_score(),
    );
    stats
}

/// Whether the solver, the phase limits or the cancel flag say stop.
pub(crate) fn is_terminated(
    solver_scope: &SolverScope,
    termination: &dyn Termination,
    phase_termination: &OrTermination,
) -> bool {
    solver_scope.is_terminate_early()
        || solver_scope.score_corruption().is_some()
        || termination.is_terminated(solver_scope)
        || phase_termination.is_terminated(solver_scope)
}
