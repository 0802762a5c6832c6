//! Construction heuristic phase implementation.

use plansmith_core::{Solution, Value, ValueRangeRegistry};
use tracing::trace;

use super::{BestFitForager, ConstructionForager, FirstFitForager};
use crate::heuristic::{ChangeMove, Move};
use crate::phase::{is_terminated, Phase};
use crate::scope::SolverScope;
use crate::termination::{OrTermination, Termination};

/// Assigns each unassigned variable the value its forager picks.
///
/// Every assignment is one step. Variables that already hold a value,
/// including externally seeded ones, are left untouched.
#[derive(Debug)]
pub struct ConstructionHeuristicPhase {
    forager: Box<dyn ConstructionForager>,
    termination: OrTermination,
    moves: Vec<Move>,
}

impl ConstructionHeuristicPhase {
    pub fn new(forager: Box<dyn ConstructionForager>) -> Self {
        Self {
            forager,
            termination: OrTermination::default(),
            moves: Vec::new(),
        }
    }

    pub fn first_fit() -> Self {
        Self::new(Box::new(FirstFitForager::new()))
    }

    pub fn best_fit() -> Self {
        Self::new(Box::new(BestFitForager::new()))
    }

    /// Adds phase-level limits, OR-ed with the solver's.
    pub fn with_termination(mut self, termination: OrTermination) -> Self {
        self.termination = termination;
        self
    }
}

/// (class, entity, field) of every unassigned variable, entity by entity.
fn unassigned_variables(
    solution: &Solution,
    registry: &ValueRangeRegistry,
) -> Vec<(usize, usize, usize)> {
    let mut placements = Vec::new();
    for class in 0..solution.entity_class_count() {
        let fields = registry.variables(class);
        for entity in 0..solution.entities(class).len() {
            for &field in fields {
                if solution.value(class, entity, field).is_none() {
                    placements.push((class, entity, field));
                }
            }
        }
    }
    placements
}

impl Phase for ConstructionHeuristicPhase {
    fn solve(&mut self, solver_scope: &mut SolverScope, termination: &dyn Termination) {
        let placements = unassigned_variables(solver_scope.working_solution(), solver_scope.registry());

        for (class, entity, field) in placements {
            if is_terminated(solver_scope, termination, &self.termination) {
                break;
            }

            self.moves.clear();
            self.moves.extend(
                solver_scope
                    .registry()
                    .values(class, entity, field)
                    .iter()
                    .map(|v| Move::from(ChangeMove::new(class, entity, field, Value::None, v.clone()))),
            );

            let Some(index) = self.forager.pick_move_index(solver_scope, &self.moves) else {
                continue;
            };
            let score = solver_scope.apply_move(&self.moves[index]);
            solver_scope.statistics().record_move_accepted();
            let step = solver_scope.increment_step_count();
            trace!(
                event = "step",
                step = step,
                phase = "ConstructionHeuristic",
                score = %score,
                accepted = true,
            );

            solver_scope.update_best_solution();
            if solver_scope.assert_score().is_err() {
                break;
            }
        }
    }

    fn phase_type_name(&self) -> &'static str {
        "ConstructionHeuristic"
    }
}
