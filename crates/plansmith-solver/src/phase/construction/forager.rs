//! Foragers choosing a value for one placement.

use std::fmt::Debug;

use plansmith_core::HardSoftScore;

use crate::heuristic::Move;
use crate::scope::SolverScope;

/// Picks which of a placement's candidate moves to apply.
pub trait ConstructionForager: Send + Debug {
    /// Returns the index of the chosen move, or `None` when `moves` is empty.
    fn pick_move_index(&self, solver_scope: &SolverScope, moves: &[Move]) -> Option<usize>;
}

/// Takes the first value that does not lower the score.
///
/// Falls back to the best value when every candidate lowers it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFitForager;

impl FirstFitForager {
    pub fn new() -> Self {
        Self
    }
}

impl ConstructionForager for FirstFitForager {
    fn pick_move_index(&self, solver_scope: &SolverScope, moves: &[Move]) -> Option<usize> {
        let current = solver_scope.current_score();
        let mut best: Option<(usize, HardSoftScore)> = None;

        for (i, m) in moves.iter().enumerate() {
            let score = solver_scope.score_move(m);
            solver_scope.statistics().record_move_evaluated();
            if score >= current {
                return Some(i);
            }
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((i, score));
            }
        }
        best.map(|(i, _)| i)
    }
}

/// Evaluates every value and takes the best; ties go to the earliest.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFitForager;

impl BestFitForager {
    pub fn new() -> Self {
        Self
    }
}

impl ConstructionForager for BestFitForager {
    fn pick_move_index(&self, solver_scope: &SolverScope, moves: &[Move]) -> Option<usize> {
        let mut best: Option<(usize, HardSoftScore)> = None;

        for (i, m) in moves.iter().enumerate() {
            let score = solver_scope.score_move(m);
            solver_scope.statistics().record_move_evaluated();
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((i, score));
            }
        }
        best.map(|(i, _)| i)
    }
}
