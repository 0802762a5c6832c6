//! Local search phase implementation.

use std::sync::Arc;

use plansmith_core::HardSoftScore;
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, trace};

use super::{Acceptor, BestScoreForager, HillClimbingAcceptor, LocalSearchForager};
use crate::heuristic::{Move, MoveArranger, MoveSelector, SelectionOrder, UnionMoveSelector};
use crate::phase::{is_terminated, Phase};
use crate::scope::SolverScope;
use crate::termination::{OrTermination, Termination};

/// Local search phase that improves an existing solution.
///
/// Each step:
/// 1. Collects the doable candidate moves and arranges them
/// 2. Scores each candidate without changing the solution
/// 3. Feeds accepted candidates to the forager
/// 4. Applies the forager's pick and updates the best solution
///
/// When a thread pool is set, step 2 runs on it for all candidates at
/// once; acceptance still happens in candidate order on this thread.
pub struct LocalSearchPhase {
    move_selector: Box<dyn MoveSelector>,
    acceptor: Box<dyn Acceptor>,
    forager: Box<dyn LocalSearchForager>,
    arranger: MoveArranger,
    termination: OrTermination,
    thread_pool: Option<Arc<ThreadPool>>,
    moves: Vec<Move>,
}

impl LocalSearchPhase {
    pub fn new(
        move_selector: Box<dyn MoveSelector>,
        acceptor: Box<dyn Acceptor>,
        forager: Box<dyn LocalSearchForager>,
    ) -> Self {
        Self {
            move_selector,
            acceptor,
            forager,
            arranger: MoveArranger::default(),
            termination: OrTermination::default(),
            thread_pool: None,
            moves: Vec::new(),
        }
    }

    pub fn with_selection_order(mut self, order: SelectionOrder) -> Self {
        self.arranger = MoveArranger::new(order);
        self
    }

    /// Adds phase-level limits, OR-ed with the solver's.
    pub fn with_termination(mut self, termination: OrTermination) -> Self {
        self.termination = termination;
        self
    }

    /// Scores candidates on `pool`.
    pub fn with_thread_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        self.thread_pool = Some(pool);
        self
    }

    fn score_in_parallel(&self, solver_scope: &SolverScope) -> Option<Vec<HardSoftScore>> {
        let pool = self.thread_pool.as_ref()?;
        let director = solver_scope.director();
        let moves = &self.moves;
        Some(pool.install(|| {
            moves
                .par_iter()
                .map(|m| director.score_changes(&m.changes()))
                .collect()
        }))
    }
}

impl Default for LocalSearchPhase {
    /// Hill climbing over change and swap moves, picking the best move.
    fn default() -> Self {
        Self::new(
            Box::new(UnionMoveSelector::default()),
            Box::new(HillClimbingAcceptor::new()),
            Box::new(BestScoreForager::new()),
        )
    }
}

impl std::fmt::Debug for LocalSearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSearchPhase")
            .field("move_selector", &self.move_selector)
            .field("acceptor", &self.acceptor)
            .field("forager", &self.forager)
            .field("selection_order", &self.arranger.order())
            .field("parallel", &self.thread_pool.is_some())
            .finish()
    }
}

impl Phase for LocalSearchPhase {
    fn solve(&mut self, solver_scope: &mut SolverScope, termination: &dyn Termination) {
        let mut last_step_score = solver_scope.current_score();
        self.acceptor.phase_started(&last_step_score);
        self.arranger.reset();

        while !is_terminated(solver_scope, termination, &self.termination) {
            self.forager.step_started();
            self.acceptor.step_started();

            self.moves.clear();
            self.move_selector.collect_moves(
                solver_scope.working_solution(),
                solver_scope.registry(),
                &mut self.moves,
            );
            self.moves.retain(Move::is_doable);
            self.arranger.arrange(&mut self.moves, solver_scope.rng());

            let scores = self.score_in_parallel(solver_scope);
            for i in 0..self.moves.len() {
                let move_score = match &scores {
                    Some(scores) => scores[i],
                    None => solver_scope.score_move(&self.moves[i]),
                };
                let accepted = self.acceptor.is_accepted(&last_step_score, &move_score);
                solver_scope.statistics().record_move(accepted);
                if accepted {
                    self.forager.add_move_index(i, move_score);
                    if self.forager.is_quit_early() {
                        break;
                    }
                }
            }

            match self.forager.pick_move_index() {
                Some((index, _)) => {
                    let selected = &self.moves[index];
                    let step_score = solver_scope.apply_move(selected);
                    self.arranger.picked(index);
                    self.acceptor.step_ended(&step_score);
                    last_step_score = step_score;

                    let step = solver_scope.increment_step_count();
                    trace!(
                        event = "step",
                        step = step,
                        move_type = selected.move_type(),
                        score = %step_score,
                        accepted = true,
                    );
                    solver_scope.update_best_solution();
                    if solver_scope.assert_score().is_err() {
                        break;
                    }
                }
                None => {
                    let step = solver_scope.increment_step_count();
                    trace!(
                        event = "step",
                        step = step,
                        score = %last_step_score,
                        accepted = false,
                    );
                    if self.acceptor.is_deterministic() {
                        debug!(
                            event = "stuck",
                            step = step,
                            candidates = self.moves.len(),
                            score = %last_step_score,
                        );
                        break;
                    }
                }
            }
        }

        self.acceptor.phase_ended();
    }

    fn phase_type_name(&self) -> &'static str {
        "LocalSearch"
    }
}
