//! Solver-level scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use plansmith_core::{HardSoftScore, Solution, ValueRangeRegistry};
use plansmith_scoring::{ScoreCorruption, ScoreDirector};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error};

use super::PhaseProgress;
use crate::heuristic::Move;
use crate::statistics::{PhaseStatistics, SolverStatistics, StatisticsCollector};

/// Called with every new best solution and its score.
pub type BestSolutionCallback = Box<dyn FnMut(&Solution, HardSoftScore) + Send>;

/// Top-level scope for one solving run.
///
/// Owns the score director (and with it the current solution), the best
/// snapshot, the seeded RNG and the step counters. Phases change the
/// current solution only through [`apply_move`](Self::apply_move).
pub struct SolverScope {
    director: ScoreDirector,
    registry: ValueRangeRegistry,
    best_solution: Solution,
    best_score: HardSoftScore,
    rng: StdRng,
    start_time: Instant,
    total_step_count: u64,
    last_improvement_step: u64,
    phase: PhaseProgress,
    statistics: StatisticsCollector,
    terminate_early_flag: Option<Arc<AtomicBool>>,
    best_solution_callback: Option<BestSolutionCallback>,
    full_assert: bool,
    score_corruption: Option<ScoreCorruption>,
}

impl SolverScope {
    /// Creates the scope; the best solution starts as the current one.
    pub fn new(director: ScoreDirector, registry: ValueRangeRegistry, seed: u64) -> Self {
        let best_score = director.score();
        let best_solution = director.clone_working_solution();
        Self {
            director,
            registry,
            best_solution,
            best_score,
            rng: StdRng::seed_from_u64(seed),
            start_time: Instant::now(),
            total_step_count: 0,
            last_improvement_step: 0,
            phase: PhaseProgress::new(0, "None", best_score, (0, 0)),
            statistics: StatisticsCollector::new(),
            terminate_early_flag: None,
            best_solution_callback: None,
            full_assert: false,
            score_corruption: None,
        }
    }

    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = Some(flag);
        self
    }

    pub fn with_best_solution_callback(mut self, callback: BestSolutionCallback) -> Self {
        self.best_solution_callback = Some(callback);
        self
    }

    /// Hands the callback back, e.g. to reuse it for the next run.
    pub fn take_best_solution_callback(&mut self) -> Option<BestSolutionCallback> {
        self.best_solution_callback.take()
    }

    /// Re-checks the incremental score after every step.
    pub fn with_full_assert(mut self, full_assert: bool) -> Self {
        self.full_assert = full_assert;
        self
    }

    pub fn director(&self) -> &ScoreDirector {
        &self.director
    }

    pub fn registry(&self) -> &ValueRangeRegistry {
        &self.registry
    }

    pub fn working_solution(&self) -> &Solution {
        self.director.working_solution()
    }

    pub fn current_score(&self) -> HardSoftScore {
        self.director.score()
    }

    /// Score the current solution would have after `m`.
    pub fn score_move(&self, m: &Move) -> HardSoftScore {
        self.director.score_changes(&m.changes())
    }

    /// Applies `m` to the current solution and returns the new score.
    pub fn apply_move(&mut self, m: &Move) -> HardSoftScore {
        self.director.apply_changes(&m.changes())
    }

    pub fn best_solution(&self) -> &Solution {
        &self.best_solution
    }

    pub fn best_score(&self) -> HardSoftScore {
        self.best_score
    }

    /// Replaces the best snapshot when the current score is strictly better.
    pub fn update_best_solution(&mut self) -> bool {
        let score = self.director.score();
        if score <= self.best_score {
            return false;
        }

        self.best_solution = self.director.clone_working_solution();
        self.best_score = score;
        self.last_improvement_step = self.total_step_count;
        self.phase.last_improvement_step = self.phase.step_count;
        self.statistics.record_improvement(score);
        debug!(
            event = "new_best",
            phase = self.phase.phase_type,
            steps = self.total_step_count,
            score = %score,
        );

        if let Some(callback) = self.best_solution_callback.as_mut() {
            callback(&self.best_solution, score);
        }
        true
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Counts a finished step in both the phase and the solver totals.
    pub fn increment_step_count(&mut self) -> u64 {
        self.total_step_count += 1;
        self.phase.step_count += 1;
        self.statistics.record_step();
        self.total_step_count
    }

    pub fn total_step_count(&self) -> u64 {
        self.total_step_count
    }

    /// Steps since the best score last improved.
    pub fn steps_since_improvement(&self) -> u64 {
        self.total_step_count - self.last_improvement_step
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn phase(&self) -> &PhaseProgress {
        &self.phase
    }

    /// Resets the phase counters.
    pub fn start_phase(&mut self, index: usize, phase_type: &'static str) {
        let score = self.director.score();
        let moves = (
            self.statistics.moves_evaluated(),
            self.statistics.moves_accepted(),
        );
        self.phase = PhaseProgress::new(index, phase_type, score, moves);
    }

    /// Closes the running phase and returns its statistics.
    pub fn end_phase(&mut self) -> PhaseStatistics {
        let stats = PhaseStatistics {
            phase_index: self.phase.index,
            phase_type: self.phase.phase_type,
            duration: self.phase.elapsed(),
            step_count: self.phase.step_count,
            moves_evaluated: self.statistics.moves_evaluated() - self.phase.moves_evaluated_at_start,
            moves_accepted: self.statistics.moves_accepted() - self.phase.moves_accepted_at_start,
            starting_score: self.phase.starting_score,
            ending_score: self.director.score(),
        };
        self.statistics.record_phase(stats.clone());
        stats
    }

    pub fn statistics(&self) -> &StatisticsCollector {
        &self.statistics
    }

    /// Whether the external cancellation flag is raised.
    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// In full assert mode, compares the incremental score with a full
    /// recalculation. The first mismatch is kept and stops the run.
    pub fn assert_score(&mut self) -> Result<(), ScoreCorruption> {
        if !self.full_assert {
            return Ok(());
        }
        let corruption = match self.director.assert_consistency() {
            Ok(()) => return Ok(()),
            Err(corruption) => corruption,
        };
        error!(
            event = "score_corruption",
            steps = self.total_step_count,
            "{}",
            corruption
        );
        if self.score_corruption.is_none() {
            self.score_corruption = Some(corruption.clone());
        }
        Err(corruption)
    }

    /// First score corruption found in full assert mode.
    pub fn score_corruption(&self) -> Option<&ScoreCorruption> {
        self.score_corruption.as_ref()
    }

    pub fn take_score_corruption(&mut self) -> Option<ScoreCorruption> {
        self.score_corruption.take()
    }

    /// Ends the run: best solution, best score and the final statistics.
    pub fn finish(self) -> (Solution, HardSoftScore, SolverStatistics) {
        let statistics = self
            .statistics
            .into_statistics(self.director.calculation_count());
        (self.best_solution, self.best_score, statistics)
    }
}

impl std::fmt::Debug for SolverScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverScope")
            .field("current_score", &self.director.score())
            .field("best_score", &self.best_score)
            .field("total_step_count", &self.total_step_count)
            .field("phase", &self.phase.phase_type)
            .finish()
    }
}
