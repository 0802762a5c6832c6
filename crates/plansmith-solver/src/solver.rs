//! Solver implementation.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use plansmith_config::{EnvironmentMode, PhaseConfig, SolverConfig};
use plansmith_core::{ConfigurationError, HardSoftScore, Solution, ValueRangeRegistry};
use plansmith_scoring::{ConstraintSet, ScoreCorruption, ScoreDirector};
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

use crate::builder::{
    PhaseBuilder, TerminationBuilder, DEFAULT_TIME_LIMIT_SECS, DEFAULT_UNIMPROVED_STEP_COUNT_LIMIT,
};
use crate::phase::{run_phase, Phase};
use crate::scope::{BestSolutionCallback, SolverScope};
use crate::statistics::SolverStatistics;
use crate::termination::{Termination, TerminationLevel};

/// Seed used by reproducible runs that configure none.
pub const DEFAULT_RANDOM_SEED: u64 = 0;

/// Lifecycle of a solving run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SolverState {
    /// Validating the problem and computing the initial score.
    #[default]
    Initializing,
    /// Running phases.
    Searching,
    /// Finished; the best solution is final.
    Terminated,
}

impl SolverState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => SolverState::Initializing,
            1 => SolverState::Searching,
            _ => SolverState::Terminated,
        }
    }
}

impl fmt::Display for SolverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverState::Initializing => write!(f, "INITIALIZING"),
            SolverState::Searching => write!(f, "SEARCHING"),
            SolverState::Terminated => write!(f, "TERMINATED"),
        }
    }
}

/// State readable from other threads while a solve runs.
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedState(Arc<AtomicU8>);

impl SharedState {
    pub(crate) fn get(&self) -> SolverState {
        SolverState::from_u8(self.0.load(Ordering::SeqCst))
    }

    fn set(&self, state: SolverState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }
}

/// Outcome of a solve.
///
/// An infeasible best solution is still a result; check
/// [`is_feasible`](Self::is_feasible).
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Best solution found, with its score set.
    pub solution: Solution,
    pub score: HardSoftScore,
    pub state: SolverState,
    pub duration: Duration,
    pub statistics: SolverStatistics,
    /// Minimum hard score counted as feasible.
    pub feasibility_threshold: i64,
    /// True when the run was cancelled through the terminate flag.
    pub terminated_early: bool,
    /// Set when full assert mode caught the incremental score drifting;
    /// the run stops at that step.
    pub score_corruption: Option<ScoreCorruption>,
}

impl SolveResult {
    pub fn is_feasible(&self) -> bool {
        self.score.hard() >= self.feasibility_threshold
    }
}

/// The main solver that optimizes planning solutions.
///
/// Runs the configured phases (by default a best fit construction
/// heuristic, then hill climbing) against one [`ConstraintSet`]. When
/// neither the solver nor a local search phase has a termination, the
/// run stops after [`DEFAULT_TIME_LIMIT_SECS`] or
/// [`DEFAULT_UNIMPROVED_STEP_COUNT_LIMIT`] steps without a new best.
///
/// # Example
///
/// ```
/// use plansmith_config::SolverConfig;
/// use plansmith_core::HardSoftScore;
/// use plansmith_solver::Solver;
/// use plansmith_test::knapsack;
///
/// let config = SolverConfig::new().with_random_seed(7).with_step_count_limit(100);
/// let mut solver = Solver::new(config, knapsack::constraints());
/// let result = solver.solve(knapsack::generate_problem()).unwrap();
///
/// assert_eq!(result.score, HardSoftScore::of_soft(19));
/// assert!(result.is_feasible());
/// ```
pub struct Solver {
    config: SolverConfig,
    constraints: ConstraintSet,
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
    state: SharedState,
    best_solution_callback: Option<BestSolutionCallback>,
}

impl Solver {
    pub fn new(config: SolverConfig, constraints: ConstraintSet) -> Self {
        Self {
            config,
            constraints,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            solving: Arc::new(AtomicBool::new(false)),
            state: SharedState::default(),
            best_solution_callback: None,
        }
    }

    /// Uses an externally owned cancellation flag.
    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = flag;
        self
    }

    /// Calls `callback` with every new best solution.
    pub fn on_best_solution<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Solution, HardSoftScore) + Send + 'static,
    {
        self.best_solution_callback = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// The cancellation flag checked once per step.
    pub fn terminate_flag(&self) -> Arc<AtomicBool> {
        self.terminate_early_flag.clone()
    }

    /// Requests early termination of the running solve.
    ///
    /// Thread-safe through [`terminate_flag`](Self::terminate_flag).
    /// Returns false when no solve is running.
    pub fn terminate_early(&self) -> bool {
        if self.solving.load(Ordering::SeqCst) {
            self.terminate_early_flag.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> SolverState {
        self.state.get()
    }

    pub(crate) fn shared_state(&self) -> SharedState {
        self.state.clone()
    }

    fn seed(&self) -> u64 {
        match (self.config.random_seed, self.config.environment_mode) {
            (Some(seed), _) => seed,
            (None, EnvironmentMode::NonReproducible) => rand::random(),
            (None, _) => DEFAULT_RANDOM_SEED,
        }
    }

    /// Solves `solution` and returns the best solution found.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] before any step when the problem,
    /// the constraints or the configuration are invalid.
    pub fn solve(&mut self, solution: Solution) -> Result<SolveResult, ConfigurationError> {
        let start = Instant::now();
        self.state.set(SolverState::Initializing);

        self.config.validate()?;
        solution.validate()?;
        let registry = ValueRangeRegistry::new(&solution)?;
        registry.check_assignments(&solution)?;

        let descriptor = solution.descriptor().clone();
        let seed = self.seed();
        let mut termination = match &self.config.termination {
            Some(config) => TerminationBuilder::build(config, TerminationLevel::Solver)?,
            None => Default::default(),
        };

        let move_threads = self.config.move_thread_count.resolve();
        let thread_pool = if move_threads > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(move_threads)
                .build()
                .map_err(|e| ConfigurationError::InvalidConfig(e.to_string()))?;
            Some(Arc::new(pool))
        } else {
            None
        };

        let phase_configs = self.config.effective_phases();
        if termination.is_empty() && phase_configs.iter().any(Self::is_unbounded) {
            warn!(
                event = "no_termination",
                "no termination configured; stopping after {}s or {} unimproved steps",
                DEFAULT_TIME_LIMIT_SECS,
                DEFAULT_UNIMPROVED_STEP_COUNT_LIMIT
            );
            termination = TerminationBuilder::default_termination();
        }
        let mut phases = phase_configs
            .iter()
            .enumerate()
            .map(|(i, config)| {
                PhaseBuilder::build(config, &descriptor, seed.wrapping_add(i as u64), thread_pool.clone())
            })
            .collect::<Result<Vec<Box<dyn Phase>>, _>>()?;

        let director = ScoreDirector::new(solution, self.constraints.clone())?;
        info!(
            event = "solve_start",
            entity_count = director.working_solution().entity_count(),
            value_count = registry.value_count(),
            variable_count = registry.variable_count(),
            constraint_count = director.constraint_count(),
            move_threads = move_threads,
            seed = seed,
            score = %director.score(),
        );

        let mut scope = SolverScope::new(director, registry, seed)
            .with_terminate_early_flag(self.terminate_early_flag.clone())
            .with_full_assert(self.config.environment_mode == EnvironmentMode::FullAssert);
        if let Some(callback) = self.best_solution_callback.take() {
            scope = scope.with_best_solution_callback(callback);
        }

        self.solving.store(true, Ordering::SeqCst);
        self.state.set(SolverState::Searching);
        for (index, phase) in phases.iter_mut().enumerate() {
            if scope.is_terminate_early()
                || scope.score_corruption().is_some()
                || termination.is_terminated(&scope)
            {
                debug!(event = "terminated", phase_index = index, steps = scope.total_step_count());
                break;
            }
            run_phase(phase.as_mut(), index, &mut scope, &termination);
        }

        let terminated_early = scope.is_terminate_early();
        let score_corruption = scope.take_score_corruption();
        self.best_solution_callback = scope.take_best_solution_callback();
        let (solution, score, statistics) = scope.finish();
        self.solving.store(false, Ordering::SeqCst);
        self.state.set(SolverState::Terminated);

        let duration = start.elapsed();
        let feasibility_threshold = self.config.feasibility_threshold;
        info!(
            event = "solve_end",
            score = %score,
            feasible = score.hard() >= feasibility_threshold,
            steps = statistics.total_step_count,
            moves_evaluated = statistics.total_moves_evaluated,
            duration_ms = duration.as_millis() as u64,
            terminated_early = terminated_early,
            score_corrupted = score_corruption.is_some(),
        );

        Ok(SolveResult {
            solution,
            score,
            state: SolverState::Terminated,
            duration,
            statistics,
            feasibility_threshold,
            terminated_early,
            score_corruption,
        })
    }

    fn is_unbounded(config: &PhaseConfig) -> bool {
        matches!(config, PhaseConfig::LocalSearch(c) if c.termination.as_ref().map_or(true, |t| t.is_empty()))
    }
}

impl fmt::Debug for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("config", &self.config)
            .field("constraints", &self.constraints.len())
            .field("state", &self.state.get())
            .finish()
    }
}

#[cfg(test)]
mod tests;
