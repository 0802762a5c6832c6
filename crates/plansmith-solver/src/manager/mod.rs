//! Background solving.
//!
//! [`SolverManager`] starts each solve on its own thread and hands back a
//! [`SolverJob`] to watch or stop it.
//!
//! # Example
//!
//! ```
//! use plansmith_config::SolverConfig;
//! use plansmith_solver::SolverManager;
//! use plansmith_test::knapsack;
//!
//! let manager = SolverManager::new(SolverConfig::new().with_step_count_limit(50));
//! let job = manager
//!     .solve(knapsack::generate_problem(), knapsack::constraints())
//!     .unwrap();
//! let result = job.join().unwrap();
//! assert!(result.is_feasible());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use plansmith_config::SolverConfig;
use plansmith_core::{ConfigurationError, HardSoftScore, Solution};
use plansmith_scoring::ConstraintSet;
use thiserror::Error;
use tracing::debug;

use crate::solver::{SharedState, SolveResult, Solver, SolverState};

/// Failure of a background solve.
#[derive(Debug, Error)]
pub enum SolverJobError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("failed to start solver thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("solver thread panicked")]
    Panicked,
}

#[derive(Debug)]
struct BestSnapshot {
    solution: Solution,
    score: Option<HardSoftScore>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Starts solves on background threads with a shared configuration.
#[derive(Debug, Clone, Default)]
pub struct SolverManager {
    config: SolverConfig,
}

impl SolverManager {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Starts solving `problem` on a new thread.
    pub fn solve(
        &self,
        problem: Solution,
        constraints: ConstraintSet,
    ) -> Result<SolverJob, SolverJobError> {
        let terminate_flag = Arc::new(AtomicBool::new(false));
        let best = Arc::new(Mutex::new(BestSnapshot {
            solution: problem.clone(),
            score: None,
        }));

        let sink = best.clone();
        let mut solver = Solver::new(self.config.clone(), constraints)
            .with_terminate_flag(terminate_flag.clone())
            .on_best_solution(move |solution, score| {
                let mut best = lock(&sink);
                best.solution = solution.clone();
                best.score = Some(score);
            });
        let state = solver.shared_state();

        let published = best.clone();
        let handle = thread::Builder::new()
            .name("plansmith-solver".into())
            .spawn(move || {
                let result = solver.solve(problem);
                if let Ok(result) = &result {
                    let mut best = lock(&published);
                    best.solution = result.solution.clone();
                    best.score = Some(result.score);
                }
                result
            })?;
        debug!(event = "job_started");

        Ok(SolverJob {
            terminate_flag,
            state,
            best,
            handle,
        })
    }
}

/// Handle to a running background solve.
#[derive(Debug)]
pub struct SolverJob {
    terminate_flag: Arc<AtomicBool>,
    state: SharedState,
    best: Arc<Mutex<BestSnapshot>>,
    handle: JoinHandle<Result<SolveResult, ConfigurationError>>,
}

impl SolverJob {
    /// Current lifecycle state; a finished thread reports `Terminated`.
    pub fn status(&self) -> SolverState {
        if self.handle.is_finished() {
            SolverState::Terminated
        } else {
            self.state.get()
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Copy of the best solution so far; the problem itself before the
    /// first improvement.
    pub fn best_solution(&self) -> Solution {
        lock(&self.best).solution.clone()
    }

    /// Best score so far; `None` until the first improvement.
    pub fn best_score(&self) -> Option<HardSoftScore> {
        lock(&self.best).score
    }

    /// Asks the solver to stop after its current step without waiting.
    pub fn terminate_early(&self) {
        self.terminate_flag.store(true, Ordering::SeqCst);
    }

    /// Stops the solve and waits for its result.
    pub fn terminate(self) -> Result<SolveResult, SolverJobError> {
        self.terminate_early();
        self.join()
    }

    /// Waits for the solve to finish.
    pub fn join(self) -> Result<SolveResult, SolverJobError> {
        match self.handle.join() {
            Ok(result) => Ok(result?),
            Err(_) => Err(SolverJobError::Panicked),
        }
    }
}
