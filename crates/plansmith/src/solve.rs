//! Solver entry points that hide the wiring.

use std::path::Path;

use plansmith_config::SolverConfig;
use plansmith_core::{ConfigurationError, Solution};
use plansmith_scoring::ConstraintSet;
use plansmith_solver::{SolveResult, Solver};

/// Configuration file read by [`solve`] from the working directory.
pub const CONFIG_FILE: &str = "solver.toml";

/// Solves `solution` with the configuration in [`CONFIG_FILE`], or the
/// default configuration when that file does not exist.
///
/// The default runs a best fit construction heuristic and then hill
/// climbing. Without a configured termination the run stops after
/// [`DEFAULT_TIME_LIMIT_SECS`](plansmith_solver::DEFAULT_TIME_LIMIT_SECS) seconds or
/// [`DEFAULT_UNIMPROVED_STEP_COUNT_LIMIT`](plansmith_solver::DEFAULT_UNIMPROVED_STEP_COUNT_LIMIT) steps without a new best
/// solution, whichever comes first.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] when the configuration file cannot be
/// parsed or the problem is invalid.
pub fn solve(solution: Solution, constraints: ConstraintSet) -> Result<SolveResult, ConfigurationError> {
    let config = if Path::new(CONFIG_FILE).exists() {
        SolverConfig::load(CONFIG_FILE)?
    } else {
        SolverConfig::default()
    };
    solve_with_config(solution, constraints, config)
}

/// Solves `solution` with an explicit configuration.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] when the configuration or the problem
/// is invalid.
pub fn solve_with_config(
    solution: Solution,
    constraints: ConstraintSet,
    config: SolverConfig,
) -> Result<SolveResult, ConfigurationError> {
    #[cfg(feature = "console")]
    plansmith_console::init();

    Solver::new(config, constraints).solve(solution)
}
