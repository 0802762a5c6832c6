//! Plansmith - a constraint-based planning engine in Rust
//!
//! Describe the problem as a [`SolutionDescriptor`] and a [`Solution`],
//! declare the rules as a [`ConstraintSet`] and call [`solve`].
//!
//! # Example
//!
//! ```rust
//! use plansmith::prelude::*;
//!
//! // Score types are re-exported
//! let score = HardSoftScore::of(0, -100);
//! assert_eq!(score.hard(), 0);
//! assert_eq!(score.soft(), -100);
//! assert!(HardSoftScore::of(0, 5) > HardSoftScore::of(-1, 1000));
//! ```

// Score types
pub use plansmith_core::score::{HardSoftScore, ParseableScore, Score, ScoreParseError};

// Domain model
pub use plansmith_core::{
    ConfigurationError, Entity, EntityClassDef, EntityView, Fact, FactClassDef, FactRef, FieldDef,
    FieldKind, Solution, SolutionDescriptor, Value, ValueRangeDef, ValueRangeRegistry,
};

// Constraint API
pub use plansmith_scoring::{
    group_key, Collector, Constraint, ConstraintAnalysis, ConstraintSet, ScoreAnalysis,
    ScoreDirector,
};

// Configuration
pub use plansmith_config::{
    AcceptorConfig, ConfigError, EnvironmentMode, MoveThreadCount, PhaseConfig, SolverConfig,
    TerminationConfig,
};

// Solving
pub use plansmith_solver::{
    SolveResult, Solver, SolverJob, SolverJobError, SolverManager, SolverState, SolverStatistics,
    DEFAULT_TIME_LIMIT_SECS, DEFAULT_UNIMPROVED_STEP_COUNT_LIMIT,
};

/// Full solver API: phases, acceptors, foragers, moves and terminations.
pub use plansmith_solver as solver;

#[cfg(feature = "console")]
pub use plansmith_console as console;

mod solve;
pub use solve::{solve, solve_with_config, CONFIG_FILE};

pub mod prelude {
    pub use super::{group_key, Collector, Constraint, ConstraintSet};
    pub use super::{
        ConfigurationError, EntityView, Solution, SolutionDescriptor, Value, ValueRangeDef,
    };
    pub use super::{Entity, EntityClassDef, Fact, FactClassDef, FieldDef};
    pub use super::{HardSoftScore, Score};
    pub use super::{SolveResult, Solver, SolverConfig, SolverManager};
}
