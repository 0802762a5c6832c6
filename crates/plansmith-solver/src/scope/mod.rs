//! Scopes holding solver state across phases and steps.

mod phase;
mod solver;

pub use phase::PhaseProgress;
pub use solver::{BestSolutionCallback, SolverScope};
