//! Score types for ranking solutions
//!
//! A score is compared level by level, highest priority first. Scores are
//! immutable values; arithmetic returns new instances.

#[macro_use]
mod macros;
mod hard_soft;
mod traits;

#[cfg(test)]
mod tests;

pub use hard_soft::HardSoftScore;
pub use traits::{ParseableScore, Score, ScoreParseError};

/// Semantic meaning of a score level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreLevel {
    /// Must reach the feasibility threshold.
    Hard,
    /// Optimization objective.
    Soft,
}
