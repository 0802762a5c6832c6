//! Incremental constraint scoring for Plansmith.
//!
//! Constraints are declared with a small fluent builder:
//!
//! ```
//! use plansmith_core::{HardSoftScore, Value};
//! use plansmith_scoring::{group_key, Collector, Constraint};
//!
//! const IN_KNAPSACK: usize = 2;
//!
//! let max_weight = Constraint::for_each("KnapsackItem")
//!     .filter(|item| item.get(IN_KNAPSACK).as_bool() == Some(true))
//!     .group_by(|_| group_key![], Collector::sum(|item| item.get(3).as_int().unwrap_or(0)))
//!     .having(|total| total.value > 10)
//!     .penalize_with("Max weight", HardSoftScore::ONE_HARD, |total| total.value - 10);
//!
//! assert!(max_weight.is_hard());
//! ```
//!
//! A [`ScoreDirector`] owns the working solution and keeps one incremental
//! session per constraint, so a candidate change is scored by touching only
//! the affected entities and groups.

pub mod analysis;
pub mod constraint;
pub mod constraint_set;
pub mod director;

pub use analysis::{ConstraintAnalysis, ScoreAnalysis};
pub use constraint::{Aggregate, Collector, Constraint, GroupKey, GroupedBuilder, UniBuilder};
pub use constraint_set::ConstraintSet;
pub use director::{ScoreCorruption, ScoreDirector, VariableChange};

#[doc(hidden)]
pub use smallvec;
