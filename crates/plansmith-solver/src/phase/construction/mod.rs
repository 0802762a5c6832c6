//! Construction heuristic phase
//!
//! Assigns every unassigned planning variable once, in entity and
//! declaration order, before local search starts.

mod forager;
mod phase;

pub use forager::{BestFitForager, ConstructionForager, FirstFitForager};
pub use phase::ConstructionHeuristicPhase;

#[cfg(test)]
mod tests;
