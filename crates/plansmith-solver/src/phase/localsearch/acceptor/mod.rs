//! Acceptors for local search move acceptance.
//!
//! Acceptors decide whether a move should be accepted by comparing the
//! resulting score with the previous step's score.

mod hill_climbing;
mod late_acceptance;
mod simulated_annealing;

use std::fmt::Debug;

use plansmith_core::HardSoftScore;

pub use hill_climbing::HillClimbingAcceptor;
pub use late_acceptance::LateAcceptanceAcceptor;
pub use simulated_annealing::SimulatedAnnealingAcceptor;

/// Trait for accepting or rejecting moves in local search.
pub trait Acceptor: Send + Debug {
    /// Returns true if a move resulting in `move_score` should be accepted,
    /// given the previous step's score.
    fn is_accepted(&mut self, last_step_score: &HardSoftScore, move_score: &HardSoftScore) -> bool;

    /// Called when a phase starts.
    fn phase_started(&mut self, _initial_score: &HardSoftScore) {}

    /// Called when a phase ends.
    fn phase_ended(&mut self) {}

    /// Called when a step starts.
    fn step_started(&mut self) {}

    /// Called when a step ends with an accepted move.
    fn step_ended(&mut self, _step_score: &HardSoftScore) {}

    /// True when a rejected neighbourhood would be rejected again.
    ///
    /// A deterministic acceptor that accepts nothing ends the phase.
    fn is_deterministic(&self) -> bool {
        true
    }
}
