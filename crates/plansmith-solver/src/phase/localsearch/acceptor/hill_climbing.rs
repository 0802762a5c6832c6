//! Hill climbing acceptor.

use plansmith_core::HardSoftScore;

use super::Acceptor;

/// Hill climbing acceptor - accepts moves that do not lower the score.
///
/// Sideways moves are accepted so the search can cross plateaus.
///
/// # Example
///
/// ```
/// use plansmith_core::HardSoftScore;
/// use plansmith_solver::phase::localsearch::{Acceptor, HillClimbingAcceptor};
///
/// let mut acceptor = HillClimbingAcceptor::new();
/// let last = HardSoftScore::of_soft(5);
/// assert!(acceptor.is_accepted(&last, &HardSoftScore::of_soft(5)));
/// assert!(!acceptor.is_accepted(&last, &HardSoftScore::of_soft(4)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HillClimbingAcceptor;

impl HillClimbingAcceptor {
    pub fn new() -> Self {
        Self
    }
}

impl Acceptor for HillClimbingAcceptor {
    fn is_accepted(&mut self, last_step_score: &HardSoftScore, move_score: &HardSoftScore) -> bool {
        move_score >= last_step_score
    }
}
