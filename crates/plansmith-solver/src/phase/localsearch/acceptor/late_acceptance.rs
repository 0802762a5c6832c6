//! Late acceptance acceptor.

use plansmith_core::HardSoftScore;

use super::Acceptor;

/// Late acceptance acceptor - accepts moves that improve on a historical score.
///
/// Keeps a circular buffer of recent step scores and accepts a move that
/// is not worse than the last step, or not worse than the score from
/// `late_acceptance_size` steps ago.
///
/// # Example
///
/// ```
/// use plansmith_solver::phase::localsearch::LateAcceptanceAcceptor;
///
/// let acceptor = LateAcceptanceAcceptor::new(400);
/// assert_eq!(acceptor.late_acceptance_size(), 400);
/// ```
#[derive(Debug, Clone)]
pub struct LateAcceptanceAcceptor {
    late_acceptance_size: usize,
    score_history: Vec<HardSoftScore>,
    current_index: usize,
}

impl LateAcceptanceAcceptor {
    /// Creates a new late acceptance acceptor; a size of 0 is treated as 1.
    pub fn new(late_acceptance_size: usize) -> Self {
        let late_acceptance_size = late_acceptance_size.max(1);
        Self {
            late_acceptance_size,
            score_history: vec![HardSoftScore::ZERO; late_acceptance_size],
            current_index: 0,
        }
    }

    pub fn late_acceptance_size(&self) -> usize {
        self.late_acceptance_size
    }
}

impl Default for LateAcceptanceAcceptor {
    fn default() -> Self {
        Self::new(400)
    }
}

impl Acceptor for LateAcceptanceAcceptor {
    fn is_accepted(&mut self, last_step_score: &HardSoftScore, move_score: &HardSoftScore) -> bool {
        if move_score >= last_step_score {
            return true;
        }
        move_score >= &self.score_history[self.current_index]
    }

    fn phase_started(&mut self, initial_score: &HardSoftScore) {
        self.score_history.fill(*initial_score);
        self.current_index = 0;
    }

    fn step_ended(&mut self, step_score: &HardSoftScore) {
        self.score_history[self.current_index] = *step_score;
        self.current_index = (self.current_index + 1) % self.late_acceptance_size;
    }
}
