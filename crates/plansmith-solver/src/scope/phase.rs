//! Phase-level progress.

use std::time::{Duration, Instant};

use plansmith_core::HardSoftScore;

/// Counters of the running phase.
#[derive(Debug, Clone)]
pub struct PhaseProgress {
    /// Index of this phase (0-based).
    pub(crate) index: usize,
    pub(crate) phase_type: &'static str,
    pub(crate) start_time: Instant,
    pub(crate) step_count: u64,
    pub(crate) last_improvement_step: u64,
    pub(crate) starting_score: HardSoftScore,
    // collector totals when the phase started
    pub(crate) moves_evaluated_at_start: u64,
    pub(crate) moves_accepted_at_start: u64,
}

impl PhaseProgress {
    pub(crate) fn new(
        index: usize,
        phase_type: &'static str,
        starting_score: HardSoftScore,
        moves_at_start: (u64, u64),
    ) -> Self {
        Self {
            index,
            phase_type,
            start_time: Instant::now(),
            step_count: 0,
            last_improvement_step: 0,
            starting_score,
            moves_evaluated_at_start: moves_at_start.0,
            moves_accepted_at_start: moves_at_start.1,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase_type(&self) -> &'static str {
        self.phase_type
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Steps taken in this phase since the best score last improved.
    pub fn steps_since_improvement(&self) -> u64 {
        self.step_count - self.last_improvement_step
    }

    pub fn starting_score(&self) -> HardSoftScore {
        self.starting_score
    }
}
