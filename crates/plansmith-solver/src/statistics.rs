//! Counters reported at the end of a run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use plansmith_core::HardSoftScore;
use serde::Serialize;

/// What one phase did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseStatistics {
    pub phase_index: usize,
    pub phase_type: &'static str,
    pub duration: Duration,
    pub step_count: u64,
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
    pub starting_score: HardSoftScore,
    pub ending_score: HardSoftScore,
}

/// Totals for a whole run, returned in the solve result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SolverStatistics {
    pub total_duration: Duration,
    pub total_step_count: u64,
    pub total_moves_evaluated: u64,
    pub total_moves_accepted: u64,
    pub score_calculation_count: u64,
    pub phase_statistics: Vec<PhaseStatistics>,
    /// (total step count, score) of every new best solution, oldest first.
    pub improvements: Vec<(u64, HardSoftScore)>,
}

impl SolverStatistics {
    pub fn phase_count(&self) -> usize {
        self.phase_statistics.len()
    }

    pub fn improvement_count(&self) -> usize {
        self.improvements.len()
    }
}

/// Run counters owned by the solver scope.
///
/// Move counters are atomic because candidates may be scored on the
/// move thread pool.
#[derive(Debug)]
pub struct StatisticsCollector {
    start_time: Instant,
    moves_evaluated: AtomicU64,
    moves_accepted: AtomicU64,
    step_count: u64,
    phases: Vec<PhaseStatistics>,
    improvements: Vec<(u64, HardSoftScore)>,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            moves_evaluated: AtomicU64::new(0),
            moves_accepted: AtomicU64::new(0),
            step_count: 0,
            phases: Vec::new(),
            improvements: Vec::new(),
        }
    }

    pub fn record_move_evaluated(&self) {
        self.moves_evaluated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_move_accepted(&self) {
        self.moves_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts an evaluated move, and an accepted one when `accepted`.
    pub fn record_move(&self, accepted: bool) {
        self.record_move_evaluated();
        if accepted {
            self.record_move_accepted();
        }
    }

    pub fn record_step(&mut self) {
        self.step_count += 1;
    }

    pub fn record_improvement(&mut self, score: HardSoftScore) {
        self.improvements.push((self.step_count, score));
    }

    pub fn record_phase(&mut self, phase: PhaseStatistics) {
        self.phases.push(phase);
    }

    pub fn moves_evaluated(&self) -> u64 {
        self.moves_evaluated.load(Ordering::Relaxed)
    }

    pub fn moves_accepted(&self) -> u64 {
        self.moves_accepted.load(Ordering::Relaxed)
    }

    pub fn improvement_count(&self) -> usize {
        self.improvements.len()
    }

    /// Closes the collector; `score_calculation_count` comes from the
    /// score director.
    pub fn into_statistics(self, score_calculation_count: u64) -> SolverStatistics {
        SolverStatistics {
            total_duration: self.start_time.elapsed(),
            total_step_count: self.step_count,
            total_moves_evaluated: self.moves_evaluated.into_inner(),
            total_moves_accepted: self.moves_accepted.into_inner(),
            score_calculation_count,
            phase_statistics: self.phases,
            improvements: self.improvements,
        }
    }
}

impl Default for StatisticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(index: usize, step_count: u64) -> PhaseStatistics {
        PhaseStatistics {
            phase_index: index,
            phase_type: "LocalSearch",
            duration: Duration::from_millis(10),
            step_count,
            moves_evaluated: 0,
            moves_accepted: 0,
            starting_score: HardSoftScore::ZERO,
            ending_score: HardSoftScore::of_soft(3),
        }
    }

    #[test]
    fn test_record_move_counts_accepted_separately() {
        let collector = StatisticsCollector::new();
        collector.record_move(true);
        collector.record_move(false);
        collector.record_move(true);

        assert_eq!(collector.moves_evaluated(), 3);
        assert_eq!(collector.moves_accepted(), 2);
    }

    #[test]
    fn test_improvements_carry_step_count() {
        let mut collector = StatisticsCollector::new();
        collector.record_step();
        collector.record_improvement(HardSoftScore::of(-1, 0));
        collector.record_step();
        collector.record_step();
        collector.record_improvement(HardSoftScore::of(0, 5));

        let stats = collector.into_statistics(12);
        assert_eq!(stats.total_step_count, 3);
        assert_eq!(
            stats.improvements,
            vec![(1, HardSoftScore::of(-1, 0)), (3, HardSoftScore::of(0, 5))]
        );
        assert_eq!(stats.score_calculation_count, 12);
    }

    #[test]
    fn test_phases_kept_in_order() {
        let mut collector = StatisticsCollector::new();
        collector.record_phase(phase(0, 5));
        collector.record_phase(phase(1, 20));

        let stats = collector.into_statistics(0);
        assert_eq!(stats.phase_count(), 2);
        assert_eq!(stats.phase_statistics[1].step_count, 20);
    }

    #[test]
    fn test_move_counters_shared_across_threads() {
        let collector = StatisticsCollector::new();

        rayon::scope(|s| {
            for _ in 0..4 {
                s.spawn(|_| {
                    for _ in 0..1000 {
                        collector.record_move(false);
                    }
                });
            }
        });

        assert_eq!(collector.moves_evaluated(), 4000);
        assert_eq!(collector.moves_accepted(), 0);
    }
}
