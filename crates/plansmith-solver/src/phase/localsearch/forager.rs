//! Foragers for local search move selection
//!
//! Foragers collect the accepted moves of a step, by index into the
//! step's candidate list, and pick the one to apply.

use std::fmt::Debug;

use plansmith_core::HardSoftScore;

/// Trait for collecting and selecting moves in local search.
pub trait LocalSearchForager: Send + Debug {
    /// Called at the start of each step to reset state.
    fn step_started(&mut self);

    /// Adds the index of an accepted move.
    fn add_move_index(&mut self, index: usize, score: HardSoftScore);

    /// Returns true once no further candidates need evaluating.
    fn is_quit_early(&self) -> bool;

    /// Picks the move to apply; `None` if nothing was accepted.
    fn pick_move_index(&mut self) -> Option<(usize, HardSoftScore)>;
}

/// Applies the first accepted move.
#[derive(Debug, Clone, Default)]
pub struct FirstAcceptedForager {
    accepted: Option<(usize, HardSoftScore)>,
}

impl FirstAcceptedForager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalSearchForager for FirstAcceptedForager {
    fn step_started(&mut self) {
        self.accepted = None;
    }

    fn add_move_index(&mut self, index: usize, score: HardSoftScore) {
        if self.accepted.is_none() {
            self.accepted = Some((index, score));
        }
    }

    fn is_quit_early(&self) -> bool {
        self.accepted.is_some()
    }

    fn pick_move_index(&mut self) -> Option<(usize, HardSoftScore)> {
        self.accepted.take()
    }
}

/// Collects up to `accepted_count_limit` accepted moves and picks the best.
///
/// Ties go to the move accepted first.
#[derive(Debug, Clone)]
pub struct AcceptedCountForager {
    accepted_count_limit: usize,
    accepted_count: usize,
    best: Option<(usize, HardSoftScore)>,
}

impl AcceptedCountForager {
    /// # Arguments
    /// * `accepted_count_limit` - Stop after this many accepted moves (at least 1)
    pub fn new(accepted_count_limit: usize) -> Self {
        Self {
            accepted_count_limit: accepted_count_limit.max(1),
            accepted_count: 0,
            best: None,
        }
    }
}

impl LocalSearchForager for AcceptedCountForager {
    fn step_started(&mut self) {
        self.accepted_count = 0;
        self.best = None;
    }

    fn add_move_index(&mut self, index: usize, score: HardSoftScore) {
        self.accepted_count += 1;
        if self.best.map_or(true, |(_, best)| score > best) {
            self.best = Some((index, score));
        }
    }

    fn is_quit_early(&self) -> bool {
        self.accepted_count >= self.accepted_count_limit
    }

    fn pick_move_index(&mut self) -> Option<(usize, HardSoftScore)> {
        self.best.take()
    }
}

/// Evaluates the whole neighbourhood and picks the best accepted move.
#[derive(Debug, Clone, Default)]
pub struct BestScoreForager {
    best: Option<(usize, HardSoftScore)>,
}

impl BestScoreForager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalSearchForager for BestScoreForager {
    fn step_started(&mut self) {
        self.best = None;
    }

    fn add_move_index(&mut self, index: usize, score: HardSoftScore) {
        if self.best.map_or(true, |(_, best)| score > best) {
            self.best = Some((index, score));
        }
    }

    fn is_quit_early(&self) -> bool {
        false
    }

    fn pick_move_index(&mut self) -> Option<(usize, HardSoftScore)> {
        self.best.take()
    }
}
