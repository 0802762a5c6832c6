//! Per-step ordering of candidate moves.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::SelectionOrder;
use crate::heuristic::Move;

/// Applies a [`SelectionOrder`] to each step's candidate list.
#[derive(Debug, Clone, Default)]
pub struct MoveArranger {
    order: SelectionOrder,
    // enumeration index the next round robin step starts from
    cursor: usize,
    // rotation applied to the current step
    offset: usize,
    len: usize,
}

impl MoveArranger {
    pub fn new(order: SelectionOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn order(&self) -> SelectionOrder {
        self.order
    }

    /// Reorders the moves of a step in place.
    pub fn arrange(&mut self, moves: &mut [Move], rng: &mut StdRng) {
        self.len = moves.len();
        self.offset = 0;
        match self.order {
            SelectionOrder::Original => {}
            SelectionOrder::Random => moves.shuffle(rng),
            SelectionOrder::RoundRobin => {
                if !moves.is_empty() {
                    self.offset = self.cursor % moves.len();
                    moves.rotate_left(self.offset);
                }
            }
        }
    }

    /// Records the arranged position of the move applied this step.
    pub fn picked(&mut self, index: usize) {
        if self.order == SelectionOrder::RoundRobin && self.len > 0 {
            self.cursor = (self.offset + index + 1) % self.len;
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.offset = 0;
        self.len = 0;
    }
}
