//! Score trait definitions

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::ops::{Add, Neg, Sub};

use super::ScoreLevel;

/// Behaviour shared by every score type.
///
/// Scores form a total order where higher is better. Levels are compared
/// lexicographically from the highest priority level down, so a single
/// unit on a higher level outweighs any amount on a lower one.
pub trait Score:
    Copy
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Returns true if every hard level is at least zero.
    fn is_feasible(&self) -> bool;

    /// Returns the additive identity.
    fn zero() -> Self;

    /// Returns the number of levels.
    fn levels_count() -> usize;

    /// Returns the level values, highest priority first.
    fn to_level_numbers(&self) -> Vec<i64>;

    /// Builds a score from level values, highest priority first.
    ///
    /// # Panics
    /// Panics if `levels.len() != levels_count()`.
    fn from_level_numbers(levels: &[i64]) -> Self;

    /// Returns the meaning of the level at `index`.
    ///
    /// # Panics
    /// Panics if `index >= levels_count()`.
    fn level_label(index: usize) -> ScoreLevel;

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn is_better_than(&self, other: &Self) -> bool {
        self > other
    }

    fn is_worse_than(&self, other: &Self) -> bool {
        self < other
    }
}

/// Scores with a textual form such as `"0hard/-100soft"`.
pub trait ParseableScore: Score {
    fn parse(s: &str) -> Result<Self, ScoreParseError>;

    fn to_string_repr(&self) -> String;
}

/// Error when parsing a score from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreParseError {
    pub message: String,
}

impl std::fmt::Display for ScoreParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Score parse error: {}", self.message)
    }
}

impl std::error::Error for ScoreParseError {}
