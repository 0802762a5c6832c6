//! HardSoftScore - two-level score with hard and soft constraints

use std::cmp::Ordering;
use std::fmt;

use super::traits::Score;
use super::ScoreLevel;

/// A score with a hard and a soft level.
///
/// Hard levels are compared first; soft levels only break ties.
///
/// # Examples
///
/// ```
/// use plansmith_core::HardSoftScore;
///
/// // One broken hard unit outweighs any soft amount.
/// assert!(HardSoftScore::of(0, 5) > HardSoftScore::of(-1, 1000));
///
/// let feasible = HardSoftScore::of(0, -200);
/// let better = HardSoftScore::of(0, -50);
/// assert!(better > feasible);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardSoftScore {
    hard: i64,
    soft: i64,
}

impl HardSoftScore {
    pub const ZERO: HardSoftScore = HardSoftScore { hard: 0, soft: 0 };

    pub const ONE_HARD: HardSoftScore = HardSoftScore { hard: 1, soft: 0 };

    pub const ONE_SOFT: HardSoftScore = HardSoftScore { hard: 0, soft: 1 };

    #[inline]
    pub const fn of(hard: i64, soft: i64) -> Self {
        HardSoftScore { hard, soft }
    }

    #[inline]
    pub const fn of_hard(hard: i64) -> Self {
        HardSoftScore { hard, soft: 0 }
    }

    #[inline]
    pub const fn of_soft(soft: i64) -> Self {
        HardSoftScore { hard: 0, soft }
    }

    #[inline]
    pub const fn hard(&self) -> i64 {
        self.hard
    }

    #[inline]
    pub const fn soft(&self) -> i64 {
        self.soft
    }

    /// Returns true when the hard level reaches `threshold`.
    ///
    /// `is_feasible()` is the special case `threshold == 0`.
    #[inline]
    pub const fn is_feasible_with(&self, threshold: i64) -> bool {
        self.hard >= threshold
    }

    /// Multiplies both levels by an integer match weight.
    ///
    /// Saturates instead of overflowing.
    #[inline]
    pub const fn scale(&self, factor: i64) -> Self {
        HardSoftScore {
            hard: self.hard.saturating_mul(factor),
            soft: self.soft.saturating_mul(factor),
        }
    }

    /// Returns true when the hard level is non-zero.
    #[inline]
    pub const fn has_hard(&self) -> bool {
        self.hard != 0
    }
}

impl Score for HardSoftScore {
    #[inline]
    fn is_feasible(&self) -> bool {
        self.hard >= 0
    }

    #[inline]
    fn zero() -> Self {
        HardSoftScore::ZERO
    }

    #[inline]
    fn levels_count() -> usize {
        2
    }

    fn to_level_numbers(&self) -> Vec<i64> {
        vec![self.hard, self.soft]
    }

    fn from_level_numbers(levels: &[i64]) -> Self {
        assert_eq!(levels.len(), 2, "HardSoftScore requires exactly 2 levels");
        HardSoftScore::of(levels[0], levels[1])
    }

    fn level_label(index: usize) -> ScoreLevel {
        match index {
            0 => ScoreLevel::Hard,
            1 => ScoreLevel::Soft,
            _ => panic!("HardSoftScore has 2 levels, got index {}", index),
        }
    }
}

impl Ord for HardSoftScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hard
            .cmp(&other.hard)
            .then_with(|| self.soft.cmp(&other.soft))
    }
}

impl_score_ops!(HardSoftScore { hard, soft } => of);

impl fmt::Debug for HardSoftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HardSoftScore({}, {})", self.hard, self.soft)
    }
}

impl fmt::Display for HardSoftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hard/{}soft", self.hard, self.soft)
    }
}

impl_score_parse!(HardSoftScore { hard => "hard", soft => "soft" } => of);
