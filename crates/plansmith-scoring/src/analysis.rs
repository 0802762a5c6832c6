//! Per-constraint score breakdown.

use std::fmt::{self, Write};

use plansmith_core::{ConstraintRef, HardSoftScore};

/// Contribution of one constraint to the total score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintAnalysis {
    pub constraint_ref: ConstraintRef,
    /// Score per unit of measure.
    pub weight: HardSoftScore,
    /// Total score from this constraint.
    pub score: HardSoftScore,
    pub match_count: usize,
    pub is_hard: bool,
}

impl ConstraintAnalysis {
    pub fn name(&self) -> &str {
        &self.constraint_ref.name
    }
}

/// Complete score breakdown, as produced by
/// [`ScoreDirector::analyze`](crate::ScoreDirector::analyze).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreAnalysis {
    pub score: HardSoftScore,
    pub constraints: Vec<ConstraintAnalysis>,
}

impl ScoreAnalysis {
    pub fn new(score: HardSoftScore, constraints: Vec<ConstraintAnalysis>) -> Self {
        Self { score, constraints }
    }

    /// Finds a constraint by name or full name.
    pub fn get(&self, name: &str) -> Option<&ConstraintAnalysis> {
        self.constraints
            .iter()
            .find(|c| c.name() == name || c.constraint_ref.full_name() == name)
    }

    pub fn total_match_count(&self) -> usize {
        self.constraints.iter().map(|c| c.match_count).sum()
    }

    /// Constraints contributing a non-zero score.
    pub fn non_zero_constraints(&self) -> impl Iterator<Item = &ConstraintAnalysis> {
        self.constraints.iter().filter(|c| c.score != HardSoftScore::ZERO)
    }

    /// Hard constraints currently broken.
    pub fn broken_hard_constraints(&self) -> impl Iterator<Item = &ConstraintAnalysis> {
        self.constraints
            .iter()
            .filter(|c| c.is_hard && c.score.hard() < 0)
    }

    /// One line per non-zero constraint, after a header with the total.
    pub fn summary(&self) -> String {
        let mut out = format!("Score: {}\n", self.score);
        for c in self.non_zero_constraints() {
            let _ = writeln!(
                out,
                "  {}: {} ({} match{})",
                c.constraint_ref.full_name(),
                c.score,
                c.match_count,
                if c.match_count == 1 { "" } else { "es" }
            );
        }
        out
    }
}

impl fmt::Display for ScoreAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
