//! The score director: owns the working solution and its incremental score.

#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicU64, Ordering};

use plansmith_core::{ConfigurationError, Entity, EntityView, HardSoftScore, Solution, Value};
use smallvec::SmallVec;
use thiserror::Error;

use crate::analysis::{ConstraintAnalysis, ScoreAnalysis};
use crate::constraint::session::ConstraintSession;
use crate::constraint_set::ConstraintSet;

/// Assignment of one planning variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableChange {
    pub class: usize,
    pub entity: usize,
    pub field: usize,
    pub value: Value,
}

impl VariableChange {
    pub fn new(class: usize, entity: usize, field: usize, value: Value) -> Self {
        Self {
            class,
            entity,
            field,
            value,
        }
    }
}

/// The incrementally maintained score drifted from a full recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("score corruption: incremental score {incremental} differs from full score {full} (constraints: {})", .constraints.join(", "))]
pub struct ScoreCorruption {
    pub incremental: HardSoftScore,
    pub full: HardSoftScore,
    /// Names of the constraints whose incremental score is wrong.
    pub constraints: Vec<String>,
}

type Touched = SmallVec<[(usize, usize, Entity); 2]>;

/// Owns the working solution and keeps one session per constraint.
///
/// Scores of candidate changes are computed from the affected entities
/// only; [`full_score`](Self::full_score) recomputes from scratch.
pub struct ScoreDirector {
    working: Solution,
    constraints: ConstraintSet,
    sessions: Vec<ConstraintSession>,
    // session indices per entity class
    by_class: Vec<Vec<usize>>,
    score: HardSoftScore,
    calculation_count: AtomicU64,
}

impl ScoreDirector {
    /// Builds sessions for every constraint and scores the solution.
    pub fn new(working: Solution, constraints: ConstraintSet) -> Result<Self, ConfigurationError> {
        let descriptor = working.descriptor().clone();
        constraints.validate(&descriptor)?;

        let mut by_class = vec![Vec::new(); descriptor.entity_classes.len()];
        let mut sessions = Vec::with_capacity(constraints.len());
        for constraint in &constraints {
            let class = descriptor.require_entity_class(constraint.entity_class())?;
            by_class[class].push(sessions.len());
            let mut session = ConstraintSession::new(constraint.clone(), class);
            session.initialize(&working);
            sessions.push(session);
        }

        let mut director = Self {
            working,
            constraints,
            sessions,
            by_class,
            score: HardSoftScore::ZERO,
            calculation_count: AtomicU64::new(1),
        };
        director.score = director.session_total();
        Ok(director)
    }

    fn session_total(&self) -> HardSoftScore {
        self.sessions.iter().map(ConstraintSession::score).sum()
    }

    /// Current score of the working solution.
    pub fn score(&self) -> HardSoftScore {
        self.score
    }

    /// Returns the current score, counting it as a calculation.
    pub fn calculate_score(&mut self) -> HardSoftScore {
        self.calculation_count.fetch_add(1, Ordering::Relaxed);
        self.score
    }

    /// Scores the working solution from scratch, ignoring cached state.
    pub fn full_score(&self) -> HardSoftScore {
        self.sessions
            .iter()
            .map(|s| s.constraint().evaluate(&self.working, s.class()).score)
            .sum()
    }

    /// Score the working solution would have after `changes`, without
    /// applying them.
    pub fn score_changes(&self, changes: &[VariableChange]) -> HardSoftScore {
        self.calculation_count.fetch_add(1, Ordering::Relaxed);
        let touched = self.touched(changes);
        if touched.is_empty() {
            return self.score;
        }

        let mut score = HardSoftScore::ZERO;
        for (class, sessions) in self.by_class.iter().enumerate() {
            let views: SmallVec<[EntityView<'_>; 2]> = touched
                .iter()
                .filter(|(c, _, _)| *c == class)
                .map(|(c, index, entity)| EntityView::new(*c, *index, entity, self.working.facts()))
                .collect();
            for &s in sessions {
                let session = &self.sessions[s];
                score += if views.is_empty() {
                    session.score()
                } else {
                    session.score_with(session.measure_delta(&views))
                };
            }
        }
        score
    }

    /// Applies `changes` to the working solution and returns the new score.
    pub fn apply_changes(&mut self, changes: &[VariableChange]) -> HardSoftScore {
        self.calculation_count.fetch_add(1, Ordering::Relaxed);
        let mut keys: SmallVec<[(usize, usize); 2]> = SmallVec::new();
        for change in changes {
            if self.working.entity(change.class, change.entity).is_some()
                && !keys.contains(&(change.class, change.entity))
            {
                keys.push((change.class, change.entity));
            }
        }

        for &(class, entity) in &keys {
            for &s in &self.by_class[class] {
                self.sessions[s].retract(entity);
            }
        }
        for change in changes {
            if keys.contains(&(change.class, change.entity)) {
                self.working
                    .set_value(change.class, change.entity, change.field, change.value.clone());
            }
        }
        for &(class, entity) in &keys {
            if let Some(view) = self.working.view(class, entity) {
                for &s in &self.by_class[class] {
                    self.sessions[s].insert(&view);
                }
            }
        }

        self.score = self.session_total();
        self.score
    }

    /// Clones the touched entities and applies `changes` to the clones.
    fn touched(&self, changes: &[VariableChange]) -> Touched {
        let mut touched = Touched::new();
        for change in changes {
            let slot = match touched
                .iter()
                .position(|(c, e, _)| *c == change.class && *e == change.entity)
            {
                Some(slot) => slot,
                None => {
                    let Some(entity) = self.working.entity(change.class, change.entity) else {
                        continue;
                    };
                    touched.push((change.class, change.entity, entity.clone()));
                    touched.len() - 1
                }
            };
            touched[slot].2.set(change.field, change.value.clone());
        }
        touched
    }

    /// Compares every session against a from-scratch evaluation.
    pub fn assert_consistency(&self) -> Result<(), ScoreCorruption> {
        let full = self.full_score();
        let constraints: Vec<String> = self
            .sessions
            .iter()
            .filter(|s| s.score() != s.constraint().evaluate(&self.working, s.class()).score)
            .map(|s| s.constraint().constraint_ref().full_name())
            .collect();
        if full == self.score && constraints.is_empty() {
            Ok(())
        } else {
            Err(ScoreCorruption {
                incremental: self.score,
                full,
                constraints,
            })
        }
    }

    /// Per-constraint breakdown of the current score.
    pub fn analyze(&self) -> ScoreAnalysis {
        let constraints = self
            .sessions
            .iter()
            .map(|s| {
                let constraint = s.constraint();
                let eval = constraint.evaluate(&self.working, s.class());
                ConstraintAnalysis {
                    constraint_ref: constraint.constraint_ref().clone(),
                    weight: constraint.weight(),
                    score: eval.score,
                    match_count: eval.match_count,
                    is_hard: constraint.is_hard(),
                }
            })
            .collect();
        ScoreAnalysis::new(self.full_score(), constraints)
    }

    pub fn working_solution(&self) -> &Solution {
        &self.working
    }

    /// Clones the working solution with its score set.
    pub fn clone_working_solution(&self) -> Solution {
        let mut solution = self.working.clone();
        solution.set_score(Some(self.score));
        solution
    }

    /// Consumes the director, returning the working solution with its score set.
    pub fn into_working_solution(self) -> Solution {
        let mut solution = self.working;
        solution.set_score(Some(self.score));
        solution
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn constraint_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of score calculations performed so far.
    pub fn calculation_count(&self) -> u64 {
        self.calculation_count.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for ScoreDirector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreDirector")
            .field("score", &self.score)
            .field("constraints", &self.sessions.len())
            .field("entities", &self.working.entity_count())
            .finish()
    }
}
