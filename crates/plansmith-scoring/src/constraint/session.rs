//! Incremental per-constraint state.

use std::collections::HashMap;
use std::sync::Arc;

use plansmith_core::{EntityView, HardSoftScore, Solution};
use smallvec::SmallVec;

use super::{group_measure, Aggregate, Constraint, GroupKey, Matching};

/// Cached contribution of one entity.
#[derive(Debug, Clone)]
enum Membership {
    /// The entity matched with this measure.
    Entity(i64),
    /// The entity belongs to `key` and fed `value` into its aggregate.
    Group { key: GroupKey, value: i64 },
}

/// Incremental bookkeeping for one constraint over one entity class.
///
/// `total` is the sum of match measures, so the constraint's score is
/// always `constraint.score_of(total)`.
#[derive(Debug, Clone)]
pub(crate) struct ConstraintSession {
    constraint: Arc<Constraint>,
    class: usize,
    total: i64,
    members: Vec<Option<Membership>>,
    groups: HashMap<GroupKey, Aggregate>,
}

impl ConstraintSession {
    pub(crate) fn new(constraint: Arc<Constraint>, class: usize) -> Self {
        Self {
            constraint,
            class,
            total: 0,
            members: Vec::new(),
            groups: HashMap::new(),
        }
    }

    pub(crate) fn constraint(&self) -> &Arc<Constraint> {
        &self.constraint
    }

    pub(crate) fn class(&self) -> usize {
        self.class
    }

    pub(crate) fn score(&self) -> HardSoftScore {
        self.constraint.score_of(self.total)
    }

    /// Score the constraint would have after a measure change.
    pub(crate) fn score_with(&self, delta: i64) -> HardSoftScore {
        self.constraint.score_of(self.total + delta)
    }

    /// Rebuilds the state from the solution.
    pub(crate) fn initialize(&mut self, solution: &Solution) {
        self.total = 0;
        self.groups.clear();
        self.members = vec![None; solution.entities(self.class).len()];
        for index in 0..self.members.len() {
            if let Some(view) = solution.view(self.class, index) {
                self.insert(&view);
            }
        }
    }

    /// Membership the entity would have with the values seen through `view`.
    fn membership_of(&self, view: &EntityView<'_>) -> Option<Membership> {
        if !self.constraint.accepts(view) {
            return None;
        }
        match self.constraint.matching() {
            Matching::PerEntity { .. } => {
                Some(Membership::Entity(self.constraint.entity_measure(view)))
            }
            Matching::Grouped { key, collector, .. } => Some(Membership::Group {
                key: key(view),
                value: collector.extract(view),
            }),
        }
    }

    fn group_measure(&self, aggregate: &Aggregate) -> i64 {
        match self.constraint.matching() {
            Matching::Grouped { having, measure, .. } => {
                group_measure(having, measure, aggregate).unwrap_or(0)
            }
            Matching::PerEntity { .. } => 0,
        }
    }

    /// Adds an entity and returns the change in total measure.
    pub(crate) fn insert(&mut self, view: &EntityView<'_>) -> i64 {
        let index = view.index();
        if index >= self.members.len() {
            self.members.resize(index + 1, None);
        }
        let Some(membership) = self.membership_of(view) else {
            self.members[index] = None;
            return 0;
        };

        let delta = match &membership {
            Membership::Entity(measure) => *measure,
            Membership::Group { key, value } => {
                let before = self.groups.get(key).copied().unwrap_or_default();
                let mut after = before;
                after.accumulate(*value);
                let delta = self.group_measure(&after) - self.group_measure(&before);
                self.groups.insert(key.clone(), after);
                delta
            }
        };

        self.members[index] = Some(membership);
        self.total += delta;
        delta
    }

    /// Removes an entity using its cached membership and returns the change
    /// in total measure.
    pub(crate) fn retract(&mut self, index: usize) -> i64 {
        let Some(membership) = self.members.get_mut(index).and_then(Option::take) else {
            return 0;
        };

        let delta = match membership {
            Membership::Entity(measure) => -measure,
            Membership::Group { key, value } => {
                let before = self.groups.get(&key).copied().unwrap_or_default();
                let mut after = before;
                after.retract(value);
                let delta = self.group_measure(&after) - self.group_measure(&before);
                if after.is_empty() {
                    self.groups.remove(&key);
                } else {
                    self.groups.insert(key, after);
                }
                delta
            }
        };

        self.total += delta;
        delta
    }

    /// Change in total measure if the given entities took the values seen
    /// through their views. Leaves the state untouched.
    pub(crate) fn measure_delta(&self, changed: &[EntityView<'_>]) -> i64 {
        let mut delta = 0i64;
        let mut affected: SmallVec<[(GroupKey, Aggregate); 4]> = SmallVec::new();

        for view in changed {
            let old = self.members.get(view.index()).and_then(Option::as_ref);
            let new = self.membership_of(view);

            for (membership, sign) in [(old, -1i64), (new.as_ref(), 1i64)] {
                match membership {
                    None => {}
                    Some(Membership::Entity(measure)) => delta += sign * measure,
                    Some(Membership::Group { key, value }) => {
                        let slot = match affected.iter().position(|(k, _)| k == key) {
                            Some(pos) => pos,
                            None => {
                                let current = self.groups.get(key).copied().unwrap_or_default();
                                affected.push((key.clone(), current));
                                affected.len() - 1
                            }
                        };
                        let aggregate = &mut affected[slot].1;
                        if sign < 0 {
                            aggregate.retract(*value);
                        } else {
                            aggregate.accumulate(*value);
                        }
                    }
                }
            }
        }

        for (key, after) in &affected {
            let before = self.groups.get(key).copied().unwrap_or_default();
            delta += self.group_measure(after) - self.group_measure(&before);
        }
        delta
    }

    /// Number of groups currently holding members.
    #[cfg(test)]
    pub(crate) fn group_count(&self) -> usize {
        self.groups.len()
    }
}
