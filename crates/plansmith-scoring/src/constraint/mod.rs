//! Constraint declarations.
//!
//! A constraint selects the entities of one class that pass its filters,
//! optionally groups them by a key with a collector, and turns each match
//! into `weight * measure`, subtracted for penalties and added for rewards.

mod collector;
pub(crate) mod session;


use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use plansmith_core::{ConstraintRef, EntityView, HardSoftScore, ImpactType, Solution, Value};
use smallvec::SmallVec;

pub use collector::{Aggregate, Collector};

/// Key of a constraint group.
pub type GroupKey = SmallVec<[Value; 2]>;

pub(crate) type FilterFn = Arc<dyn Fn(&EntityView<'_>) -> bool + Send + Sync>;
pub(crate) type KeyFn = Arc<dyn Fn(&EntityView<'_>) -> GroupKey + Send + Sync>;
pub(crate) type MeasureFn = Arc<dyn Fn(&EntityView<'_>) -> i64 + Send + Sync>;
pub(crate) type HavingFn = Arc<dyn Fn(&Aggregate) -> bool + Send + Sync>;
pub(crate) type GroupMeasureFn = Arc<dyn Fn(&Aggregate) -> i64 + Send + Sync>;

/// Builds a [`GroupKey`] from values.
#[macro_export]
macro_rules! group_key {
    ($($value:expr),* $(,)?) => {{
        let key: $crate::GroupKey = $crate::smallvec::smallvec![$($value),*];
        key
    }};
}

/// How matches are formed from filtered entities.
#[derive(Clone)]
pub(crate) enum Matching {
    /// Every filtered entity is its own match.
    PerEntity { measure: Option<MeasureFn> },
    /// Filtered entities are grouped; each group passing `having` is a match.
    Grouped {
        key: KeyFn,
        collector: Collector,
        having: Option<HavingFn>,
        measure: Option<GroupMeasureFn>,
    },
}

/// A declared constraint.
#[derive(Clone)]
pub struct Constraint {
    constraint_ref: ConstraintRef,
    entity_class: String,
    filters: Vec<FilterFn>,
    matching: Matching,
    weight: HardSoftScore,
    impact: ImpactType,
}

/// Result of evaluating one constraint from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub score: HardSoftScore,
    pub match_count: usize,
}

impl Constraint {
    /// Starts a constraint over every entity of a class.
    pub fn for_each(entity_class: impl Into<String>) -> UniBuilder {
        UniBuilder {
            entity_class: entity_class.into(),
            filters: Vec::new(),
        }
    }

    /// Places the constraint in a package.
    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.constraint_ref.package = package.into();
        self
    }

    /// Overrides the weight, keeping everything else.
    pub fn with_weight(mut self, weight: HardSoftScore) -> Self {
        self.weight = weight;
        self
    }

    pub fn constraint_ref(&self) -> &ConstraintRef {
        &self.constraint_ref
    }

    pub fn name(&self) -> &str {
        &self.constraint_ref.name
    }

    pub fn entity_class(&self) -> &str {
        &self.entity_class
    }

    pub fn weight(&self) -> HardSoftScore {
        self.weight
    }

    pub fn impact(&self) -> ImpactType {
        self.impact
    }

    /// A constraint is hard when its weight has a hard component.
    pub fn is_hard(&self) -> bool {
        self.weight.has_hard()
    }

    /// Score of a total measure.
    #[inline]
    pub(crate) fn score_of(&self, measure: i64) -> HardSoftScore {
        self.weight.scale(measure.saturating_mul(self.impact.sign()))
    }

    #[inline]
    pub(crate) fn accepts(&self, view: &EntityView<'_>) -> bool {
        self.filters.iter().all(|f| f(view))
    }

    #[inline]
    pub(crate) fn entity_measure(&self, view: &EntityView<'_>) -> i64 {
        match &self.matching {
            Matching::PerEntity { measure: Some(m) } => m(view),
            _ => 1,
        }
    }

    pub(crate) fn matching(&self) -> &Matching {
        &self.matching
    }

    /// Evaluates the constraint over `class` of a solution from scratch.
    pub fn evaluate(&self, solution: &Solution, class: usize) -> Evaluation {
        let views = (0..solution.entities(class).len()).filter_map(|i| solution.view(class, i));
        let mut total = 0i64;
        let mut match_count = 0;

        match &self.matching {
            Matching::PerEntity { .. } => {
                for view in views.filter(|v| self.accepts(v)) {
                    total += self.entity_measure(&view);
                    match_count += 1;
                }
            }
            Matching::Grouped {
                key,
                collector,
                having,
                measure,
            } => {
                let mut groups: HashMap<GroupKey, Aggregate> = HashMap::new();
                for view in views.filter(|v| self.accepts(v)) {
                    groups
                        .entry(key(&view))
                        .or_default()
                        .accumulate(collector.extract(&view));
                }
                for aggregate in groups.values() {
                    if let Some(m) = group_measure(having, measure, aggregate) {
                        total += m;
                        match_count += 1;
                    }
                }
            }
        }

        Evaluation {
            score: self.score_of(total),
            match_count,
        }
    }
}

/// Measure of a group, or `None` when it is not a match.
#[inline]
pub(crate) fn group_measure(
    having: &Option<HavingFn>,
    measure: &Option<GroupMeasureFn>,
    aggregate: &Aggregate,
) -> Option<i64> {
    if aggregate.is_empty() || having.as_ref().is_some_and(|h| !h(aggregate)) {
        return None;
    }
    Some(measure.as_ref().map_or(1, |m| m(aggregate)))
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grouped = matches!(self.matching, Matching::Grouped { .. });
        f.debug_struct("Constraint")
            .field("name", &self.constraint_ref.full_name())
            .field("entity_class", &self.entity_class)
            .field("filters", &self.filters.len())
            .field("grouped", &grouped)
            .field("weight", &self.weight)
            .field("impact", &self.impact)
            .finish()
    }
}

/// Builder over single entities.
pub struct UniBuilder {
    entity_class: String,
    filters: Vec<FilterFn>,
}

impl UniBuilder {
    /// Keeps only entities for which `f` returns true.
    pub fn filter<F>(mut self, f: F) -> Self
    where
        F: Fn(&EntityView<'_>) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(f));
        self
    }

    /// Groups the filtered entities by key, collecting into an [`Aggregate`].
    pub fn group_by<K>(self, key: K, collector: Collector) -> GroupedBuilder
    where
        K: Fn(&EntityView<'_>) -> GroupKey + Send + Sync + 'static,
    {
        GroupedBuilder {
            uni: self,
            key: Arc::new(key),
            collector,
            having: None,
        }
    }

    fn finish(
        self,
        name: impl Into<String>,
        weight: HardSoftScore,
        impact: ImpactType,
        measure: Option<MeasureFn>,
    ) -> Constraint {
        Constraint {
            constraint_ref: ConstraintRef::new("", name),
            entity_class: self.entity_class,
            filters: self.filters,
            matching: Matching::PerEntity { measure },
            weight,
            impact,
        }
    }

    /// Subtracts `weight` per filtered entity.
    pub fn penalize(self, name: impl Into<String>, weight: HardSoftScore) -> Constraint {
        self.finish(name, weight, ImpactType::Penalty, None)
    }

    /// Subtracts `weight * measure(entity)` per filtered entity.
    pub fn penalize_with<M>(self, name: impl Into<String>, weight: HardSoftScore, measure: M) -> Constraint
    where
        M: Fn(&EntityView<'_>) -> i64 + Send + Sync + 'static,
    {
        self.finish(name, weight, ImpactType::Penalty, Some(Arc::new(measure)))
    }

    pub fn reward(self, name: impl Into<String>, weight: HardSoftScore) -> Constraint {
        self.finish(name, weight, ImpactType::Reward, None)
    }

    pub fn reward_with<M>(self, name: impl Into<String>, weight: HardSoftScore, measure: M) -> Constraint
    where
        M: Fn(&EntityView<'_>) -> i64 + Send + Sync + 'static,
    {
        self.finish(name, weight, ImpactType::Reward, Some(Arc::new(measure)))
    }
}

/// Builder over groups of entities.
pub struct GroupedBuilder {
    uni: UniBuilder,
    key: KeyFn,
    collector: Collector,
    having: Option<HavingFn>,
}

impl GroupedBuilder {
    /// Keeps only groups whose aggregate satisfies `f`.
    pub fn having<F>(mut self, f: F) -> Self
    where
        F: Fn(&Aggregate) -> bool + Send + Sync + 'static,
    {
        self.having = Some(Arc::new(f));
        self
    }

    fn finish(
        self,
        name: impl Into<String>,
        weight: HardSoftScore,
        impact: ImpactType,
        measure: Option<GroupMeasureFn>,
    ) -> Constraint {
        Constraint {
            constraint_ref: ConstraintRef::new("", name),
            entity_class: self.uni.entity_class,
            filters: self.uni.filters,
            matching: Matching::Grouped {
                key: self.key,
                collector: self.collector,
                having: self.having,
                measure,
            },
            weight,
            impact,
        }
    }

    /// Subtracts `weight` per matching group.
    pub fn penalize(self, name: impl Into<String>, weight: HardSoftScore) -> Constraint {
        self.finish(name, weight, ImpactType::Penalty, None)
    }

    /// Subtracts `weight * measure(aggregate)` per matching group.
    pub fn penalize_with<M>(self, name: impl Into<String>, weight: HardSoftScore, measure: M) -> Constraint
    where
        M: Fn(&Aggregate) -> i64 + Send + Sync + 'static,
    {
        self.finish(name, weight, ImpactType::Penalty, Some(Arc::new(measure)))
    }

    pub fn reward(self, name: impl Into<String>, weight: HardSoftScore) -> Constraint {
        self.finish(name, weight, ImpactType::Reward, None)
    }

    pub fn reward_with<M>(self, name: impl Into<String>, weight: HardSoftScore, measure: M) -> Constraint
    where
        M: Fn(&Aggregate) -> i64 + Send + Sync + 'static,
    {
        self.finish(name, weight, ImpactType::Reward, Some(Arc::new(measure)))
    }
}
