//! Resolution of value ranges for every planning variable.

use std::collections::HashMap;
use std::sync::Arc;

use super::descriptor::ValueRangeDef;
use super::solution::{Facts, Solution};
use super::value::Value;
use crate::error::{ConfigurationError, Result};

/// Legal values of every planning variable of every entity.
///
/// Built once per solve, before the first step. Shared ranges are resolved
/// once and handed out by `Arc`; per-entity ranges are computed per entity.
///
/// # Example
///
/// ```
/// use plansmith_core::*;
///
/// let descriptor = SolutionDescriptor::new("Demo")
///     .with_entity_class(
///         EntityClassDef::new("Task")
///             .with_field(FieldDef::planning_id("id"))
///             .with_field(FieldDef::planning_variable("slot", "slots")),
///     )
///     .with_value_range("slots", ValueRangeDef::IntRange { start: 0, end: 3 });
///
/// let mut solution = Solution::new(descriptor);
/// solution.add_entity(0, Entity::new(vec![Value::Int(1), Value::None]));
///
/// let registry = ValueRangeRegistry::new(&solution).unwrap();
/// assert_eq!(registry.values(0, 0, 1).len(), 3);
/// assert!(registry.contains(0, 0, 1, &Value::Int(2)));
/// ```
#[derive(Debug, Clone)]
pub struct ValueRangeRegistry {
    /// Planning variable field indices per entity class.
    variables: Vec<Vec<usize>>,
    /// Whether each variable (by slot) draws from a shared range.
    shared: Vec<Vec<bool>>,
    /// `[class][entity][slot]` resolved values.
    ranges: Vec<Vec<Vec<Arc<[Value]>>>>,
}

impl ValueRangeRegistry {
    /// Resolves every declared variable's range.
    ///
    /// # Errors
    ///
    /// Fails when a variable names an undeclared range, when a fact-class
    /// range names an unknown class, or when any range resolves empty.
    pub fn new(solution: &Solution) -> Result<Self> {
        let descriptor = solution.descriptor();
        let mut cache: HashMap<&str, Arc<[Value]>> = HashMap::new();
        let mut variables = Vec::with_capacity(descriptor.entity_classes.len());
        let mut shared = Vec::with_capacity(descriptor.entity_classes.len());
        let mut ranges = Vec::with_capacity(descriptor.entity_classes.len());

        for (class, def) in descriptor.entity_classes.iter().enumerate() {
            let vars = def.variable_indices();
            let entity_count = solution.entities(class).len();
            let mut class_ranges: Vec<Vec<Arc<[Value]>>> =
                vec![Vec::with_capacity(vars.len()); entity_count];
            let mut class_shared = Vec::with_capacity(vars.len());

            for &field in &vars {
                let field_def = &def.fields[field];
                let range_name = field_def.value_range().unwrap_or_default();
                let empty = || ConfigurationError::EmptyValueRange {
                    entity_class: def.name.clone(),
                    variable: field_def.name.clone(),
                    range: range_name.to_string(),
                };
                let range_def = descriptor.value_range(range_name).ok_or_else(|| {
                    ConfigurationError::UnknownValueRange {
                        entity_class: def.name.clone(),
                        variable: field_def.name.clone(),
                        range: range_name.to_string(),
                    }
                })?;

                match range_def {
                    ValueRangeDef::PerEntity(compute) => {
                        class_shared.push(false);
                        for (index, entity) in solution.entities(class).iter().enumerate() {
                            let values: Arc<[Value]> = compute(solution.facts(), entity).into();
                            if values.is_empty() {
                                return Err(empty());
                            }
                            class_ranges[index].push(values);
                        }
                    }
                    shared_def => {
                        class_shared.push(true);
                        let values = match cache.get(range_name) {
                            Some(values) => values.clone(),
                            None => {
                                let values = resolve_shared(shared_def, solution)?;
                                cache.insert(range_name, values.clone());
                                values
                            }
                        };
                        if values.is_empty() {
                            return Err(empty());
                        }
                        for slots in class_ranges.iter_mut() {
                            slots.push(values.clone());
                        }
                    }
                }
            }

            variables.push(vars);
            shared.push(class_shared);
            ranges.push(class_ranges);
        }

        Ok(Self {
            variables,
            shared,
            ranges,
        })
    }

    /// Field indices of the planning variables of an entity class.
    pub fn variables(&self, class: usize) -> &[usize] {
        self.variables.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    fn slot(&self, class: usize, field: usize) -> Option<usize> {
        self.variables(class).iter().position(|&f| f == field)
    }

    /// Legal values of one variable of one entity.
    ///
    /// Empty when the field is not a planning variable.
    pub fn values(&self, class: usize, entity: usize, field: usize) -> &[Value] {
        self.slot(class, field)
            .and_then(|slot| self.ranges.get(class)?.get(entity)?.get(slot))
            .map(|values| &values[..])
            .unwrap_or(&[])
    }

    pub fn contains(&self, class: usize, entity: usize, field: usize, value: &Value) -> bool {
        self.values(class, entity, field).contains(value)
    }

    /// Returns true when every entity of the class shares the variable's range.
    pub fn is_shared(&self, class: usize, field: usize) -> bool {
        self.slot(class, field)
            .and_then(|slot| self.shared.get(class)?.get(slot).copied())
            .unwrap_or(false)
    }

    /// Size of the largest resolved range.
    pub fn value_count(&self) -> usize {
        self.ranges
            .iter()
            .flatten()
            .flatten()
            .map(|values| values.len())
            .max()
            .unwrap_or(0)
    }

    /// Number of (entity, variable) pairs.
    pub fn variable_count(&self) -> usize {
        self.ranges.iter().flatten().map(Vec::len).sum()
    }

    /// Checks that every assigned variable holds a value of its range.
    ///
    /// Unassigned (`Value::None`) variables are accepted.
    pub fn check_assignments(&self, solution: &Solution) -> Result<()> {
        let descriptor = solution.descriptor();
        for (class, vars) in self.variables.iter().enumerate() {
            for (index, entity) in solution.entities(class).iter().enumerate() {
                for &field in vars {
                    let value = entity.get(field);
                    if value.is_none() || self.contains(class, index, field, value) {
                        continue;
                    }
                    let def = &descriptor.entity_classes[class];
                    return Err(ConfigurationError::ValueOutOfRange {
                        entity_class: def.name.clone(),
                        variable: def.fields[field].name.clone(),
                        entity_id: solution.entity_id(class, index).unwrap_or(-1),
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn resolve_shared(def: &ValueRangeDef, solution: &Solution) -> Result<Arc<[Value]>> {
    let facts: &Facts = solution.facts();
    let values: Arc<[Value]> = match def {
        ValueRangeDef::Explicit(values) => values.as_slice().into(),
        ValueRangeDef::Bool => Arc::from([Value::Bool(true), Value::Bool(false)]),
        ValueRangeDef::IntRange { start, end } => (*start..*end).map(Value::Int).collect(),
        ValueRangeDef::FactClass(class_name) => {
            let class = solution
                .descriptor()
                .fact_class_index(class_name)
                .ok_or_else(|| ConfigurationError::UnknownClass(class_name.clone()))?;
            facts.refs(class).map(Value::Fact).collect()
        }
        ValueRangeDef::PerEntity(_) => Arc::from(Vec::new()),
    };
    Ok(values)
}
