//! Runtime descriptors of a planning problem's shape.

use std::fmt;
use std::sync::Arc;

use super::solution::{Entity, Facts};
use super::value::Value;
use crate::error::{ConfigurationError, Result};

/// Computes the legal values of a variable for one entity.
pub type EntityRangeFn = Arc<dyn Fn(&Facts, &Entity) -> Vec<Value> + Send + Sync>;

/// Role of a field within its class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Plain,
    /// Integer identity, unique within the class.
    PlanningId,
    /// Assigned by the solver from the named value range.
    PlanningVariable { value_range: String },
}

/// A named field of a fact or entity class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Plain,
        }
    }

    pub fn planning_id(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::PlanningId,
        }
    }

    pub fn planning_variable(name: impl Into<String>, value_range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::PlanningVariable {
                value_range: value_range.into(),
            },
        }
    }

    pub fn is_planning_variable(&self) -> bool {
        matches!(self.kind, FieldKind::PlanningVariable { .. })
    }

    pub fn value_range(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::PlanningVariable { value_range } => Some(value_range),
            _ => None,
        }
    }
}

fn planning_id_index(fields: &[FieldDef]) -> Option<usize> {
    fields.iter().position(|f| f.kind == FieldKind::PlanningId)
}

/// Class of immutable problem facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactClassDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl FactClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn planning_id_index(&self) -> Option<usize> {
        planning_id_index(&self.fields)
    }
}

/// Class of planning entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityClassDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl EntityClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn planning_id_index(&self) -> Option<usize> {
        planning_id_index(&self.fields)
    }

    /// Field indices of the planning variables, in declaration order.
    pub fn variable_indices(&self) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_planning_variable())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Declaration of a value range.
#[derive(Clone)]
pub enum ValueRangeDef {
    /// A fixed list of values.
    Explicit(Vec<Value>),
    /// `true` and `false`.
    Bool,
    /// Integers in `start..end`.
    IntRange { start: i64, end: i64 },
    /// Every fact of the named class.
    FactClass(String),
    /// Computed separately for every entity.
    PerEntity(EntityRangeFn),
}

impl ValueRangeDef {
    pub fn per_entity<F>(f: F) -> Self
    where
        F: Fn(&Facts, &Entity) -> Vec<Value> + Send + Sync + 'static,
    {
        ValueRangeDef::PerEntity(Arc::new(f))
    }

    /// Returns true when every entity shares the same values.
    pub fn is_shared(&self) -> bool {
        !matches!(self, ValueRangeDef::PerEntity(_))
    }
}

impl fmt::Debug for ValueRangeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRangeDef::Explicit(values) => f.debug_tuple("Explicit").field(values).finish(),
            ValueRangeDef::Bool => write!(f, "Bool"),
            ValueRangeDef::IntRange { start, end } => f
                .debug_struct("IntRange")
                .field("start", start)
                .field("end", end)
                .finish(),
            ValueRangeDef::FactClass(class) => f.debug_tuple("FactClass").field(class).finish(),
            ValueRangeDef::PerEntity(_) => write!(f, "PerEntity(..)"),
        }
    }
}

/// Shape of a planning solution: classes and value ranges.
///
/// # Example
///
/// ```
/// use plansmith_core::{EntityClassDef, FieldDef, SolutionDescriptor, ValueRangeDef};
///
/// let descriptor = SolutionDescriptor::new("Knapsack")
///     .with_entity_class(
///         EntityClassDef::new("KnapsackItem")
///             .with_field(FieldDef::planning_id("id"))
///             .with_field(FieldDef::planning_variable("in_knapsack", "booleanRange")),
///     )
///     .with_value_range("booleanRange", ValueRangeDef::Bool);
///
/// assert_eq!(descriptor.entity_class_index("KnapsackItem"), Some(0));
/// assert!(descriptor.value_range("booleanRange").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct SolutionDescriptor {
    pub name: String,
    pub fact_classes: Vec<FactClassDef>,
    pub entity_classes: Vec<EntityClassDef>,
    pub value_ranges: Vec<(String, ValueRangeDef)>,
}

impl SolutionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fact_classes: Vec::new(),
            entity_classes: Vec::new(),
            value_ranges: Vec::new(),
        }
    }

    pub fn with_fact_class(mut self, class: FactClassDef) -> Self {
        self.fact_classes.push(class);
        self
    }

    pub fn with_entity_class(mut self, class: EntityClassDef) -> Self {
        self.entity_classes.push(class);
        self
    }

    /// Declares a named value range, replacing an earlier one of the same name.
    pub fn with_value_range(mut self, name: impl Into<String>, range: ValueRangeDef) -> Self {
        let name = name.into();
        self.value_ranges.retain(|(n, _)| *n != name);
        self.value_ranges.push((name, range));
        self
    }

    pub fn fact_class_index(&self, name: &str) -> Option<usize> {
        self.fact_classes.iter().position(|c| c.name == name)
    }

    pub fn entity_class_index(&self, name: &str) -> Option<usize> {
        self.entity_classes.iter().position(|c| c.name == name)
    }

    /// Like [`entity_class_index`](Self::entity_class_index) but reports unknown names.
    pub fn require_entity_class(&self, name: &str) -> Result<usize> {
        self.entity_class_index(name)
            .ok_or_else(|| ConfigurationError::UnknownClass(name.to_string()))
    }

    /// Resolves a field index on an entity class by names.
    pub fn require_entity_field(&self, class: usize, field: &str) -> Result<usize> {
        let def = self
            .entity_classes
            .get(class)
            .ok_or_else(|| ConfigurationError::UnknownClass(format!("#{}", class)))?;
        def.field_index(field)
            .ok_or_else(|| ConfigurationError::UnknownField {
                class: def.name.clone(),
                field: field.to_string(),
            })
    }

    pub fn value_range(&self, name: &str) -> Option<&ValueRangeDef> {
        self.value_ranges
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    /// Total number of planning variables declared across entity classes.
    pub fn variable_count(&self) -> usize {
        self.entity_classes
            .iter()
            .map(|c| c.fields.iter().filter(|f| f.is_planning_variable()).count())
            .sum()
    }
}
