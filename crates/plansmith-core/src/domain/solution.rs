//! Facts, entities and the solution holding them.

use std::collections::HashSet;
use std::sync::Arc;

use super::descriptor::{FieldDef, SolutionDescriptor};
use super::value::{FactRef, Value};
use super::view::EntityView;
use crate::error::{ConfigurationError, Result};
use crate::score::HardSoftScore;

static NONE: Value = Value::None;

/// An immutable problem fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    fields: Vec<Value>,
}

impl Fact {
    pub fn new(fields: Vec<Value>) -> Self {
        Self { fields }
    }

    /// Returns the field at `index`, or `Value::None` past the end.
    #[inline]
    pub fn get(&self, index: usize) -> &Value {
        self.fields.get(index).unwrap_or(&NONE)
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }
}

/// A planning entity; some of its fields are planning variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    fields: Vec<Value>,
}

impl Entity {
    pub fn new(fields: Vec<Value>) -> Self {
        Self { fields }
    }

    /// Returns the field at `index`, or `Value::None` past the end.
    #[inline]
    pub fn get(&self, index: usize) -> &Value {
        self.fields.get(index).unwrap_or(&NONE)
    }

    /// Replaces a field value and returns the previous one.
    ///
    /// Writing past the end grows the record with `Value::None`.
    pub fn set(&mut self, index: usize, value: Value) -> Value {
        if index >= self.fields.len() {
            self.fields.resize(index + 1, Value::None);
        }
        std::mem::replace(&mut self.fields[index], value)
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }
}

/// All problem facts, grouped by fact class index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facts {
    classes: Vec<Vec<Fact>>,
}

impl Facts {
    fn with_classes(count: usize) -> Self {
        Self {
            classes: vec![Vec::new(); count],
        }
    }

    #[inline]
    pub fn get(&self, r: FactRef) -> Option<&Fact> {
        self.classes.get(r.class).and_then(|c| c.get(r.index))
    }

    /// Resolves a value holding a fact reference.
    pub fn resolve(&self, value: &Value) -> Option<&Fact> {
        value.as_fact().and_then(|r| self.get(r))
    }

    pub fn class(&self, class: usize) -> &[Fact] {
        self.classes.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// References to every fact of a class, in insertion order.
    pub fn refs(&self, class: usize) -> impl Iterator<Item = FactRef> + '_ {
        (0..self.class(class).len()).map(move |index| FactRef::new(class, index))
    }
}

/// A planning solution: problem facts plus planning entities.
///
/// Facts and the descriptor are shared behind `Arc`, so cloning a solution
/// copies only the entity table.
#[derive(Debug, Clone)]
pub struct Solution {
    descriptor: Arc<SolutionDescriptor>,
    facts: Arc<Facts>,
    entities: Vec<Vec<Entity>>,
    score: Option<HardSoftScore>,
}

impl Solution {
    pub fn new(descriptor: impl Into<Arc<SolutionDescriptor>>) -> Self {
        let descriptor = descriptor.into();
        let facts = Facts::with_classes(descriptor.fact_classes.len());
        let entities = vec![Vec::new(); descriptor.entity_classes.len()];
        Self {
            descriptor,
            facts: Arc::new(facts),
            entities,
            score: None,
        }
    }

    pub fn descriptor(&self) -> &Arc<SolutionDescriptor> {
        &self.descriptor
    }

    pub fn facts(&self) -> &Facts {
        &self.facts
    }

    /// Adds a fact and returns its reference.
    ///
    /// # Panics
    /// Panics if `class` is not a fact class index of the descriptor.
    pub fn add_fact(&mut self, class: usize, fact: Fact) -> FactRef {
        let facts = Arc::make_mut(&mut self.facts);
        let bucket = &mut facts.classes[class];
        bucket.push(fact);
        FactRef::new(class, bucket.len() - 1)
    }

    /// Adds an entity and returns its index within the class.
    ///
    /// # Panics
    /// Panics if `class` is not an entity class index of the descriptor.
    pub fn add_entity(&mut self, class: usize, entity: Entity) -> usize {
        let bucket = &mut self.entities[class];
        bucket.push(entity);
        bucket.len() - 1
    }

    pub fn fact(&self, r: FactRef) -> Option<&Fact> {
        self.facts.get(r)
    }

    pub fn entities(&self, class: usize) -> &[Entity] {
        self.entities.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entity(&self, class: usize, index: usize) -> Option<&Entity> {
        self.entities.get(class).and_then(|c| c.get(index))
    }

    /// Number of entity classes in the table.
    pub fn entity_class_count(&self) -> usize {
        self.entities.len()
    }

    /// Total number of entities across classes.
    pub fn entity_count(&self) -> usize {
        self.entities.iter().map(Vec::len).sum()
    }

    /// Reads one variable.
    pub fn value(&self, class: usize, entity: usize, field: usize) -> &Value {
        self.entity(class, entity).map_or(&NONE, |e| e.get(field))
    }

    /// Writes one field and returns the previous value.
    ///
    /// # Panics
    /// Panics if the entity does not exist.
    pub fn set_value(&mut self, class: usize, entity: usize, field: usize, value: Value) -> Value {
        self.entities[class][entity].set(field, value)
    }

    pub fn view(&self, class: usize, index: usize) -> Option<EntityView<'_>> {
        self.entity(class, index)
            .map(|entity| EntityView::new(class, index, entity, &self.facts))
    }

    pub fn score(&self) -> Option<HardSoftScore> {
        self.score
    }

    pub fn set_score(&mut self, score: Option<HardSoftScore>) {
        self.score = score;
    }

    /// Returns the planning id of an entity, if it has one.
    pub fn entity_id(&self, class: usize, index: usize) -> Option<i64> {
        let id_field = self.descriptor.entity_classes.get(class)?.planning_id_index()?;
        self.entity(class, index)?.get(id_field).as_int()
    }

    /// Returns true when both solutions assign the same entity values.
    pub fn same_assignment(&self, other: &Solution) -> bool {
        self.entities == other.entities
    }

    /// Checks planning ids of every fact and entity class.
    ///
    /// Each class must declare a planning id field, every record must hold
    /// an integer id there, and ids must be unique within the class.
    pub fn validate(&self) -> Result<()> {
        for (class, def) in self.descriptor.fact_classes.iter().enumerate() {
            let records = self.facts.class(class).iter().map(Fact::fields);
            check_ids(&def.name, &def.fields, records)?;
        }
        for (class, def) in self.descriptor.entity_classes.iter().enumerate() {
            let records = self.entities(class).iter().map(Entity::fields);
            check_ids(&def.name, &def.fields, records)?;
        }
        Ok(())
    }
}

fn check_ids<'a>(
    class: &str,
    fields: &[FieldDef],
    records: impl Iterator<Item = &'a [Value]>,
) -> Result<()> {
    let id_field = fields
        .iter()
        .position(|f| f.kind == super::FieldKind::PlanningId)
        .ok_or_else(|| ConfigurationError::MissingPlanningId {
            class: class.to_string(),
        })?;

    let mut seen = HashSet::new();
    for (index, record) in records.enumerate() {
        let id = record
            .get(id_field)
            .and_then(Value::as_int)
            .ok_or_else(|| ConfigurationError::InvalidPlanningId {
                class: class.to_string(),
                index,
            })?;
        if !seen.insert(id) {
            return Err(ConfigurationError::DuplicateId {
                class: class.to_string(),
                id,
            });
        }
    }
    Ok(())
}
