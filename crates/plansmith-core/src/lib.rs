//! Plansmith Core - score, domain and value range types
//!
//! This crate holds the pieces every other Plansmith crate agrees on:
//! - Score types for ranking candidate solutions
//! - A dynamic domain model (descriptors, facts, entities, values)
//! - The value range registry resolving legal values per planning variable
//! - Constraint identity and the configuration error surface

pub mod constraint;
pub mod domain;
pub mod error;
pub mod score;

pub use constraint::{ConstraintRef, ImpactType};
pub use domain::{
    Entity, EntityClassDef, EntityView, Fact, FactClassDef, FactRef, FieldDef, FieldKind, Solution,
    SolutionDescriptor, Value, ValueRangeDef, ValueRangeRegistry,
};
pub use error::{ConfigurationError, Result};
pub use score::{HardSoftScore, ParseableScore, Score, ScoreLevel, ScoreParseError};
