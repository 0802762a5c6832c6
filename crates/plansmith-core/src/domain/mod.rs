//! Dynamic domain model for planning problems.
//!
//! A problem is described at runtime by a [`SolutionDescriptor`]: fact
//! classes holding immutable problem data, entity classes whose planning
//! variables the solver assigns, and named value ranges. A [`Solution`]
//! holds the records themselves.

mod descriptor;
mod solution;
mod value;
mod value_range;
mod view;


pub use descriptor::{
    EntityClassDef, EntityRangeFn, FactClassDef, FieldDef, FieldKind, SolutionDescriptor,
    ValueRangeDef,
};
pub use solution::{Entity, Fact, Facts, Solution};
pub use value::{FactRef, Value};
pub use value_range::ValueRangeRegistry;
pub use view::EntityView;
