//! 0/1 knapsack.
//!
//! Each `KnapsackItem` entity decides whether its `Item` fact goes into a
//! knapsack of capacity [`MAX_WEIGHT`]. The best packing is worth 19.

use plansmith_core::{
    Entity, EntityClassDef, EntityView, Fact, FactClassDef, FieldDef, HardSoftScore, Solution,
    SolutionDescriptor, Value, ValueRangeDef,
};
use plansmith_scoring::{group_key, Collector, Constraint, ConstraintSet};

pub const MAX_WEIGHT: i64 = 10;

/// Class indices.
pub const ITEM: usize = 0;
pub const KNAPSACK_ITEM: usize = 0;

/// `Item` fields.
pub const ITEM_ID: usize = 0;
pub const WEIGHT: usize = 1;
pub const VALUE: usize = 2;

/// `KnapsackItem` fields.
pub const ID: usize = 0;
pub const ITEM_REF: usize = 1;
pub const IN_KNAPSACK: usize = 2;

/// (weight, value) of the generated items.
pub const ITEMS: [(i64, i64); 5] = [(4, 10), (2, 4), (2, 3), (1, 2), (5, 7)];

pub fn descriptor() -> SolutionDescriptor {
    SolutionDescriptor::new("Knapsack")
        .with_fact_class(
            FactClassDef::new("Item")
                .with_field(FieldDef::planning_id("id"))
                .with_field(FieldDef::new("weight"))
                .with_field(FieldDef::new("value")),
        )
        .with_entity_class(
            EntityClassDef::new("KnapsackItem")
                .with_field(FieldDef::planning_id("id"))
                .with_field(FieldDef::new("item"))
                .with_field(FieldDef::planning_variable("in_knapsack", "booleanRange")),
        )
        .with_value_range("booleanRange", ValueRangeDef::Bool)
}

/// Builds a problem from (weight, value) pairs with every item left out.
pub fn problem(items: &[(i64, i64)]) -> Solution {
    let mut solution = Solution::new(descriptor());
    for (i, &(weight, value)) in items.iter().enumerate() {
        let id = i as i64 + 1;
        let item = solution.add_fact(
            ITEM,
            Fact::new(vec![Value::Int(id), Value::Int(weight), Value::Int(value)]),
        );
        solution.add_entity(
            KNAPSACK_ITEM,
            Entity::new(vec![Value::Int(id), Value::Fact(item), Value::Bool(false)]),
        );
    }
    solution
}

/// The five-item problem from [`ITEMS`].
pub fn generate_problem() -> Solution {
    problem(&ITEMS)
}

fn is_selected(item: &EntityView<'_>) -> bool {
    item.get(IN_KNAPSACK).as_bool() == Some(true)
}

fn item_field(item: &EntityView<'_>, field: usize) -> i64 {
    item.fact(ITEM_REF)
        .and_then(|fact| fact.get(field).as_int())
        .unwrap_or(0)
}

pub fn constraints() -> ConstraintSet {
    ConstraintSet::new()
        .with(
            Constraint::for_each("KnapsackItem")
                .filter(is_selected)
                .group_by(|_| group_key![], Collector::sum(|i| item_field(i, WEIGHT)))
                .having(|total| total.value > MAX_WEIGHT)
                .penalize_with("Max weight", HardSoftScore::ONE_HARD, |total| {
                    total.value - MAX_WEIGHT
                })
                .in_package("knapsack"),
        )
        .with(
            Constraint::for_each("KnapsackItem")
                .filter(is_selected)
                .group_by(|_| group_key![], Collector::sum(|i| item_field(i, VALUE)))
                .reward_with("Maximize value", HardSoftScore::ONE_SOFT, |total| total.value)
                .in_package("knapsack"),
        )
}

/// Total (weight, value) of the selected items.
pub fn totals(solution: &Solution) -> (i64, i64) {
    (0..solution.entities(KNAPSACK_ITEM).len())
        .filter_map(|i| solution.view(KNAPSACK_ITEM, i))
        .filter(is_selected)
        .fold((0, 0), |(w, v), item| {
            (w + item_field(&item, WEIGHT), v + item_field(&item, VALUE))
        })
}

/// Marks the given entity indices as packed.
pub fn select(solution: &mut Solution, indices: &[usize]) {
    for &i in indices {
        solution.set_value(KNAPSACK_ITEM, i, IN_KNAPSACK, Value::Bool(true));
    }
}
