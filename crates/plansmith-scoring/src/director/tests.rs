use plansmith_core::{
    ConfigurationError, Entity, EntityClassDef, FieldDef, HardSoftScore, Solution,
    SolutionDescriptor, Value, ValueRangeDef,
};
use proptest::prelude::*;

use super::*;
use crate::{group_key, Collector, Constraint};

const SHIFT: usize = 0;
const ROOM: usize = 1;
const EMPLOYEE: usize = 1;
const HOURS: usize = 2;
const OPEN: usize = 1;

fn descriptor() -> SolutionDescriptor {
    SolutionDescriptor::new("Roster")
        .with_entity_class(
            EntityClassDef::new("Shift")
                .with_field(FieldDef::planning_id("id"))
                .with_field(FieldDef::planning_variable("employee", "employees"))
                .with_field(FieldDef::new("hours")),
        )
        .with_entity_class(
            EntityClassDef::new("Room")
                .with_field(FieldDef::planning_id("id"))
                .with_field(FieldDef::planning_variable("open", "flags")),
        )
        .with_value_range("employees", ValueRangeDef::IntRange { start: 0, end: 3 })
        .with_value_range("flags", ValueRangeDef::Bool)
}

fn roster(shifts: &[Option<i64>], rooms: &[bool]) -> Solution {
    let mut solution = Solution::new(descriptor());
    for (id, employee) in shifts.iter().enumerate() {
        let employee = employee.map_or(Value::None, Value::Int);
        solution.add_entity(
            SHIFT,
            Entity::new(vec![Value::Int(id as i64), employee, Value::Int(id as i64 % 3 + 1)]),
        );
    }
    for (id, open) in rooms.iter().enumerate() {
        solution.add_entity(ROOM, Entity::new(vec![Value::Int(id as i64), Value::Bool(*open)]));
    }
    solution
}

fn constraints() -> ConstraintSet {
    ConstraintSet::new()
        .with(
            Constraint::for_each("Shift")
                .filter(|s| s.get(EMPLOYEE).is_none())
                .penalize("Unassigned", HardSoftScore::ONE_HARD),
        )
        .with(
            Constraint::for_each("Shift")
                .filter(|s| !s.get(EMPLOYEE).is_none())
                .group_by(|s| group_key![s.get(EMPLOYEE).clone()], Collector::count())
                .having(|g| g.count > 1)
                .penalize_with("Overlap", HardSoftScore::ONE_HARD, |g| g.count * (g.count - 1) / 2),
        )
        .with(
            Constraint::for_each("Shift")
                .filter(|s| !s.get(EMPLOYEE).is_none())
                .group_by(
                    |s| group_key![s.get(EMPLOYEE).clone()],
                    Collector::sum(|s| s.get(HOURS).as_int().unwrap_or(0)),
                )
                .penalize_with("Long day", HardSoftScore::ONE_SOFT, |g| g.value * g.value),
        )
        .with(
            Constraint::for_each("Room")
                .filter(|r| r.get(OPEN).as_bool() == Some(true))
                .penalize("Open room", HardSoftScore::of_soft(5)),
        )
}

fn director(shifts: &[Option<i64>], rooms: &[bool]) -> ScoreDirector {
    ScoreDirector::new(roster(shifts, rooms), constraints()).unwrap()
}

#[test]
fn test_initial_score_matches_full() {
    let d = director(&[Some(0), Some(0), None], &[true, false]);
    // hours 1 and 2 on employee 0: (1+2)^2 = 9, plus one open room
    assert_eq!(d.score(), HardSoftScore::of(-2, -14));
    assert_eq!(d.score(), d.full_score());
    assert!(d.assert_consistency().is_ok());
    assert_eq!(d.constraint_count(), 4);
}

#[test]
fn test_score_changes_does_not_mutate() {
    let d = director(&[Some(0), Some(1), Some(2)], &[false]);
    let before = d.score();
    let change = VariableChange::new(SHIFT, 2, EMPLOYEE, Value::Int(0));
    let predicted = d.score_changes(&[change]);
    assert_ne!(predicted, before);
    assert_eq!(d.score(), before);
    assert_eq!(d.working_solution().value(SHIFT, 2, EMPLOYEE), &Value::Int(2));
}

#[test]
fn test_apply_changes_matches_prediction() {
    let mut d = director(&[Some(0), Some(1), Some(2)], &[false, true]);
    let changes = [
        VariableChange::new(SHIFT, 0, EMPLOYEE, Value::Int(1)),
        VariableChange::new(SHIFT, 1, EMPLOYEE, Value::Int(0)),
        VariableChange::new(ROOM, 1, OPEN, Value::Bool(false)),
    ];
    let predicted = d.score_changes(&changes);
    let applied = d.apply_changes(&changes);
    assert_eq!(predicted, applied);
    assert_eq!(applied, d.full_score());
}

#[test]
fn test_repeated_field_in_one_batch_uses_last_value() {
    let mut d = director(&[Some(0), Some(1)], &[]);
    let changes = [
        VariableChange::new(SHIFT, 1, EMPLOYEE, Value::Int(0)),
        VariableChange::new(SHIFT, 1, EMPLOYEE, Value::Int(2)),
    ];
    let predicted = d.score_changes(&changes);
    assert_eq!(d.apply_changes(&changes), predicted);
    assert_eq!(d.working_solution().value(SHIFT, 1, EMPLOYEE), &Value::Int(2));
}

#[test]
fn test_unknown_entity_is_ignored() {
    let mut d = director(&[Some(0)], &[]);
    let before = d.score();
    let change = [VariableChange::new(SHIFT, 9, EMPLOYEE, Value::Int(1))];
    assert_eq!(d.score_changes(&change), before);
    assert_eq!(d.apply_changes(&change), before);
}

#[test]
fn test_clone_and_into_working_solution_carry_score() {
    let d = director(&[None], &[]);
    assert_eq!(d.clone_working_solution().score(), Some(HardSoftScore::of_hard(-1)));
    assert_eq!(d.into_working_solution().score(), Some(HardSoftScore::of_hard(-1)));
}

#[test]
fn test_calculation_count_increments() {
    let mut d = director(&[Some(0)], &[]);
    let start = d.calculation_count();
    d.calculate_score();
    d.score_changes(&[VariableChange::new(SHIFT, 0, EMPLOYEE, Value::Int(1))]);
    assert_eq!(d.calculation_count(), start + 2);
}

#[test]
fn test_analyze() {
    let d = director(&[Some(0), Some(0)], &[true]);
    let analysis = d.analyze();
    assert_eq!(analysis.score, d.score());
    assert_eq!(analysis.get("Overlap").map(|c| c.match_count), Some(1));
    assert_eq!(analysis.get("Open room").map(|c| c.score), Some(HardSoftScore::of_soft(-5)));
    assert_eq!(analysis.broken_hard_constraints().count(), 1);
}

#[test]
fn test_unknown_entity_class_rejected() {
    let set = ConstraintSet::new().with(
        Constraint::for_each("Nurse").penalize("Anything", HardSoftScore::ONE_SOFT),
    );
    let err = ScoreDirector::new(roster(&[], &[]), set).unwrap_err();
    assert_eq!(err, ConfigurationError::UnknownClass("Nurse".to_string()));
}

#[test]
fn test_duplicate_constraint_rejected() {
    let set = constraints().with(
        Constraint::for_each("Room").penalize("Open room", HardSoftScore::ONE_SOFT),
    );
    let err = ScoreDirector::new(roster(&[], &[]), set).unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidConfig(_)));
}

#[test]
fn test_score_corruption_message() {
    let corruption = ScoreCorruption {
        incremental: HardSoftScore::of(0, 1),
        full: HardSoftScore::of(0, 2),
        constraints: vec!["Overlap".to_string()],
    };
    let message = corruption.to_string();
    assert!(message.contains("0hard/1soft"));
    assert!(message.contains("Overlap"));
}

fn employee() -> impl Strategy<Value = Option<i64>> {
    prop::option::of(0i64..3)
}

proptest! {
    #[test]
    fn prop_incremental_matches_full(
        shifts in prop::collection::vec(employee(), 1..8),
        rooms in prop::collection::vec(any::<bool>(), 0..4),
        steps in prop::collection::vec((any::<prop::sample::Index>(), employee()), 1..20),
    ) {
        let mut d = director(&shifts, &rooms);
        for (index, value) in steps {
            let entity = index.index(shifts.len());
            let change = [VariableChange::new(
                SHIFT,
                entity,
                EMPLOYEE,
                value.map_or(Value::None, Value::Int),
            )];
            let predicted = d.score_changes(&change);
            let applied = d.apply_changes(&change);
            prop_assert_eq!(predicted, applied);
            prop_assert_eq!(applied, d.full_score());
        }
        prop_assert!(d.assert_consistency().is_ok());
    }

    #[test]
    fn prop_undo_restores_score(
        shifts in prop::collection::vec(employee(), 2..8),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let mut d = director(&shifts, &[]);
        let before = d.score();
        let (a, b) = (a.index(shifts.len()), b.index(shifts.len()));
        let va = d.working_solution().value(SHIFT, a, EMPLOYEE).clone();
        let vb = d.working_solution().value(SHIFT, b, EMPLOYEE).clone();

        d.apply_changes(&[
            VariableChange::new(SHIFT, a, EMPLOYEE, vb.clone()),
            VariableChange::new(SHIFT, b, EMPLOYEE, va.clone()),
        ]);
        let undone = d.apply_changes(&[
            VariableChange::new(SHIFT, a, EMPLOYEE, va),
            VariableChange::new(SHIFT, b, EMPLOYEE, vb),
        ]);
        prop_assert_eq!(undone, before);
    }
}
