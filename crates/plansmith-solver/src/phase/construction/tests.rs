use plansmith_core::{FactRef, Solution, Value, ValueRangeRegistry};
use plansmith_scoring::{ConstraintSet, ScoreDirector};
use plansmith_test::device_schedule::{
    self, DEVICE, TECHNICIAN_VAR, TIMESLOT, TIMESLOT_VAR, WORKSTATION_VAR,
};
use plansmith_test::knapsack;

use super::*;
use crate::phase::run_phase;
use crate::scope::SolverScope;
use crate::termination::{OrTermination, StepCountTermination};

fn scope_for(problem: Solution, constraints: ConstraintSet) -> SolverScope {
    let registry = ValueRangeRegistry::new(&problem).unwrap();
    let director = ScoreDirector::new(problem, constraints).unwrap();
    SolverScope::new(director, registry, 0).with_full_assert(true)
}

fn unassigned(solution: &Solution) -> usize {
    solution
        .entities(DEVICE)
        .iter()
        .flat_map(|d| [TIMESLOT_VAR, TECHNICIAN_VAR, WORKSTATION_VAR].map(|f| d.get(f).clone()))
        .filter(Value::is_none)
        .count()
}

#[test]
fn test_best_fit_assigns_every_variable() {
    let mut scope = scope_for(device_schedule::generate_problem(), device_schedule::constraints());
    let initial = scope.current_score();
    let mut phase = ConstructionHeuristicPhase::best_fit();

    let stats = run_phase(&mut phase, 0, &mut scope, &OrTermination::default());

    assert_eq!(stats.step_count, 30);
    assert_eq!(unassigned(scope.working_solution()), 0);
    assert!(scope.current_score() > initial);
    assert!(scope.assert_score().is_ok());
}

#[test]
fn test_seeded_variables_left_untouched() {
    let mut problem = device_schedule::generate_problem();
    let seeded = Value::Fact(FactRef::new(TIMESLOT, 5));
    problem.set_value(DEVICE, 0, TIMESLOT_VAR, seeded.clone());
    let mut scope = scope_for(problem, device_schedule::constraints());
    let mut phase = ConstructionHeuristicPhase::best_fit();

    let stats = run_phase(&mut phase, 0, &mut scope, &OrTermination::default());

    assert_eq!(stats.step_count, 29);
    assert_eq!(scope.working_solution().value(DEVICE, 0, TIMESLOT_VAR), &seeded);
}

#[test]
fn test_nothing_to_construct_takes_no_step() {
    let mut scope = scope_for(knapsack::generate_problem(), knapsack::constraints());
    let mut phase = ConstructionHeuristicPhase::first_fit();

    let stats = run_phase(&mut phase, 0, &mut scope, &OrTermination::default());

    assert_eq!(stats.step_count, 0);
    assert_eq!(stats.moves_evaluated, 0);
}

#[test]
fn test_termination_checked_between_assignments() {
    let mut scope = scope_for(device_schedule::generate_problem(), device_schedule::constraints());
    let mut phase = ConstructionHeuristicPhase::best_fit();
    let termination = OrTermination::default().with(StepCountTermination::new(4));

    run_phase(&mut phase, 0, &mut scope, &termination);

    assert_eq!(scope.total_step_count(), 4);
    assert_eq!(unassigned(scope.working_solution()), 26);
}

#[test]
fn test_phase_termination_combines_with_solver_termination() {
    let mut scope = scope_for(device_schedule::generate_problem(), device_schedule::constraints());
    let mut phase = ConstructionHeuristicPhase::best_fit()
        .with_termination(OrTermination::default().with(StepCountTermination::for_phase(2)));

    run_phase(&mut phase, 0, &mut scope, &OrTermination::default());

    assert_eq!(scope.total_step_count(), 2);
}

#[test]
fn test_first_fit_takes_first_improving_value() {
    let mut scope = scope_for(device_schedule::generate_problem(), device_schedule::constraints());
    let mut phase = ConstructionHeuristicPhase::first_fit();
    let termination = OrTermination::default().with(StepCountTermination::new(1));

    run_phase(&mut phase, 0, &mut scope, &termination);

    // the first timeslot already removes an unassigned penalty
    assert_eq!(
        scope.working_solution().value(DEVICE, 0, TIMESLOT_VAR),
        &Value::Fact(FactRef::new(TIMESLOT, 0))
    );
    assert_eq!(scope.statistics().moves_evaluated(), 1);
}

#[test]
fn test_best_improves_during_construction() {
    let mut scope = scope_for(device_schedule::generate_problem(), device_schedule::constraints());
    let mut phase = ConstructionHeuristicPhase::best_fit();

    run_phase(&mut phase, 0, &mut scope, &OrTermination::default());

    assert!(scope.best_score() >= scope.current_score());
    assert!(scope.statistics().improvement_count() > 0);
}
