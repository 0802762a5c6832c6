use std::sync::atomic::{AtomicBool, AtomicI64};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use plansmith_config::{
    AcceptorConfig, EnvironmentMode, LateAcceptanceConfig, LocalSearchConfig, MoveThreadCount,
    PhaseConfig, SolverConfig,
};
use plansmith_core::{
    Entity, EntityClassDef, FieldDef, HardSoftScore, Solution, SolutionDescriptor, Value,
    ValueRangeDef,
};
use plansmith_scoring::{Constraint, ConstraintSet, ScoreDirector};
use plansmith_test::device_schedule;
use plansmith_test::knapsack::{self, KNAPSACK_ITEM};

use super::*;

fn seeded() -> SolverConfig {
    SolverConfig::new().with_random_seed(11)
}

#[test]
fn test_default_phases_solve_knapsack() {
    let mut solver = Solver::new(seeded(), knapsack::constraints());
    let result = solver.solve(knapsack::generate_problem()).unwrap();

    assert_eq!(result.score, HardSoftScore::of_soft(19));
    assert_eq!(result.solution.score(), Some(result.score));
    assert_eq!(result.state, SolverState::Terminated);
    assert!(result.is_feasible());
    assert!(!result.terminated_early);
    assert_eq!(result.statistics.phase_count(), 2);
}

#[test]
fn test_default_config_stops_on_plateaus() {
    // hill climbing keeps taking sideways moves on the schedule, so only
    // the default limits end the run
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut solver = Solver::new(seeded(), device_schedule::constraints());
        let _ = tx.send(solver.solve(device_schedule::generate_problem()));
    });

    let result = rx
        .recv_timeout(Duration::from_secs(DEFAULT_TIME_LIMIT_SECS * 3))
        .expect("solve with the default config returns")
        .unwrap();
    assert_eq!(result.state, SolverState::Terminated);
    assert!(!result.terminated_early);
    assert!(result.statistics.total_step_count > 0);
}

#[test]
fn test_configured_termination_replaces_defaults() {
    let config = seeded().with_step_count_limit(40);
    let mut solver = Solver::new(config, device_schedule::constraints());
    let result = solver.solve(device_schedule::generate_problem()).unwrap();
    assert!(result.statistics.total_step_count <= 40);
}

#[test]
fn test_zero_step_budget_returns_initial_solution() {
    let problem = knapsack::generate_problem();
    let full = ScoreDirector::new(problem.clone(), knapsack::constraints())
        .unwrap()
        .full_score();
    let mut solver = Solver::new(seeded().with_step_count_limit(0), knapsack::constraints());

    let result = solver.solve(problem.clone()).unwrap();

    assert!(result.solution.same_assignment(&problem));
    assert_eq!(result.score, full);
    assert_eq!(result.statistics.total_step_count, 0);
    assert_eq!(result.statistics.phase_count(), 0);
}

#[test]
fn test_cancel_flag_raised_before_solve() {
    let flag = Arc::new(AtomicBool::new(true));
    let mut solver =
        Solver::new(seeded(), knapsack::constraints()).with_terminate_flag(flag.clone());

    let result = solver.solve(knapsack::generate_problem()).unwrap();

    assert!(result.terminated_early);
    assert_eq!(result.score, HardSoftScore::ZERO);
    assert_eq!(result.statistics.total_step_count, 0);
}

#[test]
fn test_best_solution_callback_sees_improvements_only() {
    let scores = Arc::new(Mutex::new(Vec::new()));
    let sink = scores.clone();
    let mut solver = Solver::new(seeded(), knapsack::constraints())
        .on_best_solution(move |_, score| sink.lock().unwrap().push(score));

    let result = solver.solve(knapsack::generate_problem()).unwrap();

    let scores = scores.lock().unwrap();
    assert!(!scores.is_empty());
    assert!(scores.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(scores.last(), Some(&result.score));
}

#[test]
fn test_callback_survives_between_runs() {
    let calls = Arc::new(Mutex::new(0));
    let sink = calls.clone();
    let mut solver = Solver::new(seeded(), knapsack::constraints())
        .on_best_solution(move |_, _| *sink.lock().unwrap() += 1);

    solver.solve(knapsack::generate_problem()).unwrap();
    let first = *calls.lock().unwrap();
    solver.solve(knapsack::generate_problem()).unwrap();

    assert_eq!(*calls.lock().unwrap(), first * 2);
}

#[test]
fn test_full_assert_mode_solves() {
    let config = seeded().with_environment_mode(EnvironmentMode::FullAssert);
    let result = Solver::new(config, knapsack::constraints())
        .solve(knapsack::generate_problem())
        .unwrap();
    assert_eq!(result.score, HardSoftScore::of_soft(19));
    assert!(result.score_corruption.is_none());
}

/// Knapsack constraints plus one whose measure changes on every call, so
/// the incremental score drifts after the first step.
fn drifting_constraints() -> ConstraintSet {
    let calls = AtomicI64::new(0);
    knapsack::constraints().with(Constraint::for_each("KnapsackItem").penalize_with(
        "Drift",
        HardSoftScore::ONE_SOFT,
        move |_| calls.fetch_add(1, std::sync::atomic::Ordering::Relaxed),
    ))
}

#[test]
fn test_full_assert_stops_on_score_corruption() {
    let config = seeded()
        .with_environment_mode(EnvironmentMode::FullAssert)
        .with_step_count_limit(100);
    let mut problem = knapsack::generate_problem();
    for item in 0..problem.entities(KNAPSACK_ITEM).len() {
        problem.set_value(KNAPSACK_ITEM, item, knapsack::IN_KNAPSACK, Value::None);
    }
    let result = Solver::new(config, drifting_constraints())
        .solve(problem)
        .unwrap();

    let corruption = result.score_corruption.expect("corruption is reported");
    assert_ne!(corruption.incremental, corruption.full);
    assert!(corruption.constraints.iter().any(|c| c.ends_with("Drift")));
    assert_eq!(result.statistics.total_step_count, 1);
    assert_eq!(result.statistics.phase_count(), 1);
}

#[test]
fn test_corruption_unchecked_outside_full_assert() {
    let config = seeded().with_step_count_limit(5);
    let result = Solver::new(config, drifting_constraints())
        .solve(knapsack::generate_problem())
        .unwrap();

    assert!(result.score_corruption.is_none());
    assert!(result.statistics.total_step_count <= 5);
}

#[test]
fn test_move_threads_do_not_change_result() {
    let late_acceptance = PhaseConfig::LocalSearch(LocalSearchConfig {
        acceptor: Some(AcceptorConfig::LateAcceptance(LateAcceptanceConfig {
            late_acceptance_size: Some(3),
        })),
        ..LocalSearchConfig::default()
    });
    let run = |threads| {
        let config = seeded()
            .with_phase(late_acceptance.clone())
            .with_step_count_limit(40)
            .with_move_thread_count(threads);
        Solver::new(config, knapsack::constraints())
            .solve(knapsack::generate_problem())
            .unwrap()
    };

    let serial = run(MoveThreadCount::None);
    let parallel = run(MoveThreadCount::Count(3));
    assert_eq!(serial.score, parallel.score);
    assert!(serial.solution.same_assignment(&parallel.solution));
    assert_eq!(
        serial.statistics.total_step_count,
        parallel.statistics.total_step_count
    );
}

#[test]
fn test_terminate_early_needs_running_solve() {
    let solver = Solver::new(seeded(), knapsack::constraints());
    assert!(!solver.terminate_early());
    assert!(!solver.is_solving());
    assert_eq!(solver.state(), SolverState::Initializing);
}

#[test]
fn test_infeasible_result_is_not_an_error() {
    // everything packed: 14 weight against a cap of 10
    let mut problem = knapsack::generate_problem();
    knapsack::select(&mut problem, &[0, 1, 2, 3, 4]);
    let config = seeded().with_step_count_limit(0);

    let result = Solver::new(config, knapsack::constraints())
        .solve(problem)
        .unwrap();

    assert_eq!(result.score.hard(), -4);
    assert!(!result.is_feasible());
}

#[test]
fn test_feasibility_threshold_is_configurable() {
    let mut problem = knapsack::generate_problem();
    knapsack::select(&mut problem, &[0, 1, 2, 3, 4]);
    let mut config = seeded().with_step_count_limit(0);
    config.feasibility_threshold = -5;

    let result = Solver::new(config, knapsack::constraints())
        .solve(problem)
        .unwrap();

    assert!(result.is_feasible());
}

// Configuration errors

fn single_task(range: ValueRangeDef, seeded: Value) -> Solution {
    let descriptor = SolutionDescriptor::new("Tasks")
        .with_entity_class(
            EntityClassDef::new("Task")
                .with_field(FieldDef::planning_id("id"))
                .with_field(FieldDef::planning_variable("slot", "slots")),
        )
        .with_value_range("slots", range);
    let mut solution = Solution::new(descriptor);
    solution.add_entity(0, Entity::new(vec![Value::Int(1), seeded]));
    solution
}

#[test]
fn test_empty_value_range_fails_before_search() {
    let problem = single_task(ValueRangeDef::Explicit(Vec::new()), Value::None);
    let err = Solver::new(seeded(), ConstraintSet::new())
        .solve(problem)
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::EmptyValueRange { .. }));
}

#[test]
fn test_seeded_value_outside_range_fails() {
    let problem = single_task(ValueRangeDef::IntRange { start: 0, end: 3 }, Value::Int(7));
    let err = Solver::new(seeded(), ConstraintSet::new())
        .solve(problem)
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::ValueOutOfRange { .. }));
}

#[test]
fn test_duplicate_entity_id_fails() {
    let mut problem = knapsack::generate_problem();
    let item = problem.value(KNAPSACK_ITEM, 0, knapsack::ITEM_REF).clone();
    problem.add_entity(
        KNAPSACK_ITEM,
        Entity::new(vec![Value::Int(1), item, Value::Bool(false)]),
    );
    let err = Solver::new(seeded(), knapsack::constraints())
        .solve(problem)
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::DuplicateId { id: 1, .. }));
}

#[test]
fn test_constraint_on_unknown_class_fails() {
    let constraints = ConstraintSet::new().with(
        Constraint::for_each("Lesson").penalize("Room conflict", HardSoftScore::ONE_HARD),
    );
    let err = Solver::new(seeded(), constraints)
        .solve(knapsack::generate_problem())
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::UnknownClass(name) if name == "Lesson"));
}

#[test]
fn test_invalid_config_fails() {
    let config = seeded().with_phase(PhaseConfig::LocalSearch(LocalSearchConfig {
        acceptor: Some(AcceptorConfig::LateAcceptance(LateAcceptanceConfig {
            late_acceptance_size: Some(0),
        })),
        ..LocalSearchConfig::default()
    }));
    let err = Solver::new(config, knapsack::constraints())
        .solve(knapsack::generate_problem())
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidConfig(_)));
}

#[test]
fn test_seed_resolution() {
    let reproducible = Solver::new(
        SolverConfig::new().with_environment_mode(EnvironmentMode::Reproducible),
        ConstraintSet::new(),
    );
    assert_eq!(reproducible.seed(), DEFAULT_RANDOM_SEED);
    assert_eq!(Solver::new(seeded(), ConstraintSet::new()).seed(), 11);
}
