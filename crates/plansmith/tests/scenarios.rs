//! End-to-end solving scenarios on the knapsack and device schedule models.

use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use plansmith::prelude::*;
use plansmith::{
    solve, solve_with_config, ScoreDirector, SolverState, ValueRangeRegistry,
    DEFAULT_TIME_LIMIT_SECS,
};
use plansmith_test::{device_schedule, knapsack};

#[test]
fn knapsack_reaches_optimum_within_capacity() {
    let result = solve(knapsack::generate_problem(), knapsack::constraints()).unwrap();

    let (weight, value) = knapsack::totals(&result.solution);
    assert!(weight <= knapsack::MAX_WEIGHT);
    assert_eq!(value, 19);
    assert_eq!(result.score, HardSoftScore::of_soft(19));
    assert_eq!(result.solution.score(), Some(result.score));
    assert!(result.is_feasible());
}

#[test]
fn schedule_best_solution_respects_skills() {
    let config = SolverConfig::new()
        .with_random_seed(11)
        .with_step_count_limit(500);
    let result = solve_with_config(
        device_schedule::generate_problem(),
        device_schedule::constraints(),
        config,
    )
    .unwrap();

    assert!(result.is_feasible(), "score {}", result.score);
    let solution = &result.solution;
    for device in 0..solution.entities(device_schedule::DEVICE).len() {
        let view = solution.view(device_schedule::DEVICE, device).unwrap();
        assert!(device_schedule::has_required_skill(&view));
        assert!(device_schedule::workstation_supports_type(&view));
    }
}

#[test]
fn default_solve_returns_on_schedule() {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(solve_with_config(
            device_schedule::generate_problem(),
            device_schedule::constraints(),
            SolverConfig::new().with_random_seed(1),
        ));
    });

    let result = rx
        .recv_timeout(Duration::from_secs(DEFAULT_TIME_LIMIT_SECS * 3))
        .expect("default solve returns")
        .unwrap();
    assert_eq!(result.state, SolverState::Terminated);
    assert_eq!(result.solution.score(), Some(result.score));
}

#[test]
fn zero_step_budget_returns_seeded_solution() {
    let mut problem = knapsack::generate_problem();
    knapsack::select(&mut problem, &[0, 4]);
    let expected = ScoreDirector::new(problem.clone(), knapsack::constraints())
        .unwrap()
        .full_score();

    let config = SolverConfig::new().with_step_count_limit(0);
    let result = solve_with_config(problem.clone(), knapsack::constraints(), config).unwrap();

    assert!(result.solution.same_assignment(&problem));
    assert_eq!(result.score, expected);
    // items 0 and 4 weigh 9, worth 17
    assert_eq!(expected, HardSoftScore::of_soft(17));
    assert_eq!(result.statistics.total_step_count, 0);
}

#[test]
fn best_score_never_decreases() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut solver = Solver::new(
        SolverConfig::new()
            .with_random_seed(3)
            .with_step_count_limit(300),
        device_schedule::constraints(),
    )
    .on_best_solution(move |_, score| sink.lock().unwrap().push(score));

    let result = solver.solve(device_schedule::generate_problem()).unwrap();

    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(seen.last(), Some(&result.score));
}

#[test]
fn solved_values_stay_in_range() {
    let problem = device_schedule::generate_problem();
    let registry = ValueRangeRegistry::new(&problem).unwrap();

    let config = SolverConfig::new()
        .with_random_seed(8)
        .with_step_count_limit(100);
    let result = solve_with_config(problem, device_schedule::constraints(), config).unwrap();

    assert!(registry.check_assignments(&result.solution).is_ok());
}

#[test]
fn hard_level_dominates_soft() {
    assert!(HardSoftScore::of(0, 5) > HardSoftScore::of(-1, 1000));
    assert!(HardSoftScore::of(-1, 1000) < HardSoftScore::ZERO);
}

#[test]
fn invalid_problem_is_rejected_before_search() {
    let mut problem = knapsack::generate_problem();
    problem.set_value(
        knapsack::KNAPSACK_ITEM,
        0,
        knapsack::IN_KNAPSACK,
        Value::Int(1),
    );

    let err = solve(problem, knapsack::constraints()).unwrap_err();
    assert!(matches!(err, ConfigurationError::ValueOutOfRange { .. }));
}
