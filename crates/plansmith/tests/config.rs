//! Solving driven by TOML and YAML configuration.

use plansmith::prelude::*;
use plansmith::{solve_with_config, EnvironmentMode};
use plansmith_test::{device_schedule, knapsack};

const HILL_CLIMBING_TOML: &str = r#"
environment_mode = "full_assert"
random_seed = 42

[termination]
step_count_limit = 1000

[[phases]]
type = "construction_heuristic"
construction_heuristic_type = "best_fit"

[[phases]]
type = "local_search"
[phases.acceptor]
type = "hill_climbing"
[phases.forager]
forager_type = "best_score"
[phases.move_selector]
type = "union_move_selector"
"#;

const LATE_ACCEPTANCE_YAML: &str = r#"
environment_mode: reproducible
random_seed: 7
termination:
  step_count_limit: 300
  best_score_limit: "0hard/19soft"
phases:
  - type: local_search
    selection_order: random
    acceptor:
      type: late_acceptance
      late_acceptance_size: 20
    forager:
      forager_type: accepted_count
      accepted_count_limit: 4
    move_selector:
      type: union_move_selector
"#;

#[test]
fn toml_hill_climbing_solves_knapsack() {
    let config = SolverConfig::from_toml_str(HILL_CLIMBING_TOML).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
    assert_eq!(config.phases.len(), 2);

    let result = solve_with_config(knapsack::generate_problem(), knapsack::constraints(), config)
        .unwrap();

    assert_eq!(result.score, HardSoftScore::of_soft(19));
    assert_eq!(result.statistics.phase_count(), 2);
}

#[test]
fn yaml_late_acceptance_stays_feasible() {
    let config = SolverConfig::from_yaml_str(LATE_ACCEPTANCE_YAML).unwrap();

    let result = solve_with_config(knapsack::generate_problem(), knapsack::constraints(), config)
        .unwrap();

    let (weight, _) = knapsack::totals(&result.solution);
    assert!(weight <= knapsack::MAX_WEIGHT);
    assert!(result.is_feasible());
    assert!(result.statistics.total_step_count <= 300);
}

#[test]
fn same_config_same_schedule() {
    let toml = r#"
random_seed = 99

[termination]
step_count_limit = 150
"#;
    let run = || {
        let config = SolverConfig::from_toml_str(toml).unwrap();
        solve_with_config(
            device_schedule::generate_problem(),
            device_schedule::constraints(),
            config,
        )
        .unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first.score, second.score);
    assert!(first.solution.same_assignment(&second.solution));
}

#[test]
fn invalid_config_is_a_configuration_error() {
    let toml = r#"
[[phases]]
type = "local_search"
[phases.acceptor]
type = "late_acceptance"
late_acceptance_size = 0
"#;
    let config = SolverConfig::from_toml_str(toml).unwrap();

    let err = solve_with_config(knapsack::generate_problem(), knapsack::constraints(), config)
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidConfig(_)));
}

#[test]
fn unparsable_best_score_limit_is_rejected() {
    let toml = r#"
[termination]
best_score_limit = "lots"
"#;
    let config = SolverConfig::from_toml_str(toml).unwrap();

    let err = solve_with_config(knapsack::generate_problem(), knapsack::constraints(), config)
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidConfig(_)));
}
