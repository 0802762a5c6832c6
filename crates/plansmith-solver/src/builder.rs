//! Builder module for constructing solver components from configuration
//!
//! This module provides the wiring between configuration types and
//! the actual solver implementation. Class and variable names are
//! resolved against the solution descriptor here, so a bad name fails
//! before any step is taken.

use std::sync::Arc;

use plansmith_config::{
    AcceptorConfig, ConstructionHeuristicType, ForagerConfig, ForagerType, MoveSelectorConfig,
    PhaseConfig, TerminationConfig,
};
use plansmith_core::{ConfigurationError, SolutionDescriptor};
use rayon::ThreadPool;

use crate::heuristic::{ChangeMoveSelector, MoveSelector, SwapMoveSelector, UnionMoveSelector};
use crate::phase::localsearch::{
    AcceptedCountForager, Acceptor, BestScoreForager, FirstAcceptedForager, HillClimbingAcceptor,
    LateAcceptanceAcceptor, LocalSearchForager, LocalSearchPhase, SimulatedAnnealingAcceptor,
};
use crate::phase::{ConstructionHeuristicPhase, Phase};
use crate::termination::{
    BestScoreTermination, OrTermination, StepCountTermination, TerminationLevel, TimeTermination,
    UnimprovedStepCountTermination,
};

type BuildResult<T> = Result<T, ConfigurationError>;

pub const DEFAULT_LATE_ACCEPTANCE_SIZE: usize = 400;
pub const DEFAULT_DECAY_RATE: f64 = 0.99;
/// Time limit applied when neither the solver nor a local search phase
/// configures a termination.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 30;
/// Unimproved step limit applied together with [`DEFAULT_TIME_LIMIT_SECS`].
pub const DEFAULT_UNIMPROVED_STEP_COUNT_LIMIT: u64 = 500;

/// Builder for constructing acceptors from configuration.
pub struct AcceptorBuilder;

impl AcceptorBuilder {
    /// Builds an acceptor; `seed` feeds the acceptors that draw random numbers.
    pub fn build(config: &AcceptorConfig, seed: u64) -> BuildResult<Box<dyn Acceptor>> {
        Ok(match config {
            AcceptorConfig::HillClimbing => Box::new(HillClimbingAcceptor::new()),

            AcceptorConfig::SimulatedAnnealing(sa_config) => {
                let starting_temperature = sa_config.starting_temperature()?;
                let decay_rate = sa_config.decay_rate.unwrap_or(DEFAULT_DECAY_RATE);
                Box::new(SimulatedAnnealingAcceptor::new(
                    starting_temperature,
                    decay_rate,
                    seed,
                ))
            }

            AcceptorConfig::LateAcceptance(la_config) => {
                let size = la_config
                    .late_acceptance_size
                    .unwrap_or(DEFAULT_LATE_ACCEPTANCE_SIZE);
                Box::new(LateAcceptanceAcceptor::new(size))
            }
        })
    }
}

/// Builder for constructing foragers from configuration.
pub struct ForagerBuilder;

impl ForagerBuilder {
    /// Builds a forager; `None` gives the best score forager.
    pub fn build(config: Option<&ForagerConfig>) -> Box<dyn LocalSearchForager> {
        let Some(config) = config else {
            return Box::new(BestScoreForager::new());
        };
        match config.forager_type {
            ForagerType::FirstAccepted => Box::new(FirstAcceptedForager::new()),
            ForagerType::AcceptedCount => Box::new(AcceptedCountForager::new(
                config.accepted_count_limit.unwrap_or(1),
            )),
            ForagerType::BestScore => Box::new(BestScoreForager::new()),
        }
    }
}

/// Builder for constructing move selectors from configuration.
pub struct MoveSelectorBuilder;

impl MoveSelectorBuilder {
    /// Builds a selector; `None` gives the union of change and swap moves.
    pub fn build(
        config: Option<&MoveSelectorConfig>,
        descriptor: &SolutionDescriptor,
    ) -> BuildResult<Box<dyn MoveSelector>> {
        let Some(config) = config else {
            return Ok(Box::new(UnionMoveSelector::default()));
        };
        Ok(match config {
            MoveSelectorConfig::ChangeMoveSelector(c) => {
                match Self::resolve(descriptor, c.entity_class.as_deref(), c.variable_name.as_deref())? {
                    (None, _) => Box::new(ChangeMoveSelector::new()),
                    (Some(class), None) => Box::new(ChangeMoveSelector::for_class(class)),
                    (Some(class), Some(field)) => {
                        Box::new(ChangeMoveSelector::for_variable(class, field))
                    }
                }
            }
            MoveSelectorConfig::SwapMoveSelector(c) => {
                match Self::resolve(descriptor, c.entity_class.as_deref(), c.variable_name.as_deref())? {
                    (None, _) => Box::new(SwapMoveSelector::new()),
                    (Some(class), None) => Box::new(SwapMoveSelector::for_class(class)),
                    (Some(class), Some(field)) => Box::new(SwapMoveSelector::for_variable(class, field)),
                }
            }
            MoveSelectorConfig::UnionMoveSelector(u) if u.selectors.is_empty() => {
                Box::new(UnionMoveSelector::default())
            }
            MoveSelectorConfig::UnionMoveSelector(u) => Box::new(UnionMoveSelector::new(
                u.selectors
                    .iter()
                    .map(|c| Self::build(Some(c), descriptor))
                    .collect::<BuildResult<Vec<_>>>()?,
            )),
        })
    }

    /// Resolves optional class and variable names to indices.
    ///
    /// A variable name without a class is looked up in the only entity
    /// class.
    fn resolve(
        descriptor: &SolutionDescriptor,
        entity_class: Option<&str>,
        variable_name: Option<&str>,
    ) -> BuildResult<(Option<usize>, Option<usize>)> {
        let class = match (entity_class, variable_name) {
            (Some(name), _) => Some(descriptor.require_entity_class(name)?),
            (None, None) => None,
            (None, Some(_)) if descriptor.entity_classes.len() == 1 => Some(0),
            (None, Some(variable)) => {
                return Err(ConfigurationError::InvalidConfig(format!(
                    "variable_name {:?} needs an entity_class when there are several entity classes",
                    variable
                )))
            }
        };
        let field = match (class, variable_name) {
            (Some(class), Some(variable)) => {
                let field = descriptor.require_entity_field(class, variable)?;
                if !descriptor.entity_classes[class].fields[field].is_planning_variable() {
                    return Err(ConfigurationError::InvalidConfig(format!(
                        "{}.{} is not a planning variable",
                        descriptor.entity_classes[class].name, variable
                    )));
                }
                Some(field)
            }
            _ => None,
        };
        Ok((class, field))
    }
}

/// Builder for constructing terminations from configuration.
pub struct TerminationBuilder;

impl TerminationBuilder {
    /// Builds one condition per configured limit; counters read from `level`.
    pub fn build(config: &TerminationConfig, level: TerminationLevel) -> BuildResult<OrTermination> {
        let phase = level == TerminationLevel::Phase;
        let mut termination = OrTermination::default();

        if let Some(limit) = config.time_limit() {
            termination.push(Box::new(if phase {
                TimeTermination::for_phase(limit)
            } else {
                TimeTermination::new(limit)
            }));
        }
        if let Some(steps) = config.step_count_limit {
            termination.push(Box::new(if phase {
                StepCountTermination::for_phase(steps)
            } else {
                StepCountTermination::new(steps)
            }));
        }
        if let Some(steps) = config.unimproved_step_count_limit {
            termination.push(Box::new(if phase {
                UnimprovedStepCountTermination::for_phase(steps)
            } else {
                UnimprovedStepCountTermination::new(steps)
            }));
        }
        if let Some(target) = config.best_score_limit()? {
            termination.push(Box::new(BestScoreTermination::new(target)));
        }
        Ok(termination)
    }

    /// Solver-level limits for a run configured without any.
    pub fn default_termination() -> OrTermination {
        OrTermination::default()
            .with(TimeTermination::seconds(DEFAULT_TIME_LIMIT_SECS))
            .with(UnimprovedStepCountTermination::new(
                DEFAULT_UNIMPROVED_STEP_COUNT_LIMIT,
            ))
    }
}

/// Builder for constructing phases from configuration.
pub struct PhaseBuilder;

impl PhaseBuilder {
    /// Builds one phase.
    ///
    /// `thread_pool` is handed to local search phases for parallel scoring.
    pub fn build(
        config: &PhaseConfig,
        descriptor: &SolutionDescriptor,
        seed: u64,
        thread_pool: Option<Arc<ThreadPool>>,
    ) -> BuildResult<Box<dyn Phase>> {
        let termination = match config.termination() {
            Some(t) => TerminationBuilder::build(t, TerminationLevel::Phase)?,
            None => OrTermination::default(),
        };

        Ok(match config {
            PhaseConfig::ConstructionHeuristic(c) => {
                let phase = match c.construction_heuristic_type {
                    ConstructionHeuristicType::FirstFit => ConstructionHeuristicPhase::first_fit(),
                    ConstructionHeuristicType::BestFit => ConstructionHeuristicPhase::best_fit(),
                };
                Box::new(phase.with_termination(termination))
            }
            PhaseConfig::LocalSearch(c) => {
                let acceptor = match &c.acceptor {
                    Some(acceptor) => AcceptorBuilder::build(acceptor, seed)?,
                    None => Box::new(HillClimbingAcceptor::new()),
                };
                let mut phase = LocalSearchPhase::new(
                    MoveSelectorBuilder::build(c.move_selector.as_ref(), descriptor)?,
                    acceptor,
                    ForagerBuilder::build(c.forager.as_ref()),
                )
                .with_selection_order(c.selection_order)
                .with_termination(termination);
                if let Some(pool) = thread_pool {
                    phase = phase.with_thread_pool(pool);
                }
                Box::new(phase)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plansmith_config::{
        ChangeMoveConfig, LateAcceptanceConfig, LocalSearchConfig, SimulatedAnnealingConfig,
        SwapMoveConfig, UnionMoveSelectorConfig,
    };
    use plansmith_test::{device_schedule, knapsack};

    #[test]
    fn test_acceptor_builder_defaults() {
        let config = AcceptorConfig::LateAcceptance(LateAcceptanceConfig::default());
        let acceptor = AcceptorBuilder::build(&config, 0).unwrap();
        assert!(format!("{:?}", acceptor).contains("late_acceptance_size: 400"));
    }

    #[test]
    fn test_acceptor_builder_simulated_annealing() {
        let config = AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig {
            starting_temperature: Some("2hard/10soft".to_string()),
            decay_rate: Some(0.9),
        });
        let acceptor = AcceptorBuilder::build(&config, 1).unwrap();
        assert!(!acceptor.is_deterministic());
    }

    #[test]
    fn test_acceptor_builder_rejects_bad_temperature() {
        let config = AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig {
            starting_temperature: Some("hot".to_string()),
            decay_rate: None,
        });
        assert!(matches!(
            AcceptorBuilder::build(&config, 1),
            Err(ConfigurationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_forager_builder_accepted_count() {
        let config = ForagerConfig {
            forager_type: ForagerType::AcceptedCount,
            accepted_count_limit: Some(4),
        };
        let forager = ForagerBuilder::build(Some(&config));
        assert!(format!("{:?}", forager).contains("accepted_count_limit: 4"));
        assert!(format!("{:?}", ForagerBuilder::build(None)).starts_with("BestScoreForager"));
    }

    #[test]
    fn test_move_selector_builder_resolves_names() {
        let descriptor = device_schedule::descriptor();
        let config = MoveSelectorConfig::ChangeMoveSelector(ChangeMoveConfig {
            entity_class: Some("Device".to_string()),
            variable_name: Some("technician".to_string()),
        });
        assert!(MoveSelectorBuilder::build(Some(&config), &descriptor).is_ok());
    }

    #[test]
    fn test_move_selector_builder_unknown_class() {
        let descriptor = device_schedule::descriptor();
        let config = MoveSelectorConfig::SwapMoveSelector(SwapMoveConfig {
            entity_class: Some("Lesson".to_string()),
            variable_name: None,
        });
        assert!(matches!(
            MoveSelectorBuilder::build(Some(&config), &descriptor),
            Err(ConfigurationError::UnknownClass(name)) if name == "Lesson"
        ));
    }

    #[test]
    fn test_move_selector_builder_rejects_plain_field() {
        let descriptor = device_schedule::descriptor();
        let config = MoveSelectorConfig::ChangeMoveSelector(ChangeMoveConfig {
            entity_class: None,
            variable_name: Some("name".to_string()),
        });
        assert!(matches!(
            MoveSelectorBuilder::build(Some(&config), &descriptor),
            Err(ConfigurationError::InvalidConfig(_))
        ));

        let config = MoveSelectorConfig::ChangeMoveSelector(ChangeMoveConfig {
            entity_class: None,
            variable_name: Some("room".to_string()),
        });
        assert!(matches!(
            MoveSelectorBuilder::build(Some(&config), &descriptor),
            Err(ConfigurationError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_move_selector_builder_nested_union() {
        let descriptor = knapsack::descriptor();
        let config = MoveSelectorConfig::UnionMoveSelector(UnionMoveSelectorConfig {
            selectors: vec![
                MoveSelectorConfig::ChangeMoveSelector(ChangeMoveConfig::default()),
                MoveSelectorConfig::SwapMoveSelector(SwapMoveConfig {
                    entity_class: Some("KnapsackItem".to_string()),
                    variable_name: Some("in_knapsack".to_string()),
                }),
            ],
        });
        assert!(MoveSelectorBuilder::build(Some(&config), &descriptor).is_ok());
    }

    #[test]
    fn test_termination_builder_one_condition_per_limit() {
        let config = TerminationConfig {
            seconds_spent_limit: Some(5),
            millis_spent_limit: Some(10),
            step_count_limit: Some(100),
            best_score_limit: Some("0hard/19soft".to_string()),
            ..TerminationConfig::default()
        };
        let termination = TerminationBuilder::build(&config, TerminationLevel::Solver).unwrap();
        assert_eq!(termination.len(), 3);
        assert!(TerminationBuilder::build(&TerminationConfig::default(), TerminationLevel::Phase)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_default_termination_is_bounded() {
        let termination = TerminationBuilder::default_termination();
        assert_eq!(termination.len(), 2);
    }

    #[test]
    fn test_phase_builder_builds_configured_phases() {
        let descriptor = knapsack::descriptor();
        let config = PhaseConfig::LocalSearch(LocalSearchConfig {
            termination: Some(TerminationConfig {
                step_count_limit: Some(3),
                ..TerminationConfig::default()
            }),
            ..LocalSearchConfig::default()
        });
        let phase = PhaseBuilder::build(&config, &descriptor, 0, None).unwrap();
        assert_eq!(phase.phase_type_name(), "LocalSearch");

        for config in plansmith_config::SolverConfig::default().effective_phases() {
            assert!(PhaseBuilder::build(&config, &descriptor, 0, None).is_ok());
        }
    }
}
