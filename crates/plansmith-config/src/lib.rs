//! Configuration system for Plansmith.
//!
//! Load solver configuration from TOML or YAML to control termination,
//! phases, acceptors and move selection without code changes.
//!
//! # Examples
//!
//! ```
//! use plansmith_config::SolverConfig;
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!     unimproved_step_count_limit = 500
//!
//!     [[phases]]
//!     type = "construction_heuristic"
//!     construction_heuristic_type = "best_fit"
//!
//!     [[phases]]
//!     type = "local_search"
//!     [phases.acceptor]
//!     type = "late_acceptance"
//!     late_acceptance_size = 400
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.phases.len(), 2);
//! ```
//!
//! Fall back to defaults when the file is missing:
//!
//! ```
//! use plansmith_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml").unwrap_or_default();
//! assert!(config.phases.is_empty());
//! ```

use std::path::Path;
use std::time::Duration;

use plansmith_core::{ConfigurationError, HardSoftScore, ParseableScore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for ConfigurationError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(msg) => ConfigurationError::InvalidConfig(msg),
            other => ConfigurationError::InvalidConfig(other.to_string()),
        }
    }
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Reproducibility and assertion level.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Seed for every random choice; `None` seeds from the OS.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Threads used to score candidate moves.
    #[serde(default)]
    pub move_thread_count: MoveThreadCount,

    /// Minimum hard score of a feasible solution.
    #[serde(default)]
    pub feasibility_threshold: i64,

    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Phases run in order. Empty means construction then local search.
    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    pub fn with_step_count_limit(mut self, steps: u64) -> Self {
        self.termination = Some(TerminationConfig {
            step_count_limit: Some(steps),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    pub fn with_unimproved_step_count_limit(mut self, steps: u64) -> Self {
        self.termination = Some(TerminationConfig {
            unimproved_step_count_limit: Some(steps),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_move_thread_count(mut self, count: MoveThreadCount) -> Self {
        self.move_thread_count = count;
        self
    }

    pub fn with_phase(mut self, phase: PhaseConfig) -> Self {
        self.phases.push(phase);
        self
    }

    /// Returns the wall-clock limit, if configured.
    ///
    /// ```
    /// use plansmith_config::SolverConfig;
    /// use std::time::Duration;
    ///
    /// let config = SolverConfig::new().with_termination_seconds(30);
    /// assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
    /// ```
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Returns the configured phases, or the default pair when none are set.
    pub fn effective_phases(&self) -> Vec<PhaseConfig> {
        if self.phases.is_empty() {
            vec![
                PhaseConfig::ConstructionHeuristic(ConstructionHeuristicConfig {
                    construction_heuristic_type: ConstructionHeuristicType::BestFit,
                    termination: None,
                }),
                PhaseConfig::LocalSearch(LocalSearchConfig::default()),
            ]
        } else {
            self.phases.clone()
        }
    }

    /// Checks values that deserialize fine but cannot drive a solve.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(termination) = &self.termination {
            termination.validate()?;
        }
        if let MoveThreadCount::Count(0) = self.move_thread_count {
            return Err(ConfigError::Invalid("move_thread_count must be positive".into()));
        }
        for phase in &self.phases {
            phase.validate()?;
        }
        Ok(())
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Seeds from the OS unless a seed is configured.
    #[default]
    NonReproducible,

    /// Seeds with a fixed default when no seed is configured.
    Reproducible,

    /// Reproducible, and re-checks the incremental score every step.
    FullAssert,
}

/// Move thread count configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveThreadCount {
    /// Use the available parallelism.
    Auto,

    /// Score moves on the solver thread.
    #[default]
    None,

    /// Specific number of threads.
    Count(usize),
}

impl MoveThreadCount {
    /// Resolves to a concrete thread count; 1 means single-threaded.
    pub fn resolve(self) -> usize {
        match self {
            MoveThreadCount::Auto => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            MoveThreadCount::None => 1,
            MoveThreadCount::Count(n) => n.max(1),
        }
    }
}

/// Termination configuration.
///
/// Every configured limit is a separate condition; solving stops as soon
/// as any one of them is met.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    pub millis_spent_limit: Option<u64>,

    pub seconds_spent_limit: Option<u64>,

    pub minutes_spent_limit: Option<u64>,

    /// Target best score, e.g. `"0hard/0soft"`.
    pub best_score_limit: Option<String>,

    pub step_count_limit: Option<u64>,

    pub unimproved_step_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Sums the millisecond, second and minute limits.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis = self.millis_spent_limit.unwrap_or(0)
            + self.seconds_spent_limit.unwrap_or(0) * 1_000
            + self.minutes_spent_limit.unwrap_or(0) * 60_000;
        let any = self.millis_spent_limit.is_some()
            || self.seconds_spent_limit.is_some()
            || self.minutes_spent_limit.is_some();
        any.then(|| Duration::from_millis(millis))
    }

    /// Parses `best_score_limit`.
    pub fn best_score_limit(&self) -> Result<Option<HardSoftScore>, ConfigError> {
        self.best_score_limit
            .as_deref()
            .map(|s| {
                HardSoftScore::parse(s)
                    .map_err(|e| ConfigError::Invalid(format!("best_score_limit: {}", e.message)))
            })
            .transpose()
    }

    /// Returns true when no limit is set.
    pub fn is_empty(&self) -> bool {
        self == &TerminationConfig::default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.best_score_limit().map(|_| ())
    }
}

/// Phase configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseConfig {
    ConstructionHeuristic(ConstructionHeuristicConfig),

    LocalSearch(LocalSearchConfig),
}

impl PhaseConfig {
    pub fn termination(&self) -> Option<&TerminationConfig> {
        match self {
            PhaseConfig::ConstructionHeuristic(c) => c.termination.as_ref(),
            PhaseConfig::LocalSearch(c) => c.termination.as_ref(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(termination) = self.termination() {
            termination.validate()?;
        }
        match self {
            PhaseConfig::ConstructionHeuristic(_) => Ok(()),
            PhaseConfig::LocalSearch(c) => c.validate(),
        }
    }
}

/// Construction heuristic configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConstructionHeuristicConfig {
    #[serde(default)]
    pub construction_heuristic_type: ConstructionHeuristicType,

    pub termination: Option<TerminationConfig>,
}

/// Construction heuristic types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionHeuristicType {
    /// Take the first value that does not lower the score.
    #[default]
    FirstFit,

    /// Try every value and take the best.
    BestFit,
}

/// Local search configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LocalSearchConfig {
    /// Defaults to hill climbing.
    pub acceptor: Option<AcceptorConfig>,

    pub forager: Option<ForagerConfig>,

    /// Defaults to the union of change and swap moves.
    pub move_selector: Option<MoveSelectorConfig>,

    #[serde(default)]
    pub selection_order: SelectionOrder,

    pub termination: Option<TerminationConfig>,
}

impl LocalSearchConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(acceptor) = &self.acceptor {
            acceptor.validate()?;
        }
        if let Some(forager) = &self.forager {
            if forager.forager_type == ForagerType::AcceptedCount
                && forager.accepted_count_limit == Some(0)
            {
                return Err(ConfigError::Invalid(
                    "accepted_count_limit must be positive".into(),
                ));
            }
        }
        if let Some(selector) = &self.move_selector {
            selector.validate()?;
        }
        Ok(())
    }
}

/// Acceptor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcceptorConfig {
    /// Accept moves that do not lower the score.
    HillClimbing,

    SimulatedAnnealing(SimulatedAnnealingConfig),

    LateAcceptance(LateAcceptanceConfig),
}

impl AcceptorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            AcceptorConfig::HillClimbing => Ok(()),
            AcceptorConfig::LateAcceptance(c) => match c.late_acceptance_size {
                Some(0) => Err(ConfigError::Invalid(
                    "late_acceptance_size must be positive".into(),
                )),
                _ => Ok(()),
            },
            AcceptorConfig::SimulatedAnnealing(c) => {
                let temperature = c.starting_temperature()?;
                if temperature.hard() < 0 || temperature.soft() < 0 {
                    return Err(ConfigError::Invalid(
                        "starting_temperature levels must not be negative".into(),
                    ));
                }
                match c.decay_rate {
                    Some(rate) if !(rate > 0.0 && rate <= 1.0) => Err(ConfigError::Invalid(
                        format!("decay_rate {} must be in (0, 1]", rate),
                    )),
                    _ => Ok(()),
                }
            }
        }
    }
}

/// Simulated annealing configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulatedAnnealingConfig {
    /// Per-level starting temperature, e.g. `"0hard/10soft"`.
    pub starting_temperature: Option<String>,

    /// Multiplicative cooling per step.
    pub decay_rate: Option<f64>,
}

impl SimulatedAnnealingConfig {
    /// Parses the starting temperature; defaults to `0hard/1soft`.
    pub fn starting_temperature(&self) -> Result<HardSoftScore, ConfigError> {
        match &self.starting_temperature {
            None => Ok(HardSoftScore::ONE_SOFT),
            Some(s) => HardSoftScore::parse(s).map_err(|e| {
                ConfigError::Invalid(format!("starting_temperature: {}", e.message))
            }),
        }
    }
}

/// Late acceptance configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LateAcceptanceConfig {
    pub late_acceptance_size: Option<usize>,
}

/// Forager configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ForagerConfig {
    #[serde(default)]
    pub forager_type: ForagerType,

    /// Only used by `accepted_count`; defaults to 1.
    pub accepted_count_limit: Option<usize>,
}

/// How a step picks among its accepted moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForagerType {
    /// Apply the first accepted move.
    FirstAccepted,

    /// Stop after N accepted moves and apply the best of them.
    AcceptedCount,

    /// Evaluate the whole neighbourhood and apply the best accepted move.
    #[default]
    BestScore,
}

/// Order in which a step visits its candidate moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrder {
    /// Enumeration order.
    #[default]
    Original,

    /// Shuffled every step with the solver's seeded RNG.
    Random,

    /// Enumeration order, resuming after the previously applied move.
    RoundRobin,
}

/// Move selector configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveSelectorConfig {
    ChangeMoveSelector(ChangeMoveConfig),

    SwapMoveSelector(SwapMoveConfig),

    /// Union of the children, or change + swap when `selectors` is empty.
    UnionMoveSelector(UnionMoveSelectorConfig),
}

impl MoveSelectorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            MoveSelectorConfig::UnionMoveSelector(u) => {
                u.selectors.iter().try_for_each(MoveSelectorConfig::validate)
            }
            _ => Ok(()),
        }
    }
}

/// Change move configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ChangeMoveConfig {
    /// Restrict to one entity class.
    pub entity_class: Option<String>,

    /// Restrict to one variable.
    pub variable_name: Option<String>,
}

/// Swap move configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SwapMoveConfig {
    pub entity_class: Option<String>,

    pub variable_name: Option<String>,
}

/// Union move selector configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UnionMoveSelectorConfig {
    #[serde(default)]
    pub selectors: Vec<MoveSelectorConfig>,
}
