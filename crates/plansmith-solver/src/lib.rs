//! Plansmith Solver Engine
//!
//! This crate provides the main solver implementation including:
//! - Solver and SolverManager
//! - Phases (construction heuristic, local search)
//! - Move system
//! - Termination conditions
//! - Statistics collection
//! - Configuration wiring (builder module)

pub mod builder;
pub mod heuristic;
pub mod manager;
pub mod phase;
pub mod scope;
pub mod solver;
pub mod statistics;
pub mod termination;

pub use builder::{
    AcceptorBuilder, ForagerBuilder, MoveSelectorBuilder, PhaseBuilder, TerminationBuilder,
    DEFAULT_TIME_LIMIT_SECS, DEFAULT_UNIMPROVED_STEP_COUNT_LIMIT,
};
pub use heuristic::{
    ChangeMove, ChangeMoveSelector, Move, MoveArranger, MoveSelector, SelectionOrder, SwapMove,
    SwapMoveSelector, UnionMoveSelector,
};
pub use manager::{SolverJob, SolverJobError, SolverManager};
pub use phase::{
    construction::{
        BestFitForager, ConstructionForager, ConstructionHeuristicPhase, FirstFitForager,
    },
    localsearch::{
        AcceptedCountForager, Acceptor, BestScoreForager, FirstAcceptedForager,
        HillClimbingAcceptor, LateAcceptanceAcceptor, LocalSearchForager, LocalSearchPhase,
        SimulatedAnnealingAcceptor,
    },
    Phase,
};
pub use scope::{BestSolutionCallback, PhaseProgress, SolverScope};
pub use solver::{SolveResult, Solver, SolverState, DEFAULT_RANDOM_SEED};
pub use statistics::{PhaseStatistics, SolverStatistics, StatisticsCollector};
pub use termination::{
    BestScoreTermination, ExternalTermination, OrTermination, StepCountTermination, Termination,
    TerminationLevel, TimeTermination, UnimprovedStepCountTermination,
};
