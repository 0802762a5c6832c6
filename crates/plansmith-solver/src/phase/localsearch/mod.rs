//! Local search phase
//!
//! Improves an existing solution by iteratively applying moves
//! that are accepted according to an acceptance criterion.

mod acceptor;
mod forager;
mod phase;

pub use acceptor::{
    Acceptor, HillClimbingAcceptor, LateAcceptanceAcceptor, SimulatedAnnealingAcceptor,
};
pub use forager::{
    AcceptedCountForager, BestScoreForager, FirstAcceptedForager, LocalSearchForager,
};
pub use phase::LocalSearchPhase;
