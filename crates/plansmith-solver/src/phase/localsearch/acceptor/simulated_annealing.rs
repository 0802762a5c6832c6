//! Simulated annealing acceptor.

use plansmith_core::HardSoftScore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Acceptor;

/// Simulated annealing acceptor - accepts worse moves with a probability
/// that shrinks as the temperature cools.
///
/// Each score level has its own temperature. A move that is worse on a
/// level is accepted on that level with probability `exp(delta / t)`; the
/// chances of all worse levels are multiplied. Temperatures are multiplied
/// by `decay_rate` after every step. A level at zero temperature never
/// accepts a worse score.
///
/// # Example
///
/// ```
/// use plansmith_core::HardSoftScore;
/// use plansmith_solver::phase::localsearch::SimulatedAnnealingAcceptor;
///
/// let acceptor = SimulatedAnnealingAcceptor::new(HardSoftScore::of_soft(10), 0.99, 42);
/// assert_eq!(acceptor.temperature(), (0.0, 10.0));
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedAnnealingAcceptor {
    starting_temperature: (f64, f64),
    temperature: (f64, f64),
    decay_rate: f64,
    seed: u64,
    rng: StdRng,
}

impl SimulatedAnnealingAcceptor {
    /// # Arguments
    /// * `starting_temperature` - Per-level temperature; higher explores more
    /// * `decay_rate` - Multiplicative cooling per step (e.g. 0.99)
    /// * `seed` - Seed of the acceptance draws
    pub fn new(starting_temperature: HardSoftScore, decay_rate: f64, seed: u64) -> Self {
        let starting_temperature = (
            starting_temperature.hard() as f64,
            starting_temperature.soft() as f64,
        );
        Self {
            starting_temperature,
            temperature: starting_temperature,
            decay_rate,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Current (hard, soft) temperature.
    pub fn temperature(&self) -> (f64, f64) {
        self.temperature
    }

    fn level_chance(delta: i64, temperature: f64) -> f64 {
        if delta >= 0 {
            1.0
        } else if temperature <= 0.0 {
            0.0
        } else {
            (delta as f64 / temperature).exp()
        }
    }
}

impl Acceptor for SimulatedAnnealingAcceptor {
    fn is_accepted(&mut self, last_step_score: &HardSoftScore, move_score: &HardSoftScore) -> bool {
        if move_score >= last_step_score {
            return true;
        }

        let chance = Self::level_chance(
            move_score.hard() - last_step_score.hard(),
            self.temperature.0,
        ) * Self::level_chance(
            move_score.soft() - last_step_score.soft(),
            self.temperature.1,
        );
        if chance <= 0.0 {
            return false;
        }
        self.rng.random::<f64>() < chance
    }

    fn phase_started(&mut self, _initial_score: &HardSoftScore) {
        self.temperature = self.starting_temperature;
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn step_ended(&mut self, _step_score: &HardSoftScore) {
        self.temperature.0 *= self.decay_rate;
        self.temperature.1 *= self.decay_rate;
    }

    fn is_deterministic(&self) -> bool {
        false
    }
}
