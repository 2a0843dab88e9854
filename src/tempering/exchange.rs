//! Replica-exchange acceptance and the sequential swap phase.

use crate::hamiltonian::Hamiltonian;
use crate::sa::{accept_log, sweep, NonFinite};
use crate::spin::SpinState;
use rand::rngs::StdRng;
use rand::Rng;

/// Probability of exchanging the configurations held at `beta_a` and
/// `beta_b` with energies `energy_a` and `energy_b`:
/// `min(1, exp((beta_a - beta_b) · (energy_a - energy_b)))`.
pub fn swap_probability(beta_a: f64, beta_b: f64, energy_a: f64, energy_b: f64) -> f64 {
    let log_ratio = (beta_a - beta_b) * (energy_a - energy_b);
    if log_ratio >= 0.0 {
        1.0
    } else if log_ratio.is_nan() {
        0.0
    } else {
        log_ratio.exp()
    }
}

/// One temperature slot: a fixed beta and the configuration currently
/// held there, plus the slot's own random stream and scratch buffer.
pub(crate) struct Replica {
    pub beta: f64,
    pub state: SpinState,
    pub best: SpinState,
    pub rng: StdRng,
    pub order: Vec<usize>,
    pub failure: Option<NonFinite>,
}

impl Replica {
    pub fn new(beta: f64, state: SpinState, rng: StdRng) -> Self {
        let order = vec![0; state.len()];
        Self {
            beta,
            best: state.clone(),
            state,
            rng,
            order,
            failure: None,
        }
    }

    /// Runs `sweeps` Metropolis sweeps at the slot's beta, keeping the
    /// slot's best state. Stops at the first non-finite energy.
    pub fn sweep<H: Hamiltonian + ?Sized>(&mut self, hamiltonian: &H, sweeps: usize) {
        for _ in 0..sweeps {
            if let Err(e) = sweep(
                hamiltonian,
                &mut self.state,
                self.beta,
                &mut self.order,
                &mut self.rng,
            ) {
                self.failure = Some(e);
                return;
            }
            if !self.state.energy().is_finite() {
                self.failure = Some(NonFinite(self.state.energy()));
                return;
            }
            if self.state.energy() < self.best.energy() {
                self.best = self.state.clone();
            }
        }
    }
}

/// Swap attempts made and accepted during one exchange phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ExchangeStats {
    pub attempted: usize,
    pub accepted: usize,
}

impl ExchangeStats {
    /// Accepted fraction, `0.0` when nothing was attempted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempted as f64
        }
    }
}

/// Attempts exchanges between adjacent slots `(0,1), (1,2), …` in order.
///
/// Each pair is evaluated on the configurations present after the earlier
/// pairs of the same phase were resolved. Configurations move between
/// slots; betas, random streams and slot bests stay put.
pub(crate) fn exchange_round<R: Rng>(replicas: &mut [Replica], rng: &mut R) -> ExchangeStats {
    let mut stats = ExchangeStats::default();
    for k in 0..replicas.len().saturating_sub(1) {
        let (left, right) = replicas.split_at_mut(k + 1);
        let a = &mut left[k];
        let b = &mut right[0];
        let log_ratio = (a.beta - b.beta) * (a.state.energy() - b.state.energy());
        stats.attempted += 1;
        if accept_log(log_ratio, rng) {
            std::mem::swap(&mut a.state, &mut b.state);
            stats.accepted += 1;
        }
    }
    stats
}
