//! Parallel tempering execution loop.

use super::exchange::{exchange_round, ExchangeStats, Replica};
use crate::error::{AnnealError, Result};
use crate::hamiltonian::Hamiltonian;
use crate::pool::for_each_mut;
use crate::random::{resolve_seed, stream_rng};
use crate::sa::non_finite;
use crate::spin::SpinState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Result of a parallel tempering run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParallelTemperingResult {
    /// Lowest-energy configuration seen at any temperature.
    pub best_state: SpinState,

    /// Energy of `best_state`.
    pub best_energy: f64,

    /// Lowest current energy over all slots at the end of every round.
    pub energy_trace: Vec<f64>,

    /// Mean current energy over all slots at the end of every round.
    pub average_energy_trace: Vec<f64>,

    /// Accepted fraction of swap attempts at the end of every round; `0.0`
    /// on rounds without an exchange phase.
    pub swap_acceptance_trace: Vec<f64>,

    /// Configuration held by each temperature slot at the end, in beta order.
    pub final_states: Vec<SpinState>,

    /// Energies of `final_states`.
    pub final_energies: Vec<f64>,

    /// Whether the run was cancelled before all rounds completed.
    pub cancelled: bool,
}

/// Replica exchange Monte Carlo over a fixed ladder of inverse temperatures.
///
/// Each round, every slot performs Metropolis sweeps at its own beta (on
/// the worker pool when enabled). Every `swap_interval` rounds, after all
/// slots finish, a single-threaded phase attempts exchanges between
/// neighbours in list order (see [`swap_probability`](super::swap_probability)).
/// Configurations move between temperatures; temperatures never move.
///
/// # Examples
///
/// ```
/// use u_anneal::hamiltonian::SparseIsing;
/// use u_anneal::tempering::ParallelTemperingAnnealer;
///
/// let h = SparseIsing::new(vec![0.0; 5], [(0, 1, 0.3), (1, 2, 0.3), (2, 3, 0.3), (3, 4, 0.3)])
///     .unwrap();
/// let result = ParallelTemperingAnnealer::new(&h, vec![0.2, 0.4, 0.8, 1.2])
///     .unwrap()
///     .with_seed(3)
///     .run(5, 20, 1)
///     .unwrap();
/// assert_eq!(result.swap_acceptance_trace.len(), 20);
/// ```
pub struct ParallelTemperingAnnealer<'a, H: Hamiltonian + ?Sized> {
    hamiltonian: &'a H,
    betas: Vec<f64>,
    seed: Option<u64>,
    parallel: bool,
}

impl<'a, H: Hamiltonian + ?Sized> ParallelTemperingAnnealer<'a, H> {
    /// Creates an annealer with one slot per entry of `betas`.
    ///
    /// List adjacency defines which slots exchange. A single beta is
    /// accepted: the run proceeds but never swaps.
    ///
    /// # Errors
    ///
    /// [`AnnealError::Configuration`] if `betas` is empty or contains a
    /// negative or non-finite value.
    pub fn new(hamiltonian: &'a H, betas: Vec<f64>) -> Result<Self> {
        if betas.is_empty() {
            return Err(AnnealError::config("parallel tempering needs at least one beta"));
        }
        if let Some(i) = betas.iter().position(|b| !b.is_finite() || *b < 0.0) {
            return Err(AnnealError::config(format!(
                "beta[{i}] is {}, expected a finite non-negative number",
                betas[i]
            )));
        }
        Ok(Self {
            hamiltonian,
            betas,
            seed: None,
            parallel: true,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether slot sweeps run on the rayon pool (default `true`).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn betas(&self) -> &[f64] {
        &self.betas
    }

    /// Runs `steps` rounds of `sweeps_per_step` sweeps per slot, with an
    /// exchange phase after every `swap_interval`-th round.
    pub fn run(
        &self,
        sweeps_per_step: usize,
        steps: usize,
        swap_interval: usize,
    ) -> Result<ParallelTemperingResult> {
        self.run_with_cancel(sweeps_per_step, steps, swap_interval, None)
    }

    /// Runs with an optional cancellation token, checked between rounds.
    pub fn run_with_cancel(
        &self,
        sweeps_per_step: usize,
        steps: usize,
        swap_interval: usize,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<ParallelTemperingResult> {
        if sweeps_per_step == 0 {
            return Err(AnnealError::config("sweeps_per_step must be at least 1"));
        }
        if steps == 0 {
            return Err(AnnealError::config("steps must be at least 1"));
        }
        if swap_interval == 0 {
            return Err(AnnealError::config("swap_interval must be at least 1"));
        }

        let h = self.hamiltonian;
        let slots = self.betas.len();
        let base_seed = resolve_seed(self.seed);
        debug!(
            slots,
            steps, sweeps_per_step, swap_interval, "starting parallel tempering"
        );

        let mut replicas: Vec<Replica> = self
            .betas
            .iter()
            .enumerate()
            .map(|(k, &beta)| {
                let mut rng = stream_rng(base_seed, k as u64);
                let state = SpinState::random(h, &mut rng);
                Replica::new(beta, state, rng)
            })
            .collect();
        if let Some(r) = replicas.iter().find(|r| !r.state.energy().is_finite()) {
            return Err(non_finite(0, r.state.energy(), Vec::new()));
        }
        let mut swap_rng = stream_rng(base_seed, slots as u64);

        let mut energy_trace = Vec::with_capacity(steps);
        let mut average_energy_trace = Vec::with_capacity(steps);
        let mut swap_acceptance_trace = Vec::with_capacity(steps);
        let mut cancelled = false;

        for round in 0..steps {
            if cancel
                .as_deref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                cancelled = true;
                break;
            }

            for_each_mut(&mut replicas, self.parallel, |replica| {
                replica.sweep(h, sweeps_per_step)
            });
            if let Some(failure) = replicas.iter().find_map(|r| r.failure) {
                return Err(non_finite(round, failure.0, energy_trace));
            }

            let stats = if (round + 1) % swap_interval == 0 {
                exchange_round(&mut replicas, &mut swap_rng)
            } else {
                ExchangeStats::default()
            };
            swap_acceptance_trace.push(stats.acceptance_rate());

            let energies = replicas.iter().map(|r| r.state.energy());
            energy_trace.push(energies.clone().fold(f64::INFINITY, f64::min));
            average_energy_trace.push(energies.sum::<f64>() / slots as f64);
        }

        let best_state = replicas
            .iter()
            .map(|r| &r.best)
            .fold(&replicas[0].best, |best, s| {
                if s.energy() < best.energy() {
                    s
                } else {
                    best
                }
            })
            .clone();
        let final_states: Vec<SpinState> = replicas.into_iter().map(|r| r.state).collect();
        let final_energies = final_states.iter().map(SpinState::energy).collect();

        debug!(
            best_energy = best_state.energy(),
            cancelled, "parallel tempering finished"
        );

        Ok(ParallelTemperingResult {
            best_energy: best_state.energy(),
            best_state,
            energy_trace,
            average_energy_trace,
            swap_acceptance_trace,
            final_states,
            final_energies,
            cancelled,
        })
    }
}
