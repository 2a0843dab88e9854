//! Classical simulated annealing execution loop.

use super::config::AnnealConfig;
use super::metropolis::{sweep, NonFinite};
use crate::error::{AnnealError, Result};
use crate::hamiltonian::Hamiltonian;
use crate::observer::Observer;
use crate::random::{create_rng, resolve_seed};
use crate::schedule::AnnealSchedule;
use crate::spin::SpinState;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of a classical annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealResult {
    /// Lowest-energy configuration seen.
    pub best_state: SpinState,

    /// Energy of `best_state`.
    pub best_energy: f64,

    /// Current energy at the end of every completed step.
    pub energy_trace: Vec<f64>,

    /// Total accepted flips.
    pub accepted_flips: usize,

    /// Whether the run was cancelled before the schedule completed.
    pub cancelled: bool,
}

/// Simulated annealing of one spin configuration.
///
/// At step `t` the annealer reads `beta_t` from the schedule and performs
/// `sweeps_per_step` Metropolis sweeps. The best state is updated after
/// every sweep on strict improvement; the observer is called once per step.
///
/// # Examples
///
/// ```
/// use u_anneal::hamiltonian::SparseIsing;
/// use u_anneal::sa::Annealer;
/// use u_anneal::schedule::AnnealSchedule;
///
/// let h = SparseIsing::new(vec![0.0; 3], [(0, 1, -1.0), (1, 2, -1.0)]).unwrap();
/// let schedule = AnnealSchedule::linear(0.1, 3.0, 30).unwrap();
/// let result = Annealer::new(&h, &schedule)
///     .with_seed(42)
///     .run(30, None)
///     .unwrap();
/// assert_eq!(result.best_energy, -2.0);
/// ```
pub struct Annealer<'a, H: Hamiltonian + ?Sized> {
    hamiltonian: &'a H,
    schedule: &'a AnnealSchedule,
    config: AnnealConfig,
}

impl<'a, H: Hamiltonian + ?Sized> Annealer<'a, H> {
    pub fn new(hamiltonian: &'a H, schedule: &'a AnnealSchedule) -> Self {
        Self {
            hamiltonian,
            schedule,
            config: AnnealConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AnnealConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_sweeps_per_step(mut self, n: usize) -> Self {
        self.config.sweeps_per_step = n;
        self
    }

    pub fn config(&self) -> &AnnealConfig {
        &self.config
    }

    /// Runs the schedule. `steps` must equal the schedule length.
    pub fn run(&self, steps: usize, observer: Option<&mut dyn Observer>) -> Result<AnnealResult> {
        self.run_with_cancel(steps, observer, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// The token is checked between steps; a cancelled run returns the
    /// best state found so far with `cancelled` set.
    pub fn run_with_cancel(
        &self,
        steps: usize,
        observer: Option<&mut dyn Observer>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealResult> {
        let mut rng = create_rng(resolve_seed(self.config.seed));
        self.run_stream(steps, observer, cancel.as_deref(), &mut rng)
    }

    /// Runs on a caller-provided random stream.
    pub(crate) fn run_stream<R: Rng>(
        &self,
        steps: usize,
        mut observer: Option<&mut dyn Observer>,
        cancel: Option<&AtomicBool>,
        rng: &mut R,
    ) -> Result<AnnealResult> {
        self.config.validate()?;
        self.schedule.check_len(steps)?;

        let h = self.hamiltonian;
        let n = h.num_spins();
        debug!(
            spins = n,
            steps,
            sweeps_per_step = self.config.sweeps_per_step,
            "starting anneal"
        );

        let mut state = SpinState::random(h, rng);
        if !state.energy().is_finite() {
            return Err(non_finite(0, state.energy(), Vec::new()));
        }
        let mut best_state = state.clone();
        let mut energy_trace = Vec::with_capacity(steps);
        let mut order = vec![0usize; n];
        let mut accepted_flips = 0usize;
        let mut cancelled = false;

        if let Some(obs) = observer.as_deref_mut() {
            obs.on_start(steps);
        }

        for step in 0..steps {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }

            let beta = self.schedule.beta_at(step);
            for _ in 0..self.config.sweeps_per_step {
                match sweep(h, &mut state, beta, &mut order, rng) {
                    Ok(accepted) => accepted_flips += accepted,
                    Err(NonFinite(value)) => return Err(non_finite(step, value, energy_trace)),
                }
                if !state.energy().is_finite() {
                    return Err(non_finite(step, state.energy(), energy_trace));
                }
                if state.energy() < best_state.energy() {
                    best_state = state.clone();
                }
            }

            energy_trace.push(state.energy());
            if let Some(obs) = observer.as_deref_mut() {
                obs.on_step(step, &state, state.energy());
            }
        }

        debug!(
            best_energy = best_state.energy(),
            accepted_flips, cancelled, "anneal finished"
        );

        Ok(AnnealResult {
            best_energy: best_state.energy(),
            best_state,
            energy_trace,
            accepted_flips,
            cancelled,
        })
    }
}

pub(crate) fn non_finite(step: usize, value: f64, trace: Vec<f64>) -> AnnealError {
    warn!(step, value, "non-finite energy, aborting run");
    AnnealError::Numerical { step, value, trace }
}
