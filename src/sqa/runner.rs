//! Simulated quantum annealing execution loop.

use super::config::{SqaConfig, WorldlineMove};
use super::path_integral::{StepParams, Worldlines};
use super::state::TrotterState;
use crate::error::{AnnealError, Result};
use crate::hamiltonian::Hamiltonian;
use crate::observer::Observer;
use crate::pool::for_each_mut;
use crate::random::{resolve_seed, stream_rng};
use crate::sa::non_finite;
use crate::schedule::SqaSchedule;
use crate::spin::SpinState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Result of a simulated quantum annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SqaResult {
    /// Lowest-energy classical readout seen: a single slice or a
    /// replica's majority vote across slices.
    pub best_state: SpinState,

    /// Energy of `best_state`.
    pub best_energy: f64,

    /// Lowest readout energy at the end of every (beta, gamma) step.
    pub energy_trace: Vec<f64>,

    /// Mean slice energy over all replicas and slices at every step.
    pub average_energy_trace: Vec<f64>,

    /// Trotter rings at the end of the run, one per outer replica.
    pub final_states: Vec<TrotterState>,

    /// Whether the run was cancelled before the schedule completed.
    pub cancelled: bool,
}

/// Path-integral simulated quantum annealing.
///
/// Every outer replica holds P Trotter slices of the classical system,
/// bound into a ring by the coupling from [`trotter_coupling`](super::trotter_coupling).
/// For each (beta, gamma) pair the annealer runs `sweeps_per_beta` beta
/// sweeps over every slice, then `worldline_sweeps` worldline sweeps.
/// Replicas run on the worker pool when enabled; slices within one replica
/// are updated sequentially.
///
/// # Examples
///
/// ```
/// use u_anneal::hamiltonian::DenseIsing;
/// use u_anneal::schedule::SqaSchedule;
/// use u_anneal::sqa::SqaAnnealer;
///
/// let h = DenseIsing::new(
///     vec![0.0; 3],
///     vec![
///         vec![0.0, 0.5, -0.3],
///         vec![0.5, 0.0, 0.2],
///         vec![-0.3, 0.2, 0.0],
///     ],
/// )
/// .unwrap();
/// let schedule = SqaSchedule::from_vectors(vec![0.2, 0.5, 1.0], vec![2.0, 1.0, 0.5]).unwrap();
/// let result = SqaAnnealer::new(&h, &schedule, 8, 2)
///     .unwrap()
///     .with_seed(42)
///     .run(5, 1)
///     .unwrap();
/// assert_eq!(result.energy_trace.len(), 3);
/// ```
pub struct SqaAnnealer<'a, H: Hamiltonian + ?Sized> {
    hamiltonian: &'a H,
    schedule: &'a SqaSchedule,
    trotter_slices: usize,
    replicas: usize,
    config: SqaConfig,
}

impl<'a, H: Hamiltonian + ?Sized> SqaAnnealer<'a, H> {
    /// Fails with [`AnnealError::Configuration`] if `trotter_slices < 1`
    /// or `replicas < 1`.
    pub fn new(
        hamiltonian: &'a H,
        schedule: &'a SqaSchedule,
        trotter_slices: usize,
        replicas: usize,
    ) -> Result<Self> {
        if trotter_slices < 1 {
            return Err(AnnealError::config("trotter_slices must be at least 1"));
        }
        if replicas < 1 {
            return Err(AnnealError::config("replicas must be at least 1"));
        }
        Ok(Self {
            hamiltonian,
            schedule,
            trotter_slices,
            replicas,
            config: SqaConfig::default(),
        })
    }

    pub fn with_config(mut self, config: SqaConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn with_worldline_move(mut self, worldline_move: WorldlineMove) -> Self {
        self.config.worldline_move = worldline_move;
        self
    }

    pub fn config(&self) -> &SqaConfig {
        &self.config
    }

    pub fn trotter_slices(&self) -> usize {
        self.trotter_slices
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Runs the whole schedule.
    pub fn run(&self, sweeps_per_beta: usize, worldline_sweeps: usize) -> Result<SqaResult> {
        self.run_with_cancel(sweeps_per_beta, worldline_sweeps, None, None)
    }

    /// Runs with an optional observer and cancellation token.
    ///
    /// The observer receives, once per step, the lowest-energy readout of
    /// that step and its energy. The token is checked between steps.
    pub fn run_with_cancel(
        &self,
        sweeps_per_beta: usize,
        worldline_sweeps: usize,
        mut observer: Option<&mut dyn Observer>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SqaResult> {
        if sweeps_per_beta < 1 {
            return Err(AnnealError::config("sweeps_per_beta must be at least 1"));
        }

        let h = self.hamiltonian;
        let slices = self.trotter_slices;
        let steps = self.schedule.len();
        let base_seed = resolve_seed(self.config.seed);
        debug!(
            spins = h.num_spins(),
            slices,
            replicas = self.replicas,
            steps,
            sweeps_per_beta,
            worldline_sweeps,
            "starting quantum anneal"
        );

        let mut groups: Vec<Worldlines> = (0..self.replicas)
            .map(|r| {
                let mut rng = stream_rng(base_seed, r as u64);
                let state = TrotterState::random(h, slices, &mut rng);
                Worldlines::new(state, rng)
            })
            .collect();
        if let Some(&e) = groups
            .iter()
            .flat_map(|g| g.state.slice_energies())
            .find(|e| !e.is_finite())
        {
            return Err(non_finite(0, e, Vec::new()));
        }

        let mut best_state = groups[0].state.slice_state(0);
        let mut energy_trace = Vec::with_capacity(steps);
        let mut average_energy_trace = Vec::with_capacity(steps);
        let mut cancelled = false;

        if let Some(obs) = observer.as_deref_mut() {
            obs.on_start(steps);
        }

        for (step, (beta, gamma)) in self.schedule.iter().enumerate() {
            if cancel
                .as_deref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                cancelled = true;
                break;
            }

            let params = StepParams::new(
                beta,
                gamma,
                slices,
                sweeps_per_beta,
                worldline_sweeps,
                self.config.worldline_move,
            );
            for_each_mut(&mut groups, self.config.parallel, |group| {
                group.anneal_step(h, &params)
            });
            if let Some(failure) = groups.iter().find_map(|g| g.failure) {
                return Err(non_finite(step, failure.0, energy_trace));
            }

            let readout = step_readout(h, &groups);
            if !readout.best.energy().is_finite() {
                return Err(non_finite(step, readout.best.energy(), energy_trace));
            }
            energy_trace.push(readout.best.energy());
            average_energy_trace.push(readout.average_energy);
            if let Some(obs) = observer.as_deref_mut() {
                obs.on_step(step, &readout.best, readout.best.energy());
            }
            if readout.best.energy() < best_state.energy() {
                best_state = readout.best;
            }
        }

        debug!(
            best_energy = best_state.energy(),
            cancelled, "quantum anneal finished"
        );

        Ok(SqaResult {
            best_energy: best_state.energy(),
            best_state,
            energy_trace,
            average_energy_trace,
            final_states: groups.into_iter().map(|g| g.state).collect(),
            cancelled,
        })
    }
}

struct StepReadout {
    best: SpinState,
    average_energy: f64,
}

/// Scans every slice and every replica's majority vote for the lowest
/// classical energy, and averages the slice energies.
fn step_readout<H: Hamiltonian + ?Sized>(hamiltonian: &H, groups: &[Worldlines]) -> StepReadout {
    let mut best = groups[0].state.slice_state(0);
    let mut total = 0.0;
    let mut count = 0usize;
    for group in groups {
        let state = &group.state;
        for (p, &e) in state.slice_energies().iter().enumerate() {
            total += e;
            count += 1;
            if e < best.energy() {
                best = state.slice_state(p);
            }
        }
        let vote = state.majority_vote();
        let e = hamiltonian.energy(&vote);
        if e < best.energy() {
            best = SpinState::from_parts(vote, e);
        }
    }
    StepReadout {
        best,
        average_energy: total / count as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamiltonian::{DenseIsing, SparseIsing};
    use crate::observer::MetricsObserver;
    use std::sync::atomic::AtomicUsize;

    fn triangle() -> DenseIsing {
        DenseIsing::new(
            vec![0.0; 3],
            vec![
                vec![0.0, 0.5, -0.3],
                vec![0.5, 0.0, 0.2],
                vec![-0.3, 0.2, 0.0],
            ],
        )
        .unwrap()
    }

    fn short_schedule() -> SqaSchedule {
        SqaSchedule::from_vectors(vec![0.2, 0.5, 1.0], vec![2.0, 1.0, 0.5]).unwrap()
    }

    /// Two free spins whose energy change turns NaN after `limit` evaluations.
    struct FailsAfter {
        calls: AtomicUsize,
        limit: usize,
    }

    impl Hamiltonian for FailsAfter {
        fn num_spins(&self) -> usize {
            2
        }

        fn energy(&self, _spins: &[i8]) -> f64 {
            0.0
        }

        fn delta_energy(&self, _spins: &[i8], _flip: usize) -> f64 {
            if self.calls.fetch_add(1, Ordering::Relaxed) < self.limit {
                1.0
            } else {
                f64::NAN
            }
        }
    }

    #[test]
    fn test_trace_length_matches_schedule() {
        let h = triangle();
        let schedule = short_schedule();
        for (slices, replicas) in [(1, 1), (2, 3), (8, 2)] {
            let result = SqaAnnealer::new(&h, &schedule, slices, replicas)
                .unwrap()
                .with_seed(42)
                .run(5, 1)
                .unwrap();
            assert_eq!(result.energy_trace.len(), 3);
            assert_eq!(result.average_energy_trace.len(), 3);
            assert_eq!(result.final_states.len(), replicas);
            assert!(result.final_states.iter().all(|s| s.slices() == slices));
        }
    }

    #[test]
    fn test_best_energy_matches_hamiltonian() {
        let h = triangle();
        let schedule = short_schedule();
        let result = SqaAnnealer::new(&h, &schedule, 8, 2)
            .unwrap()
            .with_seed(42)
            .run(5, 1)
            .unwrap();
        assert!((h.energy(result.best_state.spins()) - result.best_energy).abs() < 1e-9);
        assert!(result
            .energy_trace
            .iter()
            .all(|&e| e >= result.best_energy - 1e-12));
    }

    #[test]
    fn test_configuration_errors() {
        let h = triangle();
        let schedule = short_schedule();
        assert!(matches!(
            SqaAnnealer::new(&h, &schedule, 0, 1),
            Err(AnnealError::Configuration(_))
        ));
        assert!(matches!(
            SqaAnnealer::new(&h, &schedule, 4, 0),
            Err(AnnealError::Configuration(_))
        ));
        let sqa = SqaAnnealer::new(&h, &schedule, 4, 1).unwrap();
        assert!(matches!(sqa.run(0, 1), Err(AnnealError::Configuration(_))));
    }

    #[test]
    fn test_finds_chain_ground_state() {
        let h = SparseIsing::new(vec![0.0; 6], (0..5).map(|i| (i, i + 1, -1.0))).unwrap();
        let schedule = SqaSchedule::linear(0.5, 4.0, 3.0, 0.05, 30).unwrap();
        for worldline_move in [WorldlineMove::Global, WorldlineMove::Segment] {
            let result = SqaAnnealer::new(&h, &schedule, 8, 2)
                .unwrap()
                .with_seed(8)
                .with_worldline_move(worldline_move)
                .run(10, 2)
                .unwrap();
            assert!((result.best_energy - (-5.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let h = triangle();
        let schedule = SqaSchedule::linear(0.2, 2.0, 2.0, 0.1, 8).unwrap();
        let run = |parallel| {
            SqaAnnealer::new(&h, &schedule, 4, 3)
                .unwrap()
                .with_seed(21)
                .with_parallel(parallel)
                .run(3, 1)
                .unwrap()
        };
        let a = run(true);
        let b = run(false);
        assert_eq!(a.energy_trace, b.energy_trace);
        assert_eq!(a.average_energy_trace, b.average_energy_trace);
        assert_eq!(a.final_states, b.final_states);
    }

    #[test]
    fn test_observer_sees_readout_per_step() {
        let h = triangle();
        let schedule = short_schedule();
        let mut metrics = MetricsObserver::new();
        let result = SqaAnnealer::new(&h, &schedule, 4, 2)
            .unwrap()
            .with_seed(3)
            .run_with_cancel(2, 1, Some(&mut metrics), None)
            .unwrap();
        assert_eq!(metrics.energy_trace(), result.energy_trace.as_slice());
        assert_eq!(metrics.magnetization_trace().len(), 3);
    }

    #[test]
    fn test_cancellation() {
        let h = triangle();
        let schedule = short_schedule();
        let cancel = Arc::new(AtomicBool::new(true));
        let result = SqaAnnealer::new(&h, &schedule, 4, 1)
            .unwrap()
            .with_seed(3)
            .run_with_cancel(2, 1, None, Some(cancel))
            .unwrap();
        assert!(result.cancelled);
        assert!(result.energy_trace.is_empty());
        assert!((h.energy(result.best_state.spins()) - result.best_energy).abs() < 1e-9);
    }

    #[test]
    fn test_numerical_failure_keeps_partial_trace() {
        // One replica of one slice, no worldline sweeps: two evaluations
        // per step, so steps 0..3 complete.
        let h = FailsAfter {
            calls: AtomicUsize::new(0),
            limit: 6,
        };
        let schedule = SqaSchedule::linear(0.2, 1.0, 2.0, 0.1, 5).unwrap();
        let err = SqaAnnealer::new(&h, &schedule, 1, 1)
            .unwrap()
            .with_seed(5)
            .with_parallel(false)
            .run(1, 0);
        match err {
            Err(AnnealError::Numerical { step, value, trace }) => {
                assert_eq!(step, 3);
                assert!(value.is_nan());
                assert_eq!(trace.len(), 3);
            }
            other => panic!("expected numerical error, got {other:?}"),
        }
    }
}
