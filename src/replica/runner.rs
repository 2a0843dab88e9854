//! Independent multi-replica annealing.

use crate::error::{AnnealError, Result};
use crate::hamiltonian::Hamiltonian;
use crate::observer::MetricsObserver;
use crate::pool::map_indexed;
use crate::random::{resolve_seed, stream_rng};
use crate::sa::{AnnealConfig, AnnealResult, Annealer};
use crate::schedule::AnnealSchedule;
use crate::spin::SpinState;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::debug;

/// Outcome of one replica.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplicaResult {
    pub best_state: SpinState,
    pub best_energy: f64,
    pub energy_trace: Vec<f64>,
    pub magnetization_trace: Vec<f64>,
}

/// Aggregated outcome of a multi-replica run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiAnnealResult {
    /// Per-replica outcomes, in replica order.
    pub replicas: Vec<ReplicaResult>,

    /// Lowest-energy state over all replicas.
    pub global_best_state: SpinState,

    /// Energy of `global_best_state`.
    pub global_best_energy: f64,

    /// Elementwise mean of the per-replica energy traces.
    pub average_energy_trace: Vec<f64>,

    /// Elementwise mean of the per-replica magnetization traces.
    pub average_magnetization_trace: Vec<f64>,

    /// Whether the run was cancelled before the schedule completed.
    pub cancelled: bool,
}

/// Runs K independent annealers over one shared Hamiltonian and schedule.
///
/// Replica `r` draws from its own random stream derived from the base seed,
/// so the result is the same whether replicas run on the worker pool or
/// one after another.
///
/// # Examples
///
/// ```
/// use u_anneal::hamiltonian::SparseIsing;
/// use u_anneal::replica::ReplicaAnnealer;
/// use u_anneal::schedule::AnnealSchedule;
///
/// let h = SparseIsing::new(vec![0.0; 4], [(0, 1, 0.5), (2, 3, -0.4)]).unwrap();
/// let schedule = AnnealSchedule::linear(0.1, 2.0, 30).unwrap();
/// let result = ReplicaAnnealer::new(&h, &schedule, 4)
///     .unwrap()
///     .with_seed(7)
///     .run(30)
///     .unwrap();
/// assert_eq!(result.replicas.len(), 4);
/// assert_eq!(result.average_energy_trace.len(), 30);
/// ```
pub struct ReplicaAnnealer<'a, H: Hamiltonian + ?Sized> {
    hamiltonian: &'a H,
    schedule: &'a AnnealSchedule,
    replicas: usize,
    config: AnnealConfig,
    parallel: bool,
}

impl<'a, H: Hamiltonian + ?Sized> ReplicaAnnealer<'a, H> {
    /// Fails with [`AnnealError::Configuration`] if `replicas < 1`.
    pub fn new(hamiltonian: &'a H, schedule: &'a AnnealSchedule, replicas: usize) -> Result<Self> {
        if replicas < 1 {
            return Err(AnnealError::config("replicas must be at least 1"));
        }
        Ok(Self {
            hamiltonian,
            schedule,
            replicas,
            config: AnnealConfig::default(),
            parallel: true,
        })
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

    /// Whether replicas run on the rayon pool (default `true`).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Runs every replica over the schedule. `steps` must equal its length.
    pub fn run(&self, steps: usize) -> Result<MultiAnnealResult> {
        self.run_with_cancel(steps, None)
    }

    /// Runs with an optional cancellation token shared by all replicas.
    pub fn run_with_cancel(
        &self,
        steps: usize,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<MultiAnnealResult> {
        self.config.validate()?;
        self.schedule.check_len(steps)?;

        let base_seed = resolve_seed(self.config.seed);
        let cancel = cancel.as_deref();
        debug!(replicas = self.replicas, steps, "starting replica anneal");

        let outcomes = map_indexed(self.replicas, self.parallel, |r| {
            let mut rng = stream_rng(base_seed, r as u64);
            let mut metrics = MetricsObserver::new();
            Annealer::new(self.hamiltonian, self.schedule)
                .with_config(self.config.clone())
                .run_stream(steps, Some(&mut metrics), cancel, &mut rng)
                .map(|result| (result, metrics))
        });
        let outcomes = outcomes.into_iter().collect::<Result<Vec<_>>>()?;

        let result = aggregate(outcomes);
        debug!(
            global_best_energy = result.global_best_energy,
            "replica anneal finished"
        );
        Ok(result)
    }
}

fn aggregate(outcomes: Vec<(AnnealResult, MetricsObserver)>) -> MultiAnnealResult {
    let cancelled = outcomes.iter().any(|(r, _)| r.cancelled);
    let replicas: Vec<ReplicaResult> = outcomes
        .into_iter()
        .map(|(result, metrics)| {
            let (_, magnetization_trace) = metrics.into_traces();
            ReplicaResult {
                best_state: result.best_state,
                best_energy: result.best_energy,
                energy_trace: result.energy_trace,
                magnetization_trace,
            }
        })
        .collect();

    let mut best = &replicas[0];
    for replica in &replicas[1..] {
        if replica.best_energy < best.best_energy {
            best = replica;
        }
    }

    MultiAnnealResult {
        global_best_state: best.best_state.clone(),
        global_best_energy: best.best_energy,
        average_energy_trace: mean_trace(replicas.iter().map(|r| r.energy_trace.as_slice())),
        average_magnetization_trace: mean_trace(
            replicas.iter().map(|r| r.magnetization_trace.as_slice()),
        ),
        replicas,
        cancelled,
    }
}

/// Elementwise mean over traces, truncated to the shortest one.
fn mean_trace<'t>(traces: impl Iterator<Item = &'t [f64]> + Clone) -> Vec<f64> {
    let count = traces.clone().count();
    let len = traces.clone().map(<[f64]>::len).min().unwrap_or(0);
    let mut mean = vec![0.0; len];
    for trace in traces {
        for (acc, &v) in mean.iter_mut().zip(trace) {
            *acc += v;
        }
    }
    if count > 0 {
        for v in &mut mean {
            *v /= count as f64;
        }
    }
    mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamiltonian::DenseIsing;

    fn two_edges() -> DenseIsing {
        let mut j = vec![vec![0.0; 4]; 4];
        j[0][1] = 0.5;
        j[1][0] = 0.5;
        j[2][3] = -0.4;
        j[3][2] = -0.4;
        DenseIsing::new(vec![0.0; 4], j).unwrap()
    }

    #[test]
    fn test_decoupled_edges_global_best() {
        let h = two_edges();
        let schedule = AnnealSchedule::linear(0.1, 2.0, 30).unwrap();
        let result = ReplicaAnnealer::new(&h, &schedule, 4)
            .unwrap()
            .with_seed(123)
            .with_sweeps_per_step(10)
            .run(30)
            .unwrap();
        assert!((result.global_best_energy - (-0.9)).abs() < 1e-9);
        assert!((h.energy(result.global_best_state.spins()) + 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_trace_shapes() {
        let h = two_edges();
        let schedule = AnnealSchedule::linear(0.2, 1.0, 4).unwrap();
        let result = ReplicaAnnealer::new(&h, &schedule, 3)
            .unwrap()
            .with_seed(5)
            .run(4)
            .unwrap();
        assert_eq!(result.replicas.len(), 3);
        assert_eq!(result.average_energy_trace.len(), 4);
        assert_eq!(result.average_magnetization_trace.len(), 4);
        for t in 0..4 {
            let mean: f64 = result.replicas.iter().map(|r| r.energy_trace[t]).sum::<f64>() / 3.0;
            assert!((result.average_energy_trace[t] - mean).abs() < 1e-12);
        }
        let min = result
            .replicas
            .iter()
            .map(|r| r.best_energy)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.global_best_energy, min);
    }

    #[test]
    fn test_zero_replicas_rejected() {
        let h = two_edges();
        let schedule = AnnealSchedule::linear(0.2, 1.0, 4).unwrap();
        assert!(matches!(
            ReplicaAnnealer::new(&h, &schedule, 0),
            Err(AnnealError::Configuration(_))
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let h = two_edges();
        let schedule = AnnealSchedule::linear(0.1, 2.0, 10).unwrap();
        let run = |parallel| {
            ReplicaAnnealer::new(&h, &schedule, 4)
                .unwrap()
                .with_seed(77)
                .with_parallel(parallel)
                .run(10)
                .unwrap()
        };
        let a = run(true);
        let b = run(false);
        assert_eq!(a.average_energy_trace, b.average_energy_trace);
        for (x, y) in a.replicas.iter().zip(&b.replicas) {
            assert_eq!(x.energy_trace, y.energy_trace);
        }
    }

    #[test]
    fn test_mean_trace() {
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 4.0];
        let traces = [&a[..], &b[..]];
        assert_eq!(mean_trace(traces.iter().copied()), vec![2.0, 3.0]);
    }
}
