//! Energy and magnetization traces.

use super::Observer;
use crate::spin::SpinState;

/// Records the energy and magnetization reported at every step.
///
/// Buffers are reserved for the full run in [`Observer::on_start`] and
/// cleared at the start of each run.
///
/// # Examples
///
/// ```
/// use u_anneal::hamiltonian::DenseIsing;
/// use u_anneal::observer::MetricsObserver;
/// use u_anneal::sa::Annealer;
/// use u_anneal::schedule::AnnealSchedule;
///
/// let h = DenseIsing::new(vec![0.0, 0.0], vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
/// let schedule = AnnealSchedule::linear(0.1, 2.0, 10).unwrap();
/// let mut metrics = MetricsObserver::new();
/// Annealer::new(&h, &schedule)
///     .with_seed(1)
///     .run(10, Some(&mut metrics))
///     .unwrap();
/// assert_eq!(metrics.energy_trace().len(), 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    energy_trace: Vec<f64>,
    magnetization_trace: Vec<f64>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn energy_trace(&self) -> &[f64] {
        &self.energy_trace
    }

    pub fn magnetization_trace(&self) -> &[f64] {
        &self.magnetization_trace
    }

    pub fn clear(&mut self) {
        self.energy_trace.clear();
        self.magnetization_trace.clear();
    }

    /// Consumes the observer, returning `(energy_trace, magnetization_trace)`.
    pub fn into_traces(self) -> (Vec<f64>, Vec<f64>) {
        (self.energy_trace, self.magnetization_trace)
    }
}

impl Observer for MetricsObserver {
    fn on_start(&mut self, steps: usize) {
        self.clear();
        self.energy_trace.reserve_exact(steps);
        self.magnetization_trace.reserve_exact(steps);
    }

    fn on_step(&mut self, _step: usize, state: &SpinState, energy: f64) {
        self.energy_trace.push(energy);
        self.magnetization_trace.push(state.magnetization());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_traces() {
        let mut obs = MetricsObserver::new();
        obs.on_start(2);
        obs.on_step(0, &SpinState::from_parts(vec![1, 1, -1, 1], -1.0), -1.0);
        obs.on_step(1, &SpinState::from_parts(vec![1, 1, 1, 1], -2.0), -2.0);
        assert_eq!(obs.energy_trace(), &[-1.0, -2.0]);
        assert_eq!(obs.magnetization_trace(), &[0.5, 1.0]);
    }

    #[test]
    fn test_on_start_clears() {
        let mut obs = MetricsObserver::new();
        obs.on_step(0, &SpinState::from_parts(vec![1], 0.0), 0.0);
        obs.on_start(3);
        assert!(obs.energy_trace().is_empty());
        assert!(obs.energy_trace.capacity() >= 3);
    }
}
