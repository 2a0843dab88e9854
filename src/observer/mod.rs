//! Per-step run diagnostics.
//!
//! An [`Observer`] is pushed one update per completed annealing step. It
//! owns no engine state; annealers only hand it read-only views.

mod metrics;

pub use metrics::MetricsObserver;

use crate::spin::SpinState;

/// Receives per-step diagnostics from an annealer.
pub trait Observer {
    /// Called once before the first step with the number of steps the run
    /// will perform, so implementations can size their buffers.
    fn on_start(&mut self, _steps: usize) {}

    /// Called after every completed step, in run order.
    fn on_step(&mut self, step: usize, state: &SpinState, energy: f64);
}

impl<F> Observer for F
where
    F: FnMut(usize, &SpinState, f64),
{
    fn on_step(&mut self, step: usize, state: &SpinState, energy: f64) {
        self(step, state, energy)
    }
}
