//! Metropolis acceptance and the single-spin sweep kernel.

use crate::hamiltonian::Hamiltonian;
use crate::random::shuffle_sites;
use crate::spin::SpinState;
use rand::Rng;

/// A non-finite energy or energy change met during a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NonFinite(pub f64);

/// Probability of accepting a move that changes the energy by `delta` at
/// inverse temperature `beta`: `1` if `delta <= 0`, else `exp(-beta·delta)`.
///
/// Always in `[0, 1]`; a NaN `delta` is never accepted.
pub fn acceptance_probability(beta: f64, delta: f64) -> f64 {
    if delta <= 0.0 {
        1.0
    } else if delta.is_nan() {
        0.0
    } else {
        let p = (-beta * delta).exp();
        if p.is_nan() {
            0.0
        } else {
            p.min(1.0)
        }
    }
}

/// Metropolis criterion in log space: accepts when `log_ratio >= 0`,
/// otherwise with probability `exp(log_ratio)`.
///
/// Certain moves consume no random draw.
pub(crate) fn accept_log<R: Rng>(log_ratio: f64, rng: &mut R) -> bool {
    log_ratio >= 0.0 || rng.random::<f64>() < log_ratio.exp()
}

/// Metropolis test for an energy change `delta` at inverse temperature `beta`.
pub(crate) fn accept<R: Rng>(beta: f64, delta: f64, rng: &mut R) -> bool {
    delta <= 0.0 || rng.random::<f64>() < acceptance_probability(beta, delta)
}

/// One sweep: a trial flip at every site, in a fresh random order.
///
/// `order` is scratch space of length `n`. Returns the number of accepted
/// flips, or the first non-finite energy change encountered. The state's
/// cached energy is shifted by every accepted delta.
pub(crate) fn sweep<H, R>(
    hamiltonian: &H,
    state: &mut SpinState,
    beta: f64,
    order: &mut [usize],
    rng: &mut R,
) -> Result<usize, NonFinite>
where
    H: Hamiltonian + ?Sized,
    R: Rng,
{
    shuffle_sites(order, rng);
    let mut accepted = 0;
    for &site in order.iter() {
        let delta = hamiltonian.delta_energy(state.spins(), site);
        if !delta.is_finite() {
            return Err(NonFinite(delta));
        }
        if accept(beta, delta, rng) {
            state.flip(site, delta);
            accepted += 1;
        }
    }
    Ok(accepted)
}
