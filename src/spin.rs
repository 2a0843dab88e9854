//! Spin configurations and configuration metrics.

use crate::error::{AnnealError, Result};
use crate::hamiltonian::Hamiltonian;
use rand::Rng;

/// A spin configuration with its cached total energy.
///
/// Spins take values in {-1, +1}. The cached energy is kept consistent
/// with every accepted flip made through [`SpinState::flip`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpinState {
    spins: Vec<i8>,
    energy: f64,
}

impl SpinState {
    /// Builds a state from explicit spins, evaluating its energy.
    ///
    /// Fails with [`AnnealError::Configuration`] if the length does not
    /// match the Hamiltonian or a spin is not ±1.
    pub fn new<H: Hamiltonian + ?Sized>(spins: Vec<i8>, hamiltonian: &H) -> Result<Self> {
        if spins.len() != hamiltonian.num_spins() {
            return Err(AnnealError::config(format!(
                "state has {} spins but the Hamiltonian has {}",
                spins.len(),
                hamiltonian.num_spins()
            )));
        }
        validate_spins(&spins)?;
        let energy = hamiltonian.energy(&spins);
        Ok(Self { spins, energy })
    }

    /// Draws a uniformly random configuration.
    pub fn random<H: Hamiltonian + ?Sized, R: Rng>(hamiltonian: &H, rng: &mut R) -> Self {
        let spins = random_spins(hamiltonian.num_spins(), rng);
        let energy = hamiltonian.energy(&spins);
        Self { spins, energy }
    }

    pub(crate) fn from_parts(spins: Vec<i8>, energy: f64) -> Self {
        Self { spins, energy }
    }

    /// The spin values.
    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    /// Number of spins.
    pub fn len(&self) -> usize {
        self.spins.len()
    }

    /// Whether the state holds no spins.
    pub fn is_empty(&self) -> bool {
        self.spins.is_empty()
    }

    /// The cached total energy.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Flips spin `i` and shifts the cached energy by `delta`.
    pub fn flip(&mut self, i: usize, delta: f64) {
        self.spins[i] = -self.spins[i];
        self.energy += delta;
    }

    /// Mean spin value.
    pub fn magnetization(&self) -> f64 {
        magnetization(&self.spins)
    }

    /// Consumes the state, returning the spins.
    pub fn into_spins(self) -> Vec<i8> {
        self.spins
    }
}

/// Checks that every spin is -1 or +1.
pub fn validate_spins(spins: &[i8]) -> Result<()> {
    match spins.iter().position(|&s| s != 1 && s != -1) {
        Some(i) => Err(AnnealError::config(format!(
            "spin {i} has value {}, expected -1 or +1",
            spins[i]
        ))),
        None => Ok(()),
    }
}

pub(crate) fn random_spins<R: Rng>(n: usize, rng: &mut R) -> Vec<i8> {
    (0..n)
        .map(|_| if rng.random_bool(0.5) { 1 } else { -1 })
        .collect()
}

/// Mean spin value, `0.0` for an empty configuration.
pub fn magnetization(spins: &[i8]) -> f64 {
    if spins.is_empty() {
        return 0.0;
    }
    let sum: i64 = spins.iter().map(|&s| s as i64).sum();
    sum as f64 / spins.len() as f64
}

/// Normalized overlap `(1/n) Σ a_i b_i` between two configurations.
pub fn overlap(a: &[i8], b: &[i8]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(AnnealError::config(format!(
            "overlap of configurations with {} and {} spins",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Ok(0.0);
    }
    let sum: i64 = a.iter().zip(b).map(|(&x, &y)| (x * y) as i64).sum();
    Ok(sum as f64 / a.len() as f64)
}
