//! Trotter-slice spin configurations.

use crate::error::{AnnealError, Result};
use crate::hamiltonian::Hamiltonian;
use crate::spin::{random_spins, validate_spins, SpinState};
use rand::Rng;

/// P classical copies of an n-spin system arranged in a ring along
/// imaginary time, with one cached classical energy per slice.
///
/// Slice `p` is adjacent to `p - 1` and `p + 1` modulo P.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrotterState {
    spins: Vec<i8>,
    energies: Vec<f64>,
    slices: usize,
    num_spins: usize,
}

impl TrotterState {
    /// Builds a state from one spin vector per slice.
    ///
    /// Fails with [`AnnealError::Configuration`] if there are no slices, a
    /// slice length differs from the Hamiltonian, or a spin is not ±1.
    pub fn new<H: Hamiltonian + ?Sized>(slices: Vec<Vec<i8>>, hamiltonian: &H) -> Result<Self> {
        if slices.is_empty() {
            return Err(AnnealError::config("trotter state needs at least one slice"));
        }
        let n = hamiltonian.num_spins();
        let mut spins = Vec::with_capacity(slices.len() * n);
        let mut energies = Vec::with_capacity(slices.len());
        for (p, slice) in slices.iter().enumerate() {
            if slice.len() != n {
                return Err(AnnealError::config(format!(
                    "slice {p} has {} spins but the Hamiltonian has {n}",
                    slice.len()
                )));
            }
            validate_spins(slice)?;
            energies.push(hamiltonian.energy(slice));
            spins.extend_from_slice(slice);
        }
        Ok(Self {
            spins,
            energies,
            slices: slices.len(),
            num_spins: n,
        })
    }

    /// Independent uniformly random configurations in every slice.
    pub(crate) fn random<H: Hamiltonian + ?Sized, R: Rng>(
        hamiltonian: &H,
        slices: usize,
        rng: &mut R,
    ) -> Self {
        let n = hamiltonian.num_spins();
        let spins = random_spins(slices * n, rng);
        let energies = (0..slices)
            .map(|p| hamiltonian.energy(&spins[p * n..(p + 1) * n]))
            .collect();
        Self {
            spins,
            energies,
            slices,
            num_spins: n,
        }
    }

    /// Number of Trotter slices P.
    pub fn slices(&self) -> usize {
        self.slices
    }

    /// Number of spins per slice.
    pub fn num_spins(&self) -> usize {
        self.num_spins
    }

    /// Spins of slice `p`.
    pub fn slice(&self, p: usize) -> &[i8] {
        let start = p * self.num_spins;
        &self.spins[start..start + self.num_spins]
    }

    /// Cached classical energy of slice `p`.
    pub fn slice_energy(&self, p: usize) -> f64 {
        self.energies[p]
    }

    pub fn slice_energies(&self) -> &[f64] {
        &self.energies
    }

    /// Slice `p` as a standalone classical state.
    pub fn slice_state(&self, p: usize) -> SpinState {
        SpinState::from_parts(self.slice(p).to_vec(), self.energies[p])
    }

    /// Mean classical energy over slices.
    pub fn average_energy(&self) -> f64 {
        self.energies.iter().sum::<f64>() / self.slices as f64
    }

    /// Per-site majority over slices. Ties take slice 0's value.
    pub fn majority_vote(&self) -> Vec<i8> {
        (0..self.num_spins)
            .map(|i| {
                let sum: i32 = (0..self.slices).map(|p| self.spin(p, i) as i32).sum();
                match sum.signum() {
                    0 => self.spin(0, i),
                    s => s as i8,
                }
            })
            .collect()
    }

    pub(crate) fn spin(&self, p: usize, i: usize) -> i8 {
        self.spins[p * self.num_spins + i]
    }

    /// Flips site `i` in slice `p` and shifts that slice's energy by `delta`.
    pub(crate) fn flip(&mut self, p: usize, i: usize, delta: f64) {
        let idx = p * self.num_spins + i;
        self.spins[idx] = -self.spins[idx];
        self.energies[p] += delta;
    }
}
