//! Dense Ising model with a full coupling matrix.

use super::types::Hamiltonian;
use crate::error::{AnnealError, Result};

const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// Ising model `E = c + Σ_i h_i s_i + Σ_{i<j} J_ij s_i s_j` with a dense,
/// symmetric, zero-diagonal coupling matrix stored row-major.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DenseIsing {
    h: Vec<f64>,
    j: Vec<f64>,
    n: usize,
    constant: f64,
}

impl DenseIsing {
    /// Builds a model from fields `h` and coupling rows `j`.
    ///
    /// # Errors
    ///
    /// - [`AnnealError::Configuration`] if `j` is not square or its size
    ///   differs from `h`.
    /// - [`AnnealError::Validation`] if `j` is asymmetric, has a nonzero
    ///   diagonal, or any coefficient is non-finite.
    pub fn new(h: Vec<f64>, j: Vec<Vec<f64>>) -> Result<Self> {
        let n = j.len();
        if let Some((row, r)) = j.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(AnnealError::config(format!(
                "coupling matrix is not square: row {row} has {} entries, expected {n}",
                r.len()
            )));
        }
        let flat = j.into_iter().flatten().collect();
        Self::from_flat(h, flat, n)
    }

    /// Builds a model from a row-major `n × n` coupling buffer.
    pub fn from_flat(h: Vec<f64>, j: Vec<f64>, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(AnnealError::config("Hamiltonian must have at least one spin"));
        }
        if h.len() != n {
            return Err(AnnealError::config(format!(
                "field vector has {} entries, coupling matrix is {n}x{n}",
                h.len()
            )));
        }
        if j.len() != n * n {
            return Err(AnnealError::config(format!(
                "coupling buffer has {} entries, expected {}",
                j.len(),
                n * n
            )));
        }
        if let Some(i) = h.iter().position(|v| !v.is_finite()) {
            return Err(AnnealError::validation(format!("field h[{i}] is not finite")));
        }
        for r in 0..n {
            let diag = j[r * n + r];
            if diag != 0.0 {
                return Err(AnnealError::validation(format!(
                    "coupling diagonal J[{r}][{r}] = {diag}, expected 0"
                )));
            }
            for c in (r + 1)..n {
                let upper = j[r * n + c];
                let lower = j[c * n + r];
                if !upper.is_finite() || !lower.is_finite() {
                    return Err(AnnealError::validation(format!(
                        "coupling J[{r}][{c}] is not finite"
                    )));
                }
                if (upper - lower).abs() > SYMMETRY_TOLERANCE * upper.abs().max(lower.abs()).max(1.0)
                {
                    return Err(AnnealError::validation(format!(
                        "coupling matrix is not symmetric: J[{r}][{c}] = {upper}, J[{c}][{r}] = {lower}"
                    )));
                }
            }
        }
        Ok(Self {
            h,
            j,
            n,
            constant: 0.0,
        })
    }

    /// Sets the constant energy offset.
    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    /// Local fields.
    pub fn fields(&self) -> &[f64] {
        &self.h
    }

    /// Row-major coupling matrix.
    pub fn couplings(&self) -> &[f64] {
        &self.j
    }

    /// Coupling `J_ij`.
    pub fn coupling(&self, i: usize, j: usize) -> f64 {
        self.j[i * self.n + j]
    }

    /// Constant energy offset.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    fn row(&self, i: usize) -> &[f64] {
        &self.j[i * self.n..(i + 1) * self.n]
    }
}

impl Hamiltonian for DenseIsing {
    fn num_spins(&self) -> usize {
        self.n
    }

    fn energy(&self, spins: &[i8]) -> f64 {
        debug_assert_eq!(spins.len(), self.n);
        let mut e = self.constant;
        for (i, &si) in spins.iter().enumerate() {
            let si = si as f64;
            e += self.h[i] * si;
            let row = self.row(i);
            let pair: f64 = spins[i + 1..]
                .iter()
                .zip(&row[i + 1..])
                .map(|(&sj, &jij)| jij * sj as f64)
                .sum();
            e += si * pair;
        }
        e
    }

    fn delta_energy(&self, spins: &[i8], flip: usize) -> f64 {
        debug_assert_eq!(spins.len(), self.n);
        // The diagonal is zero, so the full row dot product is the local field.
        let local: f64 = self.h[flip]
            + self
                .row(flip)
                .iter()
                .zip(spins)
                .map(|(&jij, &sj)| jij * sj as f64)
                .sum::<f64>();
        -2.0 * spins[flip] as f64 * local
    }
}
