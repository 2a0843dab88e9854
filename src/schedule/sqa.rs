//! Paired (beta, gamma) schedules for simulated quantum annealing.

use super::anneal::linear_values;
use crate::error::{AnnealError, Result};

/// Index-aligned inverse temperatures and transverse-field strengths.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SqaSchedule {
    betas: Vec<f64>,
    gammas: Vec<f64>,
}

impl SqaSchedule {
    /// Pairs `betas[k]` with `gammas[k]`.
    ///
    /// # Errors
    ///
    /// [`AnnealError::Configuration`] if the vectors are empty, differ in
    /// length, or contain a non-finite value.
    pub fn from_vectors(betas: Vec<f64>, gammas: Vec<f64>) -> Result<Self> {
        if betas.len() != gammas.len() {
            return Err(AnnealError::config(format!(
                "SQA schedule has {} betas but {} gammas",
                betas.len(),
                gammas.len()
            )));
        }
        if betas.is_empty() {
            return Err(AnnealError::config("SQA schedule must have at least one step"));
        }
        for (name, values) in [("beta", &betas), ("gamma", &gammas)] {
            if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                return Err(AnnealError::config(format!(
                    "{name}[{i}] is {}, expected a finite number",
                    values[i]
                )));
            }
        }
        Ok(Self { betas, gammas })
    }

    /// Linear ramps of beta and gamma over `steps` steps.
    ///
    /// Gamma typically ramps down toward a small terminal value.
    pub fn linear(
        beta_start: f64,
        beta_end: f64,
        gamma_start: f64,
        gamma_end: f64,
        steps: usize,
    ) -> Result<Self> {
        Self::from_vectors(
            linear_values(beta_start, beta_end, steps)?,
            linear_values(gamma_start, gamma_end, steps)?,
        )
    }

    pub fn betas(&self) -> &[f64] {
        &self.betas
    }

    pub fn gammas(&self) -> &[f64] {
        &self.gammas
    }

    /// Number of (beta, gamma) pairs.
    pub fn len(&self) -> usize {
        self.betas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.betas.is_empty()
    }

    /// The (beta, gamma) pair at `step`.
    pub fn at(&self, step: usize) -> (f64, f64) {
        (self.betas[step], self.gammas[step])
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.betas.iter().copied().zip(self.gammas.iter().copied())
    }
}
