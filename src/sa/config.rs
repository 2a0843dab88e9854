//! Classical annealing configuration.

use crate::error::{AnnealError, Result};

/// Configuration for the classical [`Annealer`](super::Annealer).
///
/// # Examples
///
/// ```
/// use u_anneal::sa::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_sweeps_per_step(50)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Metropolis sweeps performed at each schedule value.
    ///
    /// One sweep attempts one flip per site, visiting sites in a fresh
    /// random permutation.
    pub sweeps_per_step: usize,

    /// Random seed for reproducibility. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            sweeps_per_step: 1,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_sweeps_per_step(mut self, n: usize) -> Self {
        self.sweeps_per_step = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.sweeps_per_step == 0 {
            return Err(AnnealError::config("sweeps_per_step must be at least 1"));
        }
        Ok(())
    }
}
