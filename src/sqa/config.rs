//! Simulated quantum annealing configuration.

/// Collective update applied to one site's worldline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldlineMove {
    /// Flip the site in every slice. Inter-slice bonds are unchanged, so
    /// the energy change is the sum of the per-slice classical changes.
    #[default]
    Global,

    /// Flip the site in a random contiguous run of slices (cyclic, length
    /// `1..=P`). The energy change includes the two bonds at the run's ends.
    Segment,
}

/// Configuration for the [`SqaAnnealer`](super::SqaAnnealer).
///
/// # Examples
///
/// ```
/// use u_anneal::sqa::{SqaConfig, WorldlineMove};
///
/// let config = SqaConfig::default()
///     .with_seed(42)
///     .with_worldline_move(WorldlineMove::Segment);
/// assert!(config.parallel);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SqaConfig {
    /// Worldline update policy.
    pub worldline_move: WorldlineMove,

    /// Random seed for reproducibility. `None` draws a fresh seed per run.
    pub seed: Option<u64>,

    /// Whether outer replicas run on the rayon pool.
    pub parallel: bool,
}

impl Default for SqaConfig {
    fn default() -> Self {
        Self {
            worldline_move: WorldlineMove::Global,
            seed: None,
            parallel: true,
        }
    }
}

impl SqaConfig {
    pub fn with_worldline_move(mut self, worldline_move: WorldlineMove) -> Self {
        self.worldline_move = worldline_move;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SqaConfig::default();
        assert_eq!(config.worldline_move, WorldlineMove::Global);
        assert!(config.seed.is_none());
        assert!(config.parallel);
    }
}
