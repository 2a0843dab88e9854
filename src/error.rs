//! Error types for the annealing engine.

use thiserror::Error;

/// Errors produced while building Hamiltonians and schedules or while
/// running an annealer.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum AnnealError {
    /// Structurally invalid input: mismatched dimensions, zero replicas,
    /// schedule length different from the requested step count, ...
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A Hamiltonian's numeric invariants are violated (asymmetric couplings,
    /// nonzero diagonal, non-finite coefficients, malformed edges).
    #[error("validation error: {0}")]
    Validation(String),

    /// An energy became non-finite during a run.
    ///
    /// `trace` holds the energy trace recorded before the failing step.
    #[error("non-finite energy {value} at step {step}")]
    Numerical {
        /// Step at which the non-finite energy was observed.
        step: usize,
        /// The offending energy value.
        value: f64,
        /// Trace entries recorded for steps `0..step`.
        trace: Vec<f64>,
    },
}

impl AnnealError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        AnnealError::Configuration(msg.into())
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        AnnealError::Validation(msg.into())
    }
}

/// Result type for annealing operations.
pub type Result<T> = std::result::Result<T, AnnealError>;
