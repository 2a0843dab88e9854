//! Simulated quantum annealing by path-integral Monte Carlo.
//!
//! The transverse-field Ising model is mapped through the Suzuki–Trotter
//! decomposition onto P classical copies ("Trotter slices") of the system,
//! coupled ferromagnetically along imaginary time. Annealing gamma toward
//! zero strengthens that coupling until the slices agree and the ring
//! collapses onto low-energy classical configurations.
//!
//! Two move types drive the ring:
//!
//! - **Beta sweeps** flip single spins in one slice, paying the classical
//!   energy change plus the two inter-slice bonds.
//! - **Worldline sweeps** flip one site across many slices at once
//!   ([`WorldlineMove`]), which single flips cannot do once the slices are
//!   tightly bound.
//!
//! # References
//!
//! - Suzuki (1976), "Relationship between d-Dimensional Quantal Spin
//!   Systems and (d+1)-Dimensional Ising Systems"
//! - Martoňák, Santoro & Tosatti (2002), "Quantum annealing by the
//!   path-integral Monte Carlo method: The two-dimensional random Ising model"

mod config;
mod path_integral;
mod runner;
mod state;

pub use config::{SqaConfig, WorldlineMove};
pub use path_integral::trotter_coupling;
pub use runner::{SqaAnnealer, SqaResult};
pub use state::TrotterState;
