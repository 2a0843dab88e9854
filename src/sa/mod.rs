//! Classical simulated annealing over spin configurations.
//!
//! One state is driven through a schedule of inverse temperatures with
//! single-spin Metropolis sweeps. Energies are tracked incrementally: each
//! accepted flip shifts the cached energy by the Hamiltonian's
//! `delta_energy`, so no sweep recomputes the full sum.
//!
//! # References
//!
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod config;
mod metropolis;
mod runner;

pub use config::AnnealConfig;
pub use metropolis::acceptance_probability;
pub use runner::{AnnealResult, Annealer};

pub(crate) use metropolis::{accept_log, sweep, NonFinite};
pub(crate) use runner::non_finite;
