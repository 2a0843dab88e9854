//! Parallel tempering (replica exchange Monte Carlo).
//!
//! A ladder of inverse temperatures, each holding one configuration. Slots
//! sweep independently; at exchange rounds adjacent slots trade
//! configurations with the probability that keeps the joint distribution
//! over temperatures stationary. Hot slots explore, cold slots refine, and
//! swaps carry good configurations down the ladder.
//!
//! # References
//!
//! - Swendsen & Wang (1986), "Replica Monte Carlo Simulation of Spin-Glasses"
//! - Hukushima & Nemoto (1996), "Exchange Monte Carlo Method and Application
//!   to Spin Glass Simulations"

mod exchange;
mod runner;

pub use exchange::swap_probability;
pub use runner::{ParallelTemperingAnnealer, ParallelTemperingResult};
