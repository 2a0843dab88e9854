//! Independent multi-replica annealing.
//!
//! K copies of the classical annealer run over one shared Hamiltonian and
//! schedule, each with its own state and random stream. Replicas never
//! interact; the result aggregates per-replica traces and a global best.

mod runner;

pub use runner::{MultiAnnealResult, ReplicaAnnealer, ReplicaResult};
