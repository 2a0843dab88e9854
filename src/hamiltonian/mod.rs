//! Ising and QUBO Hamiltonians.
//!
//! Three encodings share the [`Hamiltonian`] trait:
//!
//! - [`DenseIsing`]: full coupling matrix, O(n) single-flip delta.
//! - [`SparseIsing`]: edge list with adjacency, O(degree) single-flip delta.
//! - [`Qubo`]: binary objective, evaluated through its equivalent Ising model.

mod dense;
mod qubo;
mod sparse;
mod types;

pub use dense::DenseIsing;
pub use qubo::{bits_to_spins, spins_to_bits, Qubo};
pub use sparse::{SparseEdge, SparseIsing};
pub use types::Hamiltonian;
