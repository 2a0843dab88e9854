//! Stochastic annealing engine for Ising and QUBO objectives.
//!
//! Provides Monte Carlo optimizers over spin configurations `s ∈ {-1,+1}^n`:
//!
//! - **Simulated Annealing (SA)**: one state driven through a schedule of
//!   inverse temperatures with single-spin Metropolis sweeps.
//! - **Replica annealing**: K independent SA runs sharing one Hamiltonian,
//!   with aggregated traces and a global best.
//! - **Parallel Tempering (PT)**: replicas pinned to a ladder of fixed
//!   temperatures, exchanging configurations between neighbours.
//! - **Simulated Quantum Annealing (SQA)**: path-integral Monte Carlo over
//!   Trotter slices, annealing a transverse field toward zero.
//!
//! Problems are expressed through the [`Hamiltonian`](hamiltonian::Hamiltonian)
//! trait, implemented by dense and sparse Ising models and by QUBO matrices.
//!
//! # Architecture
//!
//! Hamiltonians and schedules are built once and borrowed immutably by every
//! annealer. Each replica owns its state, cached energy and random stream;
//! streams are derived from one base seed, so a seeded run gives the same
//! result whether replicas execute on the rayon pool or sequentially.
//!
//! # Quick start
//!
//! ```
//! use u_anneal::hamiltonian::{Hamiltonian, Qubo};
//! use u_anneal::sa::Annealer;
//! use u_anneal::schedule::AnnealSchedule;
//!
//! // Minimize x0 + x1 - 3·x0·x1 over bits: optimum x = (1, 1), value -1.
//! let qubo = Qubo::new(vec![vec![1.0, -1.5], vec![-1.5, 1.0]]).unwrap();
//! let schedule = AnnealSchedule::linear(0.1, 5.0, 50).unwrap();
//! let result = Annealer::new(&qubo, &schedule)
//!     .with_seed(7)
//!     .run(50, None)
//!     .unwrap();
//! assert!((result.best_energy - (-1.0)).abs() < 1e-9);
//! assert!((qubo.energy(result.best_state.spins()) - result.best_energy).abs() < 1e-9);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): run replicas on the rayon thread pool.
//! - `serde`: derive `Serialize`/`Deserialize` for states, schedules,
//!   configurations and results.

pub mod error;
pub mod hamiltonian;
pub mod observer;
pub mod random;
pub mod replica;
pub mod sa;
pub mod schedule;
pub mod spin;
pub mod sqa;
pub mod tempering;
pub mod version;

mod pool;

pub use error::{AnnealError, Result};
pub use spin::SpinState;
pub use version::{version_major, version_minor, version_patch, version_string};
