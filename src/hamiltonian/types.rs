//! Core Hamiltonian trait.

/// An energy function over spin configurations in {-1, +1}^n.
///
/// Implementors provide the full energy and the single-flip energy change.
/// `delta_energy` must agree with recomputing `energy` after the flip, and
/// should only touch the terms incident to the flipped site: O(n) for a
/// dense coupling matrix, O(degree) for a sparse edge list.
///
/// Implementations are immutable and shared by reference between replicas,
/// possibly on different worker threads.
///
/// # Examples
///
/// ```
/// use u_anneal::hamiltonian::{DenseIsing, Hamiltonian};
///
/// let h = DenseIsing::new(
///     vec![0.0, 0.0],
///     vec![vec![0.0, -1.0], vec![-1.0, 0.0]],
/// ).unwrap();
/// let spins = [1i8, 1];
/// assert_eq!(h.energy(&spins), -1.0);
/// assert_eq!(h.delta_energy(&spins, 0), 2.0);
/// ```
pub trait Hamiltonian: Send + Sync {
    /// Number of spins the Hamiltonian acts on.
    fn num_spins(&self) -> usize;

    /// Total energy of `spins`.
    fn energy(&self, spins: &[i8]) -> f64;

    /// Energy change caused by flipping spin `flip`.
    ///
    /// Precondition: `flip < self.num_spins()`.
    fn delta_energy(&self, spins: &[i8], flip: usize) -> f64;
}

impl<H: Hamiltonian + ?Sized> Hamiltonian for &H {
    fn num_spins(&self) -> usize {
        (**self).num_spins()
    }

    fn energy(&self, spins: &[i8]) -> f64 {
        (**self).energy(spins)
    }

    fn delta_energy(&self, spins: &[i8], flip: usize) -> f64 {
        (**self).delta_energy(spins, flip)
    }
}
