//! Suzuki–Trotter coupling and the slice/worldline update kernels.

use super::config::WorldlineMove;
use super::state::TrotterState;
use crate::hamiltonian::Hamiltonian;
use crate::random::shuffle_sites;
use crate::sa::{accept_log, NonFinite};
use rand::rngs::StdRng;
use rand::Rng;

const MIN_TANH_ARGUMENT: f64 = 1e-12;

/// Ferromagnetic coupling between adjacent Trotter slices,
/// `J_perp = -(1 / (2·beta_eff)) · ln(tanh(gamma·beta / P))` with
/// `beta_eff = beta / P`.
///
/// The `tanh` argument is clamped to at least `1e-12`. A single slice has
/// no neighbours and gets `0.0`; `beta = 0` with several slices gives
/// `+inf`.
///
/// # Examples
///
/// ```
/// use u_anneal::sqa::trotter_coupling;
///
/// assert_eq!(trotter_coupling(1.0, 2.0, 1), 0.0);
/// // Weaker transverse field, stronger binding between slices.
/// assert!(trotter_coupling(1.0, 0.1, 8) > trotter_coupling(1.0, 2.0, 8));
/// ```
pub fn trotter_coupling(beta: f64, gamma: f64, slices: usize) -> f64 {
    if slices <= 1 {
        return 0.0;
    }
    let beta_eff = beta / slices as f64;
    reduced_coupling(beta, gamma, slices) / beta_eff
}

/// `beta_eff · J_perp`, finite for every finite beta and gamma.
pub(crate) fn reduced_coupling(beta: f64, gamma: f64, slices: usize) -> f64 {
    if slices <= 1 {
        return 0.0;
    }
    let x = (gamma * beta / slices as f64).max(MIN_TANH_ARGUMENT);
    -0.5 * x.tanh().ln()
}

/// One outer replica: its Trotter ring plus its own random stream and
/// scratch buffers.
pub(crate) struct Worldlines {
    pub state: TrotterState,
    pub rng: StdRng,
    pub failure: Option<NonFinite>,
    order: Vec<usize>,
    deltas: Vec<f64>,
}

/// Control values for one (beta, gamma) step.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepParams {
    pub beta_eff: f64,
    pub coupling: f64,
    pub sweeps_per_beta: usize,
    pub worldline_sweeps: usize,
    pub worldline_move: WorldlineMove,
}

impl StepParams {
    pub fn new(
        beta: f64,
        gamma: f64,
        slices: usize,
        sweeps_per_beta: usize,
        worldline_sweeps: usize,
        worldline_move: WorldlineMove,
    ) -> Self {
        Self {
            beta_eff: beta / slices as f64,
            coupling: reduced_coupling(beta, gamma, slices),
            sweeps_per_beta,
            worldline_sweeps,
            worldline_move,
        }
    }
}

impl Worldlines {
    pub fn new(state: TrotterState, rng: StdRng) -> Self {
        let order = vec![0; state.num_spins()];
        let deltas = vec![0.0; state.slices()];
        Self {
            state,
            rng,
            failure: None,
            order,
            deltas,
        }
    }

    /// Beta sweeps followed by worldline sweeps. Stops at the first
    /// non-finite energy change and records it in `failure`.
    pub fn anneal_step<H: Hamiltonian + ?Sized>(&mut self, hamiltonian: &H, params: &StepParams) {
        if let Err(e) = self.try_anneal_step(hamiltonian, params) {
            self.failure = Some(e);
        }
    }

    fn try_anneal_step<H: Hamiltonian + ?Sized>(
        &mut self,
        hamiltonian: &H,
        params: &StepParams,
    ) -> Result<(), NonFinite> {
        for _ in 0..params.sweeps_per_beta {
            for p in 0..self.state.slices() {
                self.slice_sweep(hamiltonian, p, params)?;
            }
        }
        for _ in 0..params.worldline_sweeps {
            self.worldline_sweep(hamiltonian, params)?;
        }
        Ok(())
    }

    /// Metropolis sweep over one slice, including its two inter-slice bonds.
    fn slice_sweep<H: Hamiltonian + ?Sized>(
        &mut self,
        hamiltonian: &H,
        p: usize,
        params: &StepParams,
    ) -> Result<(), NonFinite> {
        let slices = self.state.slices();
        let prev = (p + slices - 1) % slices;
        let next = (p + 1) % slices;
        shuffle_sites(&mut self.order, &mut self.rng);
        for &site in &self.order {
            let delta = hamiltonian.delta_energy(self.state.slice(p), site);
            if !delta.is_finite() {
                return Err(NonFinite(delta));
            }
            let s = self.state.spin(p, site) as f64;
            let neighbours = (self.state.spin(prev, site) + self.state.spin(next, site)) as f64;
            let log_ratio = -(params.beta_eff * delta + 2.0 * params.coupling * s * neighbours);
            if accept_log(log_ratio, &mut self.rng) {
                self.state.flip(p, site, delta);
            }
        }
        Ok(())
    }

    /// One worldline move per site, sites in a fresh random order.
    fn worldline_sweep<H: Hamiltonian + ?Sized>(
        &mut self,
        hamiltonian: &H,
        params: &StepParams,
    ) -> Result<(), NonFinite> {
        let slices = self.state.slices();
        shuffle_sites(&mut self.order, &mut self.rng);
        for k in 0..self.order.len() {
            let site = self.order[k];
            let (start, len) = match params.worldline_move {
                WorldlineMove::Global => (0, slices),
                WorldlineMove::Segment => (
                    self.rng.random_range(0..slices),
                    self.rng.random_range(1..=slices),
                ),
            };

            let mut classical = 0.0;
            for offset in 0..len {
                let p = (start + offset) % slices;
                let delta = hamiltonian.delta_energy(self.state.slice(p), site);
                if !delta.is_finite() {
                    return Err(NonFinite(delta));
                }
                self.deltas[p] = delta;
                classical += delta;
            }

            let mut bonds = 0.0;
            if len < slices {
                let first = start;
                let last = (start + len - 1) % slices;
                let before = (start + slices - 1) % slices;
                let after = (last + 1) % slices;
                let s = |p: usize| self.state.spin(p, site) as f64;
                bonds = 2.0 * params.coupling * (s(before) * s(first) + s(last) * s(after));
            }

            let log_ratio = -(params.beta_eff * classical + bonds);
            if accept_log(log_ratio, &mut self.rng) {
                for offset in 0..len {
                    let p = (start + offset) % slices;
                    self.state.flip(p, site, self.deltas[p]);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamiltonian::SparseIsing;
    use crate::random::create_rng;

    fn ring(n: usize) -> SparseIsing {
        let edges: Vec<(usize, usize, f64)> = (0..n).map(|i| (i, (i + 1) % n, -0.7)).collect();
        SparseIsing::new(vec![0.1; n], edges).unwrap()
    }

    fn assert_cached_energies(h: &SparseIsing, state: &TrotterState) {
        for p in 0..state.slices() {
            assert!((state.slice_energy(p) - h.energy(state.slice(p))).abs() < 1e-9);
        }
    }

    #[test]
    fn test_coupling_formula() {
        let (beta, gamma, slices) = (2.0, 0.5, 4);
        let beta_eff = beta / slices as f64;
        let expected = -(1.0 / (2.0 * beta_eff)) * (gamma * beta / slices as f64).tanh().ln();
        assert!((trotter_coupling(beta, gamma, slices) - expected).abs() < 1e-12);
        assert!(trotter_coupling(beta, gamma, slices) > 0.0);
    }

    #[test]
    fn test_coupling_clamped_for_vanishing_field() {
        let c = reduced_coupling(1.0, 0.0, 8);
        assert!(c.is_finite());
        assert!((c - (-0.5 * MIN_TANH_ARGUMENT.tanh().ln())).abs() < 1e-9);
    }

    #[test]
    fn test_single_slice_has_no_coupling() {
        assert_eq!(trotter_coupling(3.0, 1.0, 1), 0.0);
        assert_eq!(reduced_coupling(3.0, 1.0, 1), 0.0);
    }

    #[test]
    fn test_step_keeps_slice_energies_consistent() {
        let h = ring(6);
        for worldline_move in [WorldlineMove::Global, WorldlineMove::Segment] {
            let mut rng = create_rng(17);
            let state = TrotterState::random(&h, 5, &mut rng);
            let mut lines = Worldlines::new(state, rng);
            let params = StepParams::new(1.5, 0.8, 5, 3, 2, worldline_move);
            for _ in 0..10 {
                lines.anneal_step(&h, &params);
                assert!(lines.failure.is_none());
                assert_cached_energies(&h, &lines.state);
            }
        }
    }

    #[test]
    fn test_bound_slices_reach_field_ground_state() {
        // Slices are tightly bound, so single-slice flips against both
        // neighbours are rejected; worldline moves flip whole columns.
        let h = SparseIsing::new(vec![1.0; 4], std::iter::empty::<(usize, usize, f64)>()).unwrap();
        let mut rng = create_rng(5);
        let state = TrotterState::random(&h, 4, &mut rng);
        let mut lines = Worldlines::new(state, rng);
        let params = StepParams::new(8.0, 1e-9, 4, 20, 5, WorldlineMove::Global);
        lines.anneal_step(&h, &params);
        for p in 0..4 {
            assert_eq!(lines.state.slice(p), &[-1, -1, -1, -1]);
        }
    }
}
