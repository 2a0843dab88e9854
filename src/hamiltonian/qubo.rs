//! Quadratic unconstrained binary optimization.

use super::dense::DenseIsing;
use super::types::Hamiltonian;
use crate::error::{AnnealError, Result};

/// QUBO objective `f(x) = offset + Σ_{i,j} Q_ij x_i x_j` over `x ∈ {0,1}^n`.
///
/// `Q` need not be symmetric. The equivalent Ising model under
/// `x = (s + 1) / 2` is built once at construction; as a [`Hamiltonian`],
/// a `Qubo` evaluates spin configurations through it, so the energy of
/// `s` equals `f(x)` exactly (the affine constant is kept in the Ising
/// offset).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Qubo {
    q: Vec<f64>,
    n: usize,
    offset: f64,
    ising: DenseIsing,
}

impl Qubo {
    /// Builds a QUBO from coefficient rows.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(AnnealError::config(format!(
                "QUBO matrix is not square: row {row} has {} entries, expected {n}",
                r.len()
            )));
        }
        Self::from_flat(rows.into_iter().flatten().collect(), n)
    }

    /// Builds a QUBO from a row-major `n × n` buffer.
    pub fn from_flat(q: Vec<f64>, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(AnnealError::config("QUBO must have at least one variable"));
        }
        if q.len() != n * n {
            return Err(AnnealError::config(format!(
                "QUBO buffer has {} entries, expected {}",
                q.len(),
                n * n
            )));
        }
        if let Some(k) = q.iter().position(|v| !v.is_finite()) {
            return Err(AnnealError::validation(format!(
                "QUBO coefficient Q[{}][{}] is not finite",
                k / n,
                k % n
            )));
        }
        let ising = ising_from_qubo(&q, n, 0.0)?;
        Ok(Self {
            q,
            n,
            offset: 0.0,
            ising,
        })
    }

    /// Builds the QUBO equivalent of an Ising model under `s = 2x - 1`.
    pub fn from_ising(model: &DenseIsing) -> Result<Self> {
        let n = model.num_spins();
        let h = model.fields();
        let mut q = vec![0.0; n * n];
        let mut offset = model.constant() - h.iter().sum::<f64>();
        for i in 0..n {
            let mut row_sum = 0.0;
            for j in 0..n {
                if i == j {
                    continue;
                }
                let jij = model.coupling(i, j);
                row_sum += jij;
                if i < j {
                    q[i * n + j] = 4.0 * jij;
                    offset += jij;
                }
            }
            q[i * n + i] = 2.0 * h[i] - 2.0 * row_sum;
        }
        Ok(Self::from_flat(q, n)?.with_offset(offset))
    }

    /// Sets the constant objective offset.
    pub fn with_offset(mut self, offset: f64) -> Self {
        let constant = self.ising.constant() - self.offset + offset;
        self.ising = self.ising.with_constant(constant);
        self.offset = offset;
        self
    }

    /// Row-major coefficient matrix.
    pub fn matrix(&self) -> &[f64] {
        &self.q
    }

    pub fn num_variables(&self) -> usize {
        self.n
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Evaluates the objective on a 0/1 assignment.
    pub fn objective(&self, bits: &[u8]) -> f64 {
        debug_assert_eq!(bits.len(), self.n);
        let mut total = self.offset;
        for (i, &xi) in bits.iter().enumerate() {
            if xi == 0 {
                continue;
            }
            let row = &self.q[i * self.n..(i + 1) * self.n];
            total += row
                .iter()
                .zip(bits)
                .filter(|(_, &xj)| xj != 0)
                .map(|(&qij, _)| qij)
                .sum::<f64>();
        }
        total
    }

    /// The equivalent Ising model.
    pub fn to_ising(&self) -> DenseIsing {
        self.ising.clone()
    }

    pub fn ising(&self) -> &DenseIsing {
        &self.ising
    }
}

impl Hamiltonian for Qubo {
    fn num_spins(&self) -> usize {
        self.n
    }

    fn energy(&self, spins: &[i8]) -> f64 {
        self.ising.energy(spins)
    }

    fn delta_energy(&self, spins: &[i8], flip: usize) -> f64 {
        self.ising.delta_energy(spins, flip)
    }
}

/// Maps spins to bits via `x = (s + 1) / 2`.
pub fn spins_to_bits(spins: &[i8]) -> Vec<u8> {
    spins.iter().map(|&s| u8::from(s > 0)).collect()
}

/// Maps bits to spins via `s = 2x - 1`.
pub fn bits_to_spins(bits: &[u8]) -> Vec<i8> {
    bits.iter().map(|&x| if x != 0 { 1 } else { -1 }).collect()
}

// With W = (Q + Qᵀ)/2 and x = (s + 1)/2:
//   J_ij = W_ij / 2            (i < j)
//   h_i  = Σ_j W_ij / 2
//   c    = Σ_{i≠j} W_ij / 4 + Σ_i W_ii / 2 + offset
fn ising_from_qubo(q: &[f64], n: usize, offset: f64) -> Result<DenseIsing> {
    let w = |i: usize, j: usize| 0.5 * (q[i * n + j] + q[j * n + i]);
    let mut h = vec![0.0; n];
    let mut j = vec![0.0; n * n];
    let mut c = offset;
    for r in 0..n {
        for col in 0..n {
            let wij = w(r, col);
            h[r] += 0.5 * wij;
            if r == col {
                c += 0.5 * wij;
            } else {
                j[r * n + col] = 0.5 * wij;
                c += 0.25 * wij;
            }
        }
    }
    Ok(DenseIsing::from_flat(h, j, n)?.with_constant(c))
}
