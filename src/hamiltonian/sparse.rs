//! Sparse Ising model over an explicit edge list.

use super::types::Hamiltonian;
use crate::error::{AnnealError, Result};
use std::collections::HashSet;

/// A coupling `weight · s_i · s_j` between two distinct sites.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseEdge {
    pub i: usize,
    pub j: usize,
    pub weight: f64,
}

impl SparseEdge {
    pub fn new(i: usize, j: usize, weight: f64) -> Self {
        Self { i, j, weight }
    }
}

impl From<(usize, usize, f64)> for SparseEdge {
    fn from((i, j, weight): (usize, usize, f64)) -> Self {
        Self { i, j, weight }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Neighbor {
    site: usize,
    weight: f64,
}

/// Ising model `E = c + Σ_i h_i s_i + Σ_edges w · s_i · s_j`.
///
/// Each unordered pair appears at most once. Adjacency lists are built at
/// construction so a single-flip delta only visits incident edges.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseIsing {
    h: Vec<f64>,
    edges: Vec<SparseEdge>,
    adjacency: Vec<Vec<Neighbor>>,
    constant: f64,
}

impl SparseIsing {
    /// Builds a model with `h.len()` spins.
    ///
    /// # Errors
    ///
    /// - [`AnnealError::Configuration`] if `h` is empty or an edge index is
    ///   out of range.
    /// - [`AnnealError::Validation`] for self-loops, duplicate pairs (in
    ///   either orientation), or non-finite coefficients.
    pub fn new<E: Into<SparseEdge>>(h: Vec<f64>, edges: impl IntoIterator<Item = E>) -> Result<Self> {
        let n = h.len();
        if n == 0 {
            return Err(AnnealError::config("Hamiltonian must have at least one spin"));
        }
        if let Some(i) = h.iter().position(|v| !v.is_finite()) {
            return Err(AnnealError::validation(format!("field h[{i}] is not finite")));
        }

        let edges: Vec<SparseEdge> = edges.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(edges.len());
        let mut adjacency = vec![Vec::new(); n];
        for edge in &edges {
            if edge.i >= n || edge.j >= n {
                return Err(AnnealError::config(format!(
                    "edge ({}, {}) references a site outside 0..{n}",
                    edge.i, edge.j
                )));
            }
            if edge.i == edge.j {
                return Err(AnnealError::validation(format!("self-loop on site {}", edge.i)));
            }
            if !edge.weight.is_finite() {
                return Err(AnnealError::validation(format!(
                    "edge ({}, {}) has non-finite weight",
                    edge.i, edge.j
                )));
            }
            if !seen.insert((edge.i.min(edge.j), edge.i.max(edge.j))) {
                return Err(AnnealError::validation(format!(
                    "duplicate edge ({}, {})",
                    edge.i, edge.j
                )));
            }
            adjacency[edge.i].push(Neighbor {
                site: edge.j,
                weight: edge.weight,
            });
            adjacency[edge.j].push(Neighbor {
                site: edge.i,
                weight: edge.weight,
            });
        }

        Ok(Self {
            h,
            edges,
            adjacency,
            constant: 0.0,
        })
    }

    /// Sets the constant energy offset.
    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    pub fn fields(&self) -> &[f64] {
        &self.h
    }

    pub fn edges(&self) -> &[SparseEdge] {
        &self.edges
    }

    /// Number of edges incident to `site`.
    pub fn degree(&self, site: usize) -> usize {
        self.adjacency[site].len()
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }
}

impl Hamiltonian for SparseIsing {
    fn num_spins(&self) -> usize {
        self.h.len()
    }

    fn energy(&self, spins: &[i8]) -> f64 {
        debug_assert_eq!(spins.len(), self.h.len());
        let field: f64 = self.h.iter().zip(spins).map(|(&h, &s)| h * s as f64).sum();
        let pairs: f64 = self
            .edges
            .iter()
            .map(|e| e.weight * (spins[e.i] * spins[e.j]) as f64)
            .sum();
        self.constant + field + pairs
    }

    fn delta_energy(&self, spins: &[i8], flip: usize) -> f64 {
        let local = self.h[flip]
            + self.adjacency[flip]
                .iter()
                .map(|nb| nb.weight * spins[nb.site] as f64)
                .sum::<f64>();
        -2.0 * spins[flip] as f64 * local
    }
}
