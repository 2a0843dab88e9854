//! Property-based tests for Hamiltonian energy bookkeeping.
//!
//! For every encoding, the single-flip delta must equal the difference of
//! full energies, and the QUBO's Ising form must reproduce its objective.

use proptest::prelude::*;
use u_anneal::hamiltonian::{spins_to_bits, DenseIsing, Hamiltonian, Qubo, SparseEdge, SparseIsing};

/// Symmetric coupling matrix with zero diagonal plus matching fields.
fn arb_dense() -> impl Strategy<Value = DenseIsing> {
    (1usize..=8).prop_flat_map(|n| {
        (
            prop::collection::vec(-2.0f64..2.0, n),
            prop::collection::vec(-2.0f64..2.0, n * n),
            -5.0f64..5.0,
        )
            .prop_map(move |(h, raw, c)| {
                let mut j = vec![0.0; n * n];
                for a in 0..n {
                    for b in a + 1..n {
                        j[a * n + b] = raw[a * n + b];
                        j[b * n + a] = raw[a * n + b];
                    }
                }
                DenseIsing::from_flat(h, j, n).unwrap().with_constant(c)
            })
    })
}

/// Random edge subset of the complete graph.
fn arb_sparse() -> impl Strategy<Value = SparseIsing> {
    (2usize..=10).prop_flat_map(|n| {
        let pairs = n * (n - 1) / 2;
        (
            prop::collection::vec(-2.0f64..2.0, n),
            prop::collection::vec(proptest::option::of(-2.0f64..2.0), pairs),
        )
            .prop_map(move |(h, weights)| {
                let mut edges = Vec::new();
                let mut k = 0;
                for a in 0..n {
                    for b in a + 1..n {
                        if let Some(w) = weights[k] {
                            edges.push(SparseEdge::new(a, b, w));
                        }
                        k += 1;
                    }
                }
                SparseIsing::new(h, edges).unwrap()
            })
    })
}

/// Arbitrary (not necessarily symmetric) QUBO matrix with an offset.
fn arb_qubo() -> impl Strategy<Value = Qubo> {
    (1usize..=6).prop_flat_map(|n| {
        (prop::collection::vec(-3.0f64..3.0, n * n), -2.0f64..2.0)
            .prop_map(move |(q, offset)| Qubo::from_flat(q, n).unwrap().with_offset(offset))
    })
}

fn arb_spins(n: usize) -> impl Strategy<Value = Vec<i8>> {
    prop::collection::vec(prop_oneof![Just(1i8), Just(-1i8)], n)
}

fn check_delta<H: Hamiltonian>(h: &H, spins: &[i8]) -> Result<(), TestCaseError> {
    let before = h.energy(spins);
    for i in 0..spins.len() {
        let mut flipped = spins.to_vec();
        flipped[i] = -flipped[i];
        let expected = h.energy(&flipped) - before;
        let delta = h.delta_energy(spins, i);
        prop_assert!(
            (delta - expected).abs() < 1e-9,
            "site {}: delta {} vs recomputed {}",
            i,
            delta,
            expected
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn dense_delta_matches_recomputation(
        (h, spins) in arb_dense().prop_flat_map(|h| {
            let n = h.num_spins();
            (Just(h), arb_spins(n))
        })
    ) {
        check_delta(&h, &spins)?;
    }

    #[test]
    fn sparse_delta_matches_recomputation(
        (h, spins) in arb_sparse().prop_flat_map(|h| {
            let n = h.num_spins();
            (Just(h), arb_spins(n))
        })
    ) {
        check_delta(&h, &spins)?;
    }

    #[test]
    fn qubo_energy_matches_objective(
        (q, spins) in arb_qubo().prop_flat_map(|q| {
            let n = q.num_spins();
            (Just(q), arb_spins(n))
        })
    ) {
        let bits = spins_to_bits(&spins);
        prop_assert!((q.energy(&spins) - q.objective(&bits)).abs() < 1e-9);
        check_delta(&q, &spins)?;
    }
}
