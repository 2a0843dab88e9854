//! Criterion benchmarks for the annealing engine.
//!
//! Uses synthetic spin glasses (dense Sherrington–Kirkpatrick style, sparse
//! square lattice) with seeded couplings to measure sweep throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_anneal::hamiltonian::{DenseIsing, SparseEdge, SparseIsing};
use u_anneal::replica::ReplicaAnnealer;
use u_anneal::sa::Annealer;
use u_anneal::schedule::{AnnealSchedule, SqaSchedule};
use u_anneal::sqa::SqaAnnealer;
use u_anneal::tempering::ParallelTemperingAnnealer;

// ===========================================================================
// Instances
// ===========================================================================

/// Fully connected ±1/√n couplings.
fn dense_glass(n: usize, seed: u64) -> DenseIsing {
    let mut rng = StdRng::seed_from_u64(seed);
    let scale = 1.0 / (n as f64).sqrt();
    let mut j = vec![vec![0.0; n]; n];
    for a in 0..n {
        for b in a + 1..n {
            let w = if rng.random_bool(0.5) { scale } else { -scale };
            j[a][b] = w;
            j[b][a] = w;
        }
    }
    DenseIsing::new(vec![0.0; n], j).unwrap()
}

/// Periodic L×L lattice with ±1 nearest-neighbour couplings.
fn lattice_glass(side: usize, seed: u64) -> SparseIsing {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = side * side;
    let mut edges = Vec::with_capacity(2 * n);
    for row in 0..side {
        for col in 0..side {
            let site = row * side + col;
            for neighbour in [row * side + (col + 1) % side, ((row + 1) % side) * side + col] {
                let w = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                edges.push(SparseEdge::new(site, neighbour, w));
            }
        }
    }
    SparseIsing::new(vec![0.0; n], edges).unwrap()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_sa_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa_dense");
    group.sample_size(10);

    for &n in &[32usize, 128, 256] {
        let h = dense_glass(n, 1);
        let schedule = AnnealSchedule::linear(0.1, 3.0, 100).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &h, |b, h| {
            b.iter(|| {
                let result = Annealer::new(black_box(h), &schedule)
                    .with_seed(42)
                    .run(100, None);
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_sa_lattice(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa_lattice");
    group.sample_size(10);

    for &side in &[8usize, 16, 32] {
        let h = lattice_glass(side, 2);
        let schedule = AnnealSchedule::linear(0.1, 3.0, 100).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &h, |b, h| {
            b.iter(|| {
                let result = Annealer::new(black_box(h), &schedule)
                    .with_seed(42)
                    .run(100, None);
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_replicas(c: &mut Criterion) {
    let mut group = c.benchmark_group("replica_lattice");
    group.sample_size(10);

    let h = lattice_glass(16, 3);
    let schedule = AnnealSchedule::linear(0.1, 3.0, 50).unwrap();
    for parallel in [false, true] {
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| {
                let result = ReplicaAnnealer::new(&h, &schedule, 8)
                    .unwrap()
                    .with_seed(42)
                    .with_parallel(parallel)
                    .run(50);
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_tempering(c: &mut Criterion) {
    let mut group = c.benchmark_group("tempering_lattice");
    group.sample_size(10);

    let h = lattice_glass(16, 4);
    let betas: Vec<f64> = (0..8).map(|k| 0.2 * 1.35f64.powi(k)).collect();
    group.bench_function("8_slots", |b| {
        b.iter(|| {
            let result = ParallelTemperingAnnealer::new(&h, betas.clone())
                .unwrap()
                .with_seed(42)
                .run(2, 50, 1);
            black_box(result)
        })
    });
    group.finish();
}

fn bench_sqa(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqa_lattice");
    group.sample_size(10);

    let h = lattice_glass(8, 5);
    let schedule = SqaSchedule::linear(1.0, 4.0, 3.0, 0.05, 30).unwrap();
    for &slices in &[4usize, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(slices), &slices, |b, &p| {
            b.iter(|| {
                let result = SqaAnnealer::new(&h, &schedule, p, 2)
                    .unwrap()
                    .with_seed(42)
                    .run(2, 1);
                black_box(result)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_sa_dense,
    bench_sa_lattice,
    bench_replicas,
    bench_tempering,
    bench_sqa
);
criterion_main!(benches);
