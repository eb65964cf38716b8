//! Elimination and solve throughput on dense pseudo-random matrices.
//!
//! Run with: cargo bench --package otc --bench kernel

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use otc::gf2::solve::{kron, solve, vectorize};
use otc::gf2::{in_image, BitMatrix};

/// Deterministic xorshift fill.
fn dense(rows: usize, cols: usize, seed: u64) -> BitMatrix {
    let mut state = seed | 1;
    BitMatrix::from_fn(rows, cols, |_, _| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state & 1 == 1
    })
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    for n in [16usize, 64, 256] {
        let a = dense(n, n, n as u64);
        group.bench_with_input(BenchmarkId::from_parameter(n), &a, |b, a| {
            b.iter(|| black_box(a.rank()));
        });
    }
    group.finish();
}

fn bench_in_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("in_image");
    for n in [16usize, 64, 256] {
        let b_mat = dense(n, n / 2, 7);
        let v = dense(n, 1, 11);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(b_mat, v), |b, (m, v)| {
            b.iter(|| black_box(in_image(m, v)));
        });
    }
    group.finish();
}

fn bench_kronecker_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("kronecker_solve");
    for n in [4usize, 8, 12] {
        let d = dense(n, n, 3);
        let system = kron(&BitMatrix::identity(n), &d).hstack(&kron(&d.transpose(), &BitMatrix::identity(n)));
        let Ok(system) = system else {
            continue;
        };
        let rhs = vectorize(&dense(n, n, 5));
        group.bench_with_input(BenchmarkId::from_parameter(n), &(system, rhs), |b, (a, r)| {
            b.iter(|| black_box(solve(a, r)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rank, bench_in_image, bench_kronecker_solve);
criterion_main!(benches);
