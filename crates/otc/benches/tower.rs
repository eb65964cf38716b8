//! Tower composition and certificate hashing.
//!
//! Run with: cargo bench --package otc --bench tower

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use otc::{run_tower, BitMatrix, DegreeMap, Representatives};

fn permutation(n: usize, shift: usize) -> BitMatrix {
    BitMatrix::from_fn(n, n, |r, c| (c + shift) % n == r)
}

fn moves(n: usize, len: usize) -> Vec<DegreeMap> {
    (0..len)
        .map(|i| {
            DegreeMap::from_iter([(0, permutation(n, i % n)), (1, permutation(n, (i * 3) % n))])
        })
        .collect()
}

fn bench_run_tower(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_tower");
    for n in [8usize, 32] {
        let reps = Representatives {
            k3: 1,
            k2: 0,
            c3_dom: (0..n as i64).map(|i| i % 2).collect(),
            c2_dom: (0..n as i64).map(|i| (i / 2) % 2).collect(),
            ..Representatives::default()
        };
        let seq = moves(n, 64);
        group.bench_with_input(BenchmarkId::from_parameter(n), &seq, |b, seq| {
            b.iter(|| black_box(run_tower(seq, &reps)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_run_tower);
criterion_main!(benches);
