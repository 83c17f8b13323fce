use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeSet;
use wabi_set::{OrderedSet, Peekable, difference, intersection, union};

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize, seed: u64) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = seed;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64 % (2 * n as i64));
    }
    keys
}

// ─── Set Benchmarks ─────────────────────────────────────────────────────────

fn bench_set_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_insert_ordered");

    group.bench_function(BenchmarkId::new("OrderedSet", N), |b| {
        b.iter(|| {
            let mut set = OrderedSet::new();
            for i in 0..N as i64 {
                set.insert(i);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for i in 0..N as i64 {
                set.insert(i);
            }
            set
        });
    });

    group.finish();
}

fn bench_set_insert_random(c: &mut Criterion) {
    let keys = random_keys(N, 12345);
    let mut group = c.benchmark_group("set_insert_random");

    group.bench_function(BenchmarkId::new("OrderedSet", N), |b| {
        b.iter(|| keys.iter().copied().collect::<OrderedSet<_>>());
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| keys.iter().copied().collect::<BTreeSet<_>>());
    });

    group.finish();
}

fn bench_set_cursor_remove(c: &mut Criterion) {
    let keys = ordered_keys(N);
    let mut group = c.benchmark_group("set_cursor_remove_even");

    group.bench_function(BenchmarkId::new("OrderedSet", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<OrderedSet<_>>(),
            |mut set| {
                let mut cursor = set.cursor();
                while let Some(&k) = cursor.advance() {
                    if k % 2 == 0 {
                        cursor.remove_current().unwrap();
                    }
                }
                set
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<BTreeSet<_>>(),
            |mut set| {
                set.retain(|k| k % 2 != 0);
                set
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ─── Merge Benchmarks ───────────────────────────────────────────────────────

fn bench_merge_sets(c: &mut Criterion) {
    let a: OrderedSet<i64> = random_keys(N, 12345).into_iter().collect();
    let b: OrderedSet<i64> = random_keys(N, 67890).into_iter().collect();
    let (x, y): (BTreeSet<i64>, BTreeSet<i64>) = (a.iter().copied().collect(), b.iter().copied().collect());
    let mut group = c.benchmark_group("merge_sets");

    group.bench_function(BenchmarkId::new("union/OrderedSet", N), |bench| {
        bench.iter(|| union(&a, &b));
    });
    group.bench_function(BenchmarkId::new("union/BTreeSet", N), |bench| {
        bench.iter(|| x.union(&y).copied().collect::<BTreeSet<_>>());
    });
    group.bench_function(BenchmarkId::new("intersection/OrderedSet", N), |bench| {
        bench.iter(|| intersection(&a, &b));
    });
    group.bench_function(BenchmarkId::new("intersection/BTreeSet", N), |bench| {
        bench.iter(|| x.intersection(&y).copied().collect::<BTreeSet<_>>());
    });
    group.bench_function(BenchmarkId::new("difference/OrderedSet", N), |bench| {
        bench.iter(|| difference(&a, &b));
    });
    group.bench_function(BenchmarkId::new("difference/BTreeSet", N), |bench| {
        bench.iter(|| x.difference(&y).copied().collect::<BTreeSet<_>>());
    });

    group.finish();
}

fn bench_merge_vecs(c: &mut Criterion) {
    let a: Vec<i64> = random_keys(N, 12345).into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    let b: Vec<i64> = random_keys(N, 67890).into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    let mut group = c.benchmark_group("merge_vecs");

    group.bench_function(BenchmarkId::new("union", N), |bench| {
        bench.iter(|| union(&a, &b));
    });
    group.bench_function(BenchmarkId::new("intersection", N), |bench| {
        bench.iter(|| intersection(&a, &b));
    });

    group.finish();
}

// ─── Peekable Benchmarks ────────────────────────────────────────────────────

fn bench_peekable(c: &mut Criterion) {
    let keys = ordered_keys(N);
    let mut group = c.benchmark_group("peekable_drain");

    group.bench_function(BenchmarkId::new("wabi_set::Peekable", N), |b| {
        b.iter(|| {
            let mut p = Peekable::new(keys.iter());
            let mut sum = 0;
            while let Some(k) = p.advance() {
                sum += k + p.peek().map_or(0, |next| **next);
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("core::iter::Peekable", N), |b| {
        b.iter(|| {
            let mut p = keys.iter().peekable();
            let mut sum = 0;
            while let Some(k) = p.next() {
                sum += k + p.peek().map_or(0, |next| **next);
            }
            sum
        });
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(set_benches, bench_set_insert_ordered, bench_set_insert_random, bench_set_cursor_remove,);

criterion_group!(merge_benches, bench_merge_sets, bench_merge_vecs,);

criterion_group!(peekable_benches, bench_peekable,);

criterion_main!(set_benches, merge_benches, peekable_benches,);
