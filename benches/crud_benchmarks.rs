use std::collections::BTreeSet;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use mway_tree::BTree;

const N: usize = 10_000;

/// Orders compared against `BTreeSet`: the minimum, a small fan-out and the default.
const ORDERS: [usize; 3] = [3, 6, 16];

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn key_patterns() -> [(&'static str, Vec<i64>); 3] {
    [
        ("ordered", ordered_keys(N)),
        ("reverse", reverse_ordered_keys(N)),
        ("random", random_keys(N)),
    ]
}

fn build(order: usize, keys: &[i64]) -> BTree<i64> {
    let mut tree = BTree::new(order).expect("benchmark orders are valid");
    tree.extend(keys);
    tree
}

// ─── Benchmarks ─────────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion) {
    for (pattern, keys) in key_patterns() {
        let mut group = c.benchmark_group(format!("insert_{pattern}"));

        for order in ORDERS {
            group.bench_with_input(BenchmarkId::new("BTree", order), &order, |b, &order| {
                b.iter(|| build(order, &keys));
            });
        }

        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| keys.iter().copied().collect::<BTreeSet<i64>>());
        });

        group.finish();
    }
}

fn bench_contains(c: &mut Criterion) {
    for (pattern, keys) in key_patterns() {
        let mut group = c.benchmark_group(format!("contains_{pattern}"));

        for order in ORDERS {
            let tree = build(order, &keys);
            group.bench_with_input(BenchmarkId::new("BTree", order), &tree, |b, tree| {
                b.iter(|| keys.iter().filter(|&k| tree.contains(k)).count());
            });
        }

        let set: BTreeSet<i64> = keys.iter().copied().collect();
        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| keys.iter().filter(|&k| set.contains(k)).count());
        });

        group.finish();
    }
}

fn bench_remove(c: &mut Criterion) {
    for (pattern, keys) in key_patterns() {
        let mut group = c.benchmark_group(format!("remove_{pattern}"));

        for order in ORDERS {
            let tree = build(order, &keys);
            group.bench_with_input(BenchmarkId::new("BTree", order), &tree, |b, tree| {
                b.iter_batched(
                    || tree.clone(),
                    |mut tree| {
                        for k in &keys {
                            tree.remove(k);
                        }
                        tree
                    },
                    BatchSize::SmallInput,
                );
            });
        }

        let set: BTreeSet<i64> = keys.iter().copied().collect();
        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter_batched(
                || set.clone(),
                |mut set| {
                    for k in &keys {
                        set.remove(k);
                    }
                    set
                },
                BatchSize::SmallInput,
            );
        });

        group.finish();
    }
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(crud_benches, bench_insert, bench_contains, bench_remove);

criterion_main!(crud_benches);
