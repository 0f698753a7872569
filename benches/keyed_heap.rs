//! Criterion benchmarks for the keyed heap
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench keyed_heap
//!
//! # Only one group
//! cargo bench --bench keyed_heap -- push_pop
//! ```
//!
//! Sizes run from 10 to 100 000 entries. `push_pop` fills the heap and drains
//! it, `update` changes every priority once on a full heap, `remove` evicts
//! every key from a full heap in scrambled order.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keyed_heap::{KeyedHeap, MaxFirst, MinFirst};

const SIZES: [u64; 5] = [10, 100, 1_000, 10_000, 100_000];

/// Deterministic scramble so insert order is not already sorted
fn scramble(i: u64, n: u64) -> u64 {
    (i.wrapping_mul(2_654_435_761)) % n.max(1)
}

fn filled(n: u64) -> KeyedHeap<u64, u64, MinFirst> {
    let heap = KeyedHeap::with_capacity(n as usize, MinFirst);
    for i in 0..n {
        heap.push(i, scramble(i, n)).unwrap();
    }
    heap
}

fn benchmark_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");

    for n in SIZES {
        group.bench_with_input(BenchmarkId::new("min_first", n), &n, |b, &n| {
            b.iter(|| {
                let heap = KeyedHeap::new(MinFirst);
                for i in 0..n {
                    heap.push(i, scramble(i, n)).unwrap();
                }
                while let Some(entry) = heap.pop() {
                    black_box(entry);
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("max_first_closure", n), &n, |b, &n| {
            b.iter(|| {
                let heap = KeyedHeap::new(|x: &u64, y: &u64| x > y);
                for i in 0..n {
                    heap.push(i, scramble(i, n)).unwrap();
                }
                while let Some(entry) = heap.pop() {
                    black_box(entry);
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("max_first", n), &n, |b, &n| {
            b.iter(|| {
                let heap = KeyedHeap::new(MaxFirst);
                for i in 0..n {
                    heap.push(i, scramble(i, n)).unwrap();
                }
                while let Some(entry) = heap.pop() {
                    black_box(entry);
                }
            });
        });
    }

    group.finish();
}

fn benchmark_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for n in SIZES {
        group.bench_with_input(BenchmarkId::new("decrease_all", n), &n, |b, &n| {
            b.iter_batched(
                || filled(n),
                |heap| {
                    for i in 0..n {
                        black_box(heap.update(i, 0).ok());
                    }
                    heap
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("set_existing", n), &n, |b, &n| {
            b.iter_batched(
                || filled(n),
                |heap| {
                    for i in 0..n {
                        black_box(heap.set(i, scramble(i + 1, n)));
                    }
                    heap
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn benchmark_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");

    for n in SIZES {
        group.bench_with_input(BenchmarkId::new("scrambled", n), &n, |b, &n| {
            b.iter_batched(
                || filled(n),
                |heap| {
                    for i in 0..n {
                        black_box(heap.remove(&((i * 7_919) % n)));
                    }
                    heap
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn benchmark_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for n in SIZES {
        let heap = filled(n);
        group.bench_with_input(BenchmarkId::new("value_of", n), &n, |b, &n| {
            b.iter(|| {
                for i in 0..n {
                    black_box(heap.value_of(&i));
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("peek", n), &n, |b, _| {
            b.iter(|| black_box(heap.peek()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_push_pop,
    benchmark_update,
    benchmark_remove,
    benchmark_lookup
);
criterion_main!(benches);
