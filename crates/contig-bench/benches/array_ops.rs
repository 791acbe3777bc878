//! Criterion micro-benchmarks for push, insert, growth and copy operations.
//!
//! Each group pairs `DynamicArray` with `std::vec::Vec` doing the same work.

use std::hint::black_box;

use contig::prelude::*;
use contig_bench::{filled, strings};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

/// Benchmark: 10K pushes of `u64` into an empty container.
fn bench_push_10k(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_10k");
    group.bench_function("dynamic_array", |b| {
        b.iter(|| {
            let mut array = DynamicArray::new();
            for i in 0..10_000u64 {
                array.push(i);
            }
            black_box(array.len());
        });
    });
    group.bench_function("vec", |b| {
        b.iter(|| {
            let mut vec = Vec::new();
            for i in 0..10_000u64 {
                vec.push(i);
            }
            black_box(vec.len());
        });
    });
    group.finish();
}

/// Benchmark: 1K inserts at the front and in the middle.
fn bench_insert_1k(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_1k");
    group.bench_function("front", |b| {
        b.iter(|| {
            let mut array = DynamicArray::new();
            for i in 0..1_000u32 {
                array.insert(0, i);
            }
            black_box(array[0]);
        });
    });
    group.bench_function("middle", |b| {
        b.iter(|| {
            let mut array = DynamicArray::new();
            for i in 0..1_000u32 {
                let mid = array.len() / 2;
                array.insert(mid, i);
            }
            black_box(array[0]);
        });
    });
    group.bench_function("vec_front", |b| {
        b.iter(|| {
            let mut vec = Vec::new();
            for i in 0..1_000u32 {
                vec.insert(0, i);
            }
            black_box(vec[0]);
        });
    });
    group.finish();
}

/// Benchmark: growing a 1K-string array under each transfer policy.
///
/// `Relocate` is a `memcpy`; `CloneOnGrow` clones every string.
fn bench_reserve_strings(c: &mut Criterion) {
    let values = strings(1_000);
    let mut group = c.benchmark_group("reserve_strings_1k");
    group.bench_function("relocate", |b| {
        b.iter_batched(
            || filled(&values, Relocate),
            |mut array| {
                array.reserve(2_000);
                array
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("clone_on_grow", |b| {
        b.iter_batched(
            || filled(&values, CloneOnGrow),
            |mut array| {
                array.reserve(2_000);
                array
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

/// Benchmark: copy construction vs copy assignment into a reused block.
fn bench_clone_strings(c: &mut Criterion) {
    let values = strings(1_000);
    let source = filled(&values, Relocate);
    let mut target = filled(&values, Relocate);
    let mut group = c.benchmark_group("clone_strings_1k");
    group.bench_function("clone", |b| {
        b.iter(|| black_box(source.clone()));
    });
    group.bench_function("clone_from_reuse", |b| {
        b.iter(|| {
            target.clone_from(&source);
            black_box(target.len());
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_push_10k,
    bench_insert_1k,
    bench_reserve_strings,
    bench_clone_strings
);
criterion_main!(benches);
