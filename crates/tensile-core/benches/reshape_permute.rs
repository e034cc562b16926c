//! Benchmarks for reshape, permute, and addressing hot paths.
//!
//! Run with:
//! ```bash
//! cargo bench --bench reshape_permute
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use tensile_core::{address, NdArray, Order, ShapeDescriptor};

/// Reshape across the no-copy path for various shapes.
fn bench_reshape_no_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("reshape_no_copy");

    let test_cases = vec![
        ("2d_to_1d", vec![1000, 1000], vec![1_000_000]),
        ("3d_to_2d", vec![100, 100, 100], vec![10000, 100]),
        ("4d_to_2d", vec![10, 20, 30, 40], vec![200, 1200]),
        ("3d_regroup", vec![50, 60, 70], vec![100, 105, 20]),
    ];

    for (name, from_shape, to_shape) in test_cases {
        let arr = NdArray::<f64>::ones(&from_shape);
        let total: usize = from_shape.iter().product();
        group.throughput(Throughput::Elements(total as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(&arr, &to_shape),
            |b, (arr, to_shape)| {
                b.iter(|| {
                    let reshaped = arr.reshape(black_box(to_shape)).unwrap();
                    black_box(reshaped);
                });
            },
        );
    }

    group.finish();
}

/// Reshape through the copy fallback (non-contiguous source).
fn bench_reshape_copy_fallback(c: &mut Criterion) {
    let mut group = c.benchmark_group("reshape_copy_fallback");

    let arr = NdArray::<f64>::ones(&[256, 256]);
    let transposed = arr.transpose().unwrap();
    group.throughput(Throughput::Elements(transposed.len() as u64));
    group.bench_function("transposed_flatten", |b| {
        b.iter(|| {
            let flat = transposed.reshape(black_box(&[65536])).unwrap();
            black_box(flat);
        });
    });

    group.finish();
}

/// Permute descriptor derivation.
fn bench_permute(c: &mut Criterion) {
    let mut group = c.benchmark_group("permute");

    let test_cases = vec![
        ("2d_transpose", vec![1000, 1000], vec![1usize, 0]),
        ("3d_reverse", vec![100, 100, 100], vec![2, 1, 0]),
        ("3d_cycle", vec![100, 100, 100], vec![2, 0, 1]),
        ("4d_swap_inner", vec![50, 50, 50, 50], vec![0, 1, 3, 2]),
    ];

    for (name, shape, axes) in test_cases {
        let arr = NdArray::<f64>::ones(&shape);
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(&arr, &axes),
            |b, (arr, axes)| {
                b.iter(|| {
                    let permuted = arr.permute(black_box(axes)).unwrap();
                    black_box(permuted);
                });
            },
        );
    }

    group.finish();
}

/// Linear-index to buffer-offset conversion, flat vs strided.
fn bench_addressing(c: &mut Criterion) {
    let mut group = c.benchmark_group("addressing");

    let dense = ShapeDescriptor::contiguous(&[64, 64, 64], Order::RowMajor).unwrap();
    group.bench_function("offset_of_linear_dense", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for i in (0..dense.len()).step_by(97) {
                acc ^= address::offset_of_linear(black_box(&dense), i).unwrap();
            }
            black_box(acc);
        });
    });

    let arr = NdArray::<f64>::ones(&[64, 64, 64]);
    let strided = arr.permute(&[1, 0, 2]).unwrap();
    let desc = strided.descriptor().clone();
    group.bench_function("offset_of_linear_strided", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for i in (0..desc.len()).step_by(97) {
                acc ^= address::offset_of_linear(black_box(&desc), i).unwrap();
            }
            black_box(acc);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_reshape_no_copy,
    bench_reshape_copy_fallback,
    bench_permute,
    bench_addressing
);
criterion_main!(benches);
