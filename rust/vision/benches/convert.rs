// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Benchmark of preview conversion paths.
//!
//! Compares:
//! 1. Packed single-channel buffer (direct copy)
//! 2. Packed RGB buffer (channel swizzle)
//! 3. Padded single-channel buffer (PNG encode/decode round trip)
//!
//! Run with: cargo bench -p blueprint3d-vision --bench convert

use blueprint3d_vision::{convert, IntensityBuffer};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SIZES: [u32; 3] = [256, 1024, 2048];

/// Deterministic sample pattern so every size compresses alike
fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 31) % 251) as u8).collect()
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    for &size in &SIZES {
        let pixels = size as u64 * size as u64;
        group.throughput(Throughput::Elements(pixels));

        let gray = IntensityBuffer::new(size, size, 1, pattern(pixels as usize))
            .expect("valid gray layout");
        group.bench_with_input(BenchmarkId::new("gray", size), &gray, |b, buffer| {
            b.iter(|| convert(black_box(buffer)))
        });

        let rgb = IntensityBuffer::new(size, size, 3, pattern(pixels as usize * 3))
            .expect("valid rgb layout");
        group.bench_with_input(BenchmarkId::new("rgb_swizzle", size), &rgb, |b, buffer| {
            b.iter(|| convert(black_box(buffer)))
        });

        let stride = size as usize + 16;
        let padded = IntensityBuffer::with_stride(
            size,
            size,
            1,
            stride,
            pattern(stride * size as usize),
        )
        .expect("valid padded layout");
        group.bench_with_input(BenchmarkId::new("gray_encoded", size), &padded, |b, buffer| {
            b.iter(|| convert(black_box(buffer)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
