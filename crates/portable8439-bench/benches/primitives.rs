// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Raw ChaCha20 keystream and Poly1305 MAC throughput.

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};

use portable8439::{chacha20_apply, chacha20_block, poly1305_tag};

const KEY: [u8; 32] = [0x42; 32];
const NONCE: [u8; 12] = [0x24; 12];

fn bench_chacha20(c: &mut Criterion) {
    let mut group = c.benchmark_group("chacha20");

    group.throughput(Throughput::Bytes(64));
    group.bench_function("block", |b| {
        b.iter(|| black_box(chacha20_block(&KEY, &NONCE, black_box(1))));
    });

    for size in [1024, 16384, 65536] {
        let data = vec![0xAB; size];

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("apply", size), &data, |b, data| {
            b.iter_batched(
                || data.clone(),
                |mut buf| {
                    chacha20_apply(&KEY, &NONCE, 1, &mut buf).unwrap();
                    black_box(buf)
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_poly1305(c: &mut Criterion) {
    let mut group = c.benchmark_group("poly1305");

    for size in [64, 1024, 16384, 65536] {
        let message = vec![0xAB; size];

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("tag", size), &message, |b, msg| {
            b.iter(|| black_box(poly1305_tag(&KEY, msg)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_chacha20, bench_poly1305);
criterion_main!(benches);
