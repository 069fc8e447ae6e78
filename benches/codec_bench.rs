//! Performance benchmarks for the hex codec and the command resolver.
//!
//! Both sit on every tag read/write path and on every inventory event
//! (EPC hex rendering), so they should stay far below the 30ms poll
//! interval even for large batches.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench codec_bench
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use uhf_protocol::{codec, resolver};

/// A typical 96-bit EPC.
const EPC: [u8; 12] = [
    0xE2, 0x00, 0x00, 0x17, 0x22, 0x0A, 0x01, 0x23, 0x45, 0x60, 0x70, 0x80,
];

/// Benchmark encoding a single EPC.
fn bench_encode_epc(c: &mut Criterion) {
    let mut group = c.benchmark_group("hex_encode");
    group.throughput(Throughput::Elements(1));

    group.bench_function("encode_epc", |b| {
        b.iter(|| black_box(codec::hex_encode(black_box(&EPC))));
    });

    group.finish();
}

/// Benchmark decoding hex input as callers send it.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("hex_decode");
    group.throughput(Throughput::Elements(1));

    let compact = codec::hex_encode(&EPC);
    let spaced = "e2 00 00 17 22 0a 01 23 45 60 70 80";

    group.bench_function("decode_compact", |b| {
        b.iter(|| black_box(codec::hex_decode(black_box(&compact)).unwrap()));
    });

    group.bench_function("decode_spaced_lowercase", |b| {
        b.iter(|| black_box(codec::hex_decode(black_box(spaced)).unwrap()));
    });

    group.bench_function("parse_password", |b| {
        b.iter(|| black_box(codec::parse_password(black_box(Some("DEADBEEF"))).unwrap()));
    });

    group.finish();
}

/// Benchmark rendering EPCs for inventory batches of different sizes.
fn bench_encode_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_batch");

    for batch_size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            batch_size,
            |b, &size| {
                let tags: Vec<Vec<u8>> = (0..size)
                    .map(|i: u32| {
                        let mut epc = EPC.to_vec();
                        epc[8..].copy_from_slice(&i.to_be_bytes());
                        epc
                    })
                    .collect();

                b.iter(|| {
                    for epc in &tags {
                        black_box(codec::hex_encode(epc));
                    }
                });
            },
        );
    }

    group.finish();
}

/// Benchmark name resolution with both known and fallback inputs.
fn bench_resolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver");

    group.bench_function("resolve_region_known", |b| {
        b.iter(|| black_box(resolver::resolve_region(black_box("korea"))));
    });

    group.bench_function("resolve_region_fallback", |b| {
        b.iter(|| black_box(resolver::resolve_region(black_box("atlantis"))));
    });

    group.bench_function("resolve_lock", |b| {
        b.iter(|| black_box(resolver::resolve_lock(black_box("ACCESS_PASSWORD"), black_box("perma_lock"))));
    });

    group.bench_function("lock_table", |b| {
        b.iter(|| black_box(resolver::lock_table().count()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_encode_epc,
    bench_decode,
    bench_encode_batch,
    bench_resolver,
);

criterion_main!(benches);
