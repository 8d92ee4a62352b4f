//! BLAKE3 benchmarks against the official crate.
//!
//! The engine here is reference-grade and single-threaded; these benchmarks
//! exist to keep the gap to the official implementation visible, not to
//! close it.

use core::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hashes::crypto::Blake3;

const SIZES: &[usize] = &[64, 1024, 16 * 1024, 256 * 1024];

fn sized_input(len: usize) -> Vec<u8> {
  (0..len).map(|i| (i % 251) as u8).collect()
}

fn official_hash_bytes(input: &[u8]) -> [u8; 32] {
  *blake3::hash(input).as_bytes()
}

fn blake3_oneshot_comparison(c: &mut Criterion) {
  let mut group = c.benchmark_group("blake3/oneshot");

  for &len in SIZES {
    let data = sized_input(len);
    group.throughput(Throughput::Bytes(len as u64));

    group.bench_with_input(BenchmarkId::new("reference", len), &data, |b, d| {
      b.iter(|| black_box(Blake3::digest(black_box(d))))
    });

    group.bench_with_input(BenchmarkId::new("official", len), &data, |b, d| {
      b.iter(|| black_box(official_hash_bytes(black_box(d))))
    });
  }

  group.finish();
}

fn blake3_streaming(c: &mut Criterion) {
  let mut group = c.benchmark_group("blake3/streaming");

  for &len in SIZES {
    let data = sized_input(len);
    group.throughput(Throughput::Bytes(len as u64));

    group.bench_with_input(BenchmarkId::new("absorb_4k", len), &data, |b, d| {
      b.iter(|| {
        let mut hasher = Blake3::new();
        for piece in d.chunks(4096) {
          let _ = hasher.absorb(piece);
        }
        black_box(hasher.squeeze(32))
      })
    });
  }

  group.finish();
}

fn blake3_xof(c: &mut Criterion) {
  let mut group = c.benchmark_group("blake3/xof");

  for &out_len in &[64usize, 1024, 16 * 1024] {
    group.throughput(Throughput::Bytes(out_len as u64));

    group.bench_with_input(BenchmarkId::new("squeeze", out_len), &out_len, |b, &n| {
      b.iter(|| {
        let mut hasher = Blake3::new();
        let _ = hasher.absorb(b"xof benchmark seed");
        black_box(hasher.squeeze(n))
      })
    });
  }

  group.finish();
}

criterion_group!(benches, blake3_oneshot_comparison, blake3_streaming, blake3_xof);
criterion_main!(benches);
