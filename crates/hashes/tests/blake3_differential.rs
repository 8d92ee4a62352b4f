//! Differential tests against the official `blake3` crate.

use hashes::crypto::Blake3;
use proptest::prelude::*;

fn blake3_ref_hash(data: &[u8]) -> [u8; 32] {
  *blake3::hash(data).as_bytes()
}

fn blake3_ref_keyed(key: &[u8; 32], data: &[u8]) -> [u8; 32] {
  *blake3::keyed_hash(key, data).as_bytes()
}

fn blake3_ref_xof(data: &[u8], out_len: usize) -> Vec<u8> {
  let mut out = vec![0u8; out_len];
  let mut hasher = blake3::Hasher::new();
  hasher.update(data);
  hasher.finalize_xof().fill(&mut out);
  out
}

fn input_pattern(len: usize) -> Vec<u8> {
  (0..len).map(|i| (i % 251) as u8).collect()
}

/// Chunk-boundary and multi-level tree sizes, checked deterministically.
#[test]
fn boundary_lengths_match_official() {
  for len in [
    0usize, 1, 2, 63, 64, 65, 127, 128, 129, 1023, 1024, 1025, 2048, 2049, 3072, 3073, 4096, 5121,
    8192,
  ] {
    let data = input_pattern(len);
    assert_eq!(Blake3::digest(&data), blake3_ref_hash(&data), "len {len}");
  }
}

#[test]
fn boundary_lengths_match_official_keyed() {
  let key = b"whats the Elvish word for friend";
  for len in [0usize, 1, 1023, 1024, 1025, 2048, 3072, 4096, 8192] {
    let data = input_pattern(len);
    assert_eq!(
      Blake3::keyed_digest(key, &data).unwrap(),
      blake3_ref_keyed(key, &data),
      "len {len}"
    );
  }
}

#[test]
fn boundary_lengths_match_official_xof() {
  for len in [0usize, 1, 1023, 1024, 1025, 3072] {
    let data = input_pattern(len);
    let mut hasher = Blake3::new();
    hasher.absorb(&data).unwrap();
    assert_eq!(hasher.squeeze(301), blake3_ref_xof(&data, 301), "len {len}");
  }
}

proptest! {
  #[test]
  fn one_shot_matches_official(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
    prop_assert_eq!(Blake3::digest(&data), blake3_ref_hash(&data));
  }

  #[test]
  fn streaming_matches_official(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
    let expected = blake3_ref_hash(&data);

    let mut hasher = Blake3::new();
    let mut i = 0usize;
    while i < data.len() {
      let step = (data[i] as usize % 251) + 1;
      let end = core::cmp::min(data.len(), i + step);
      hasher.absorb(&data[i..end]).unwrap();
      i = end;
    }

    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.squeeze(32));
    prop_assert_eq!(digest, expected);
  }

  #[test]
  fn xof_matches_official(
    data in proptest::collection::vec(any::<u8>(), 0..4096),
    out_len in 0usize..2048,
  ) {
    let mut hasher = Blake3::new();
    hasher.absorb(&data).unwrap();
    prop_assert_eq!(hasher.squeeze(out_len), blake3_ref_xof(&data, out_len));
  }

  #[test]
  fn keyed_matches_official(
    data in proptest::collection::vec(any::<u8>(), 0..4096),
    key in any::<[u8; 32]>(),
  ) {
    prop_assert_eq!(
      Blake3::keyed_digest(&key, &data).unwrap(),
      blake3_ref_keyed(&key, &data)
    );
  }

  #[test]
  fn sequential_squeezes_are_continuous(
    data in proptest::collection::vec(any::<u8>(), 0..2048),
    a in 0usize..512,
    b in 0usize..512,
  ) {
    let mut split = Blake3::new();
    split.absorb(&data).unwrap();
    let mut whole = split.clone();

    let mut stream = split.squeeze(a);
    stream.extend_from_slice(&split.squeeze(b));
    prop_assert_eq!(stream, whole.squeeze(a + b));
  }
}
