//! Known-answer tests from the official BLAKE3 test vectors.
//!
//! Inputs follow the official pattern: byte `i` of the input is `i % 251`.
//! The keyed vectors use the official 32-byte test key.

use hashes::crypto::Blake3;
use traits::Xof;

const KEY: &[u8; 32] = b"whats the Elvish word for friend";

fn hex_to_bytes(hex: &str) -> Vec<u8> {
  assert_eq!(hex.len() % 2, 0);
  hex
    .as_bytes()
    .chunks_exact(2)
    .map(|chunk| {
      let hi = (chunk[0] as char).to_digit(16).unwrap();
      let lo = (chunk[1] as char).to_digit(16).unwrap();
      ((hi << 4) | lo) as u8
    })
    .collect()
}

fn input_pattern(len: usize) -> Vec<u8> {
  (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn hash_len0() {
  assert_eq!(
    Blake3::digest(&input_pattern(0)).to_vec(),
    hex_to_bytes("af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"),
  );
}

#[test]
fn hash_len0_xof_prefix() {
  let expected = hex_to_bytes(
    "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262e00f03e7b69af26b7faaf09fcd333050338ddfe085b8cc869ca98b206c08243a26f5487789e8f660afe6c99ef9e0c52b92e7393024a80459cf91f476f9ffdbda7001c22e159b402631f277ca96f2defdf1078282314e763699a31c5363165421cce14d",
  );
  let mut hasher = Blake3::new();
  assert_eq!(hasher.squeeze(expected.len()), expected);
}

#[test]
fn hash_len1() {
  assert_eq!(
    Blake3::digest(&input_pattern(1)).to_vec(),
    hex_to_bytes("2d3adedff11b61f14c886e35afa036736dcd87a74d27b5c1510225d0f592e213"),
  );
}

#[test]
fn keyed_hash_len0() {
  assert_eq!(
    Blake3::keyed_digest(KEY, &input_pattern(0)).unwrap().to_vec(),
    hex_to_bytes("92b2b75604ed3c761f9d6f62392c8a9227ad0ea3f09573e783f1498a4ed60d26"),
  );
}

#[test]
fn xof_squeeze_matches_trait_squeeze() {
  let data = input_pattern(1025);

  let mut by_len = Blake3::new();
  by_len.absorb(&data).unwrap();
  let stream = by_len.squeeze(96);

  let mut by_buf = Blake3::new();
  by_buf.absorb(&data).unwrap();
  let mut out = [0u8; 96];
  Xof::squeeze(&mut by_buf, &mut out);

  assert_eq!(stream, out);
}
