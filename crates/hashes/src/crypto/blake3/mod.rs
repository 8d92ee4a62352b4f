//! BLAKE3 (hash + XOF), reference-grade.
//!
//! A single-threaded, dependency-free implementation suitable for `no_std` +
//! `alloc`. Input is absorbed chunk by chunk into an incrementally grown
//! binary Merkle tree ([`tree`]); completed nodes are compressed bottom-up
//! and folded into their parents' staging buffers ([`cargo`]); output of any
//! length is squeezed by re-compressing the root under an incrementing
//! output-block counter.
//!
//! Once squeezing starts, no further input may be absorbed.

#![allow(clippy::indexing_slicing)] // Fixed-size arrays + internal block parsing

use alloc::vec::Vec;
use core::cmp::min;
use core::fmt;
use core::mem;

use traits::{Digest, Xof};

pub(crate) mod cargo;
mod error;
pub(crate) mod tree;

pub use error::Error;

use self::cargo::Cargo;
use self::tree::{NodeId, Tree};

const OUT_LEN: usize = 32;
const KEY_LEN: usize = 32;
const BLOCK_LEN: usize = 64;
const CHUNK_LEN: usize = 1024;

const CHUNK_START: u32 = 1 << 0;
const CHUNK_END: u32 = 1 << 1;
const PARENT: u32 = 1 << 2;
const ROOT: u32 = 1 << 3;
const KEYED_HASH: u32 = 1 << 4;

const IV: [u32; 8] = [
  0x6A09_E667,
  0xBB67_AE85,
  0x3C6E_F372,
  0xA54F_F53A,
  0x510E_527F,
  0x9B05_688C,
  0x1F83_D9AB,
  0x5BE0_CD19,
];

/// BLAKE3 message schedule.
///
/// `MSG_SCHEDULE[round][i]` gives the index of the message word to use.
const MSG_SCHEDULE: [[usize; 16]; 7] = [
  [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
  [2, 6, 3, 10, 7, 0, 4, 13, 1, 11, 12, 5, 9, 14, 15, 8],
  [3, 4, 10, 12, 13, 2, 7, 14, 6, 5, 9, 0, 11, 15, 8, 1],
  [10, 7, 12, 9, 14, 3, 13, 15, 4, 0, 11, 2, 5, 8, 1, 6],
  [12, 13, 9, 11, 15, 10, 14, 8, 7, 2, 5, 3, 0, 1, 6, 4],
  [9, 14, 11, 5, 8, 12, 15, 1, 13, 3, 0, 10, 2, 6, 4, 7],
  [11, 15, 5, 0, 1, 9, 8, 6, 14, 10, 2, 12, 3, 4, 7, 13],
];

#[inline(always)]
fn g(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize, mx: u32, my: u32) {
  state[a] = state[a].wrapping_add(state[b]).wrapping_add(mx);
  state[d] = (state[d] ^ state[a]).rotate_right(16);
  state[c] = state[c].wrapping_add(state[d]);
  state[b] = (state[b] ^ state[c]).rotate_right(12);
  state[a] = state[a].wrapping_add(state[b]).wrapping_add(my);
  state[d] = (state[d] ^ state[a]).rotate_right(8);
  state[c] = state[c].wrapping_add(state[d]);
  state[b] = (state[b] ^ state[c]).rotate_right(7);
}

/// The BLAKE3 compression function.
///
/// Pure: maps (chaining value, padded block, counter, true block length,
/// flags) to the raw 16-word output. The first 8 output words are the new
/// chaining value; all 16 are used for root output blocks.
fn compress(
  chaining_value: &[u32; 8],
  block_words: &[u32; 16],
  counter: u64,
  block_len: u32,
  flags: u32,
) -> [u32; 16] {
  let mut state = [
    chaining_value[0],
    chaining_value[1],
    chaining_value[2],
    chaining_value[3],
    chaining_value[4],
    chaining_value[5],
    chaining_value[6],
    chaining_value[7],
    IV[0],
    IV[1],
    IV[2],
    IV[3],
    counter as u32,
    (counter >> 32) as u32,
    block_len,
    flags,
  ];

  for schedule in &MSG_SCHEDULE {
    let m = |i: usize| block_words[schedule[i]];

    // Columns, then diagonals.
    g(&mut state, 0, 4, 8, 12, m(0), m(1));
    g(&mut state, 1, 5, 9, 13, m(2), m(3));
    g(&mut state, 2, 6, 10, 14, m(4), m(5));
    g(&mut state, 3, 7, 11, 15, m(6), m(7));

    g(&mut state, 0, 5, 10, 15, m(8), m(9));
    g(&mut state, 1, 6, 11, 12, m(10), m(11));
    g(&mut state, 2, 7, 8, 13, m(12), m(13));
    g(&mut state, 3, 4, 9, 14, m(14), m(15));
  }

  for i in 0..8 {
    state[i] ^= state[i + 8];
    state[i + 8] ^= chaining_value[i];
  }
  state
}

#[inline]
fn first_8_words(words: [u32; 16]) -> [u32; 8] {
  let mut cv = [0u32; 8];
  cv.copy_from_slice(&words[..8]);
  cv
}

#[inline]
fn words8_from_le_bytes(bytes: &[u8; 32]) -> [u32; 8] {
  let mut words = [0u32; 8];
  for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
    *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
  }
  words
}

/// Parse a block of up to 64 bytes, zero-padding short blocks. The true
/// length is carried separately into the compression call.
#[inline]
fn block_words_from_bytes(block: &[u8]) -> [u32; 16] {
  debug_assert!(block.len() <= BLOCK_LEN);
  let mut padded = [0u8; BLOCK_LEN];
  padded[..block.len()].copy_from_slice(block);

  let mut words = [0u32; 16];
  for (word, chunk) in words.iter_mut().zip(padded.chunks_exact(4)) {
    *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
  }
  words
}

#[inline]
fn words8_to_le_bytes(words: &[u32; 8]) -> [u8; OUT_LEN] {
  let mut out = [0u8; OUT_LEN];
  for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
    chunk.copy_from_slice(&word.to_le_bytes());
  }
  out
}

#[inline]
fn words16_to_le_bytes(words: &[u32; 16]) -> [u8; BLOCK_LEN] {
  let mut out = [0u8; BLOCK_LEN];
  for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
    chunk.copy_from_slice(&word.to_le_bytes());
  }
  out
}

/// Streaming BLAKE3 hasher with extendable output.
///
/// Absorb any number of byte slices, then squeeze any number of output
/// bytes; sequential squeezes are one continuous stream. Construction
/// selects unkeyed hashing ([`Blake3::new`]) or keyed hashing
/// ([`Blake3::new_keyed`]).
#[derive(Clone)]
pub struct Blake3 {
  key_words: [u32; 8],
  flags: u32,
  tree: Tree,
  /// Not-yet-full leaf cargo; materialized on first need.
  pending: Option<Cargo>,
  chunk_counter: u64,
  node_counter: u64,
  absorbed: u64,
  squeezed: u64,
  finalized: bool,
  /// Output bytes already produced but not yet returned.
  stream: Vec<u8>,
}

impl Default for Blake3 {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// Key material stays out of debug output.
impl fmt::Debug for Blake3 {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Blake3")
      .field("flags", &self.flags)
      .field("absorbed", &self.absorbed)
      .field("squeezed", &self.squeezed)
      .field("finalized", &self.finalized)
      .finish_non_exhaustive()
  }
}

impl Blake3 {
  /// Default digest size in bytes.
  pub const DIGEST_LEN: usize = OUT_LEN;
  /// Required key size in bytes for keyed hashing.
  pub const KEY_LEN: usize = KEY_LEN;

  /// Construct an unkeyed hasher.
  #[must_use]
  pub fn new() -> Self {
    Self::with_seed(IV, 0)
  }

  /// Construct a keyed hasher.
  ///
  /// The key seeds the chaining value in place of the IV words, and every
  /// compression carries the keyed-hash flag. Fails with
  /// [`Error::InvalidKeyLength`] unless `key` is exactly 32 bytes.
  pub fn new_keyed(key: &[u8]) -> Result<Self, Error> {
    let key: &[u8; KEY_LEN] = key
      .try_into()
      .map_err(|_| Error::InvalidKeyLength { len: key.len() })?;
    Ok(Self::with_seed(words8_from_le_bytes(key), KEYED_HASH))
  }

  fn with_seed(key_words: [u32; 8], flags: u32) -> Self {
    Self {
      key_words,
      flags,
      tree: Tree::default(),
      pending: None,
      chunk_counter: 0,
      node_counter: 0,
      absorbed: 0,
      squeezed: 0,
      finalized: false,
      stream: Vec::new(),
    }
  }

  /// Compute the unkeyed hash of `data` in one shot.
  #[must_use]
  pub fn digest(data: &[u8]) -> [u8; OUT_LEN] {
    let mut h = Self::new();
    // A fresh hasher has not squeezed, so absorb cannot fail.
    let _ = h.absorb(data);
    let mut out = [0u8; OUT_LEN];
    out.copy_from_slice(&h.squeeze(OUT_LEN));
    out
  }

  /// Compute the keyed hash of `data` in one shot.
  pub fn keyed_digest(key: &[u8], data: &[u8]) -> Result<[u8; OUT_LEN], Error> {
    let mut h = Self::new_keyed(key)?;
    let _ = h.absorb(data);
    let mut out = [0u8; OUT_LEN];
    out.copy_from_slice(&h.squeeze(OUT_LEN));
    Ok(out)
  }

  /// Total bytes absorbed so far.
  #[must_use]
  pub fn absorbed(&self) -> u64 {
    self.absorbed
  }

  /// Total output bytes produced so far (in whole 64-byte blocks).
  #[must_use]
  pub fn squeezed(&self) -> u64 {
    self.squeezed
  }

  /// Absorb input bytes.
  ///
  /// Chainable; splitting the input across calls at any offsets yields the
  /// same digest as a single call with the concatenation. Absorbing zero
  /// bytes is a no-op. Fails with [`Error::StateError`] once any squeeze has
  /// occurred, leaving the engine untouched.
  pub fn absorb(&mut self, mut input: &[u8]) -> Result<&mut Self, Error> {
    if self.finalized {
      return Err(Error::StateError);
    }

    while !input.is_empty() {
      let chunk_counter = &mut self.chunk_counter;
      let cargo = self.pending.get_or_insert_with(|| {
        let index = *chunk_counter;
        *chunk_counter += 1;
        Cargo::chunk(index)
      });

      let take = min(cargo.remaining_capacity(), input.len());
      let (packet, rest) = input.split_at(take);
      cargo.ingest(packet)?;
      self.absorbed += take as u64;
      input = rest;

      if self.pending.as_ref().is_some_and(Cargo::is_full) {
        self.ship_pending();
        self.reduce(false)?;
      }
    }
    Ok(self)
  }

  /// Squeeze exactly `n` bytes of output.
  ///
  /// The first call finalizes the tree; every call continues the same output
  /// stream, so `squeeze(32)` twice equals one `squeeze(64)`. Surplus bytes
  /// from the 64-byte output blocks are buffered for the next call.
  pub fn squeeze(&mut self, n: usize) -> Vec<u8> {
    if let Err(defect) = self.finalize_tree() {
      unreachable!("tree reduction defect: {defect}");
    }
    let Some(root) = self.tree.root() else {
      unreachable!("finalized tree always has a root");
    };

    while self.stream.len() < n {
      let output = self.node_output_words(root, true);
      self.stream.extend_from_slice(&words16_to_le_bytes(&output));
      self.tree.node_mut(root).cargo_mut().increment_counter();
      self.squeezed += BLOCK_LEN as u64;
    }

    let tail = self.stream.split_off(n);
    mem::replace(&mut self.stream, tail)
  }

  /// Move the pending chunk cargo into the tree.
  fn ship_pending(&mut self) {
    if let Some(cargo) = self.pending.take() {
      self.tree.add_leaf(&mut self.node_counter, cargo);
    }
  }

  /// One tree-reduction pass.
  ///
  /// Every node whose staged bytes are ready and whose parent awaits its
  /// chaining value is compressed, folded into the parent cargo, and
  /// released, bottom-up until the pass settles. In force mode the remaining
  /// completed subtrees are first folded under a single root, so afterwards
  /// only the root (with its staged extension input) survives.
  fn reduce(&mut self, force: bool) -> Result<(), Error> {
    if force {
      self.tree.fold_spine(&mut self.node_counter);
    }

    while let Some((id, parent)) = self.tree.next_ready_child() {
      let cv = first_8_words(self.node_output_words(id, false));
      self
        .tree
        .node_mut(parent)
        .cargo_mut()
        .ingest(&words8_to_le_bytes(&cv))?;
      self.tree.release(id);
    }
    Ok(())
  }

  /// Commit the tree for output: ship any partial chunk (synthesizing one
  /// empty chunk if nothing was ever absorbed, so the empty input hashes as
  /// a single empty chunk) and run forced reduction. Idempotent.
  fn finalize_tree(&mut self) -> Result<(), Error> {
    if self.finalized {
      return Ok(());
    }
    self.finalized = true;

    if self.tree.is_empty() && self.pending.is_none() {
      let index = self.chunk_counter;
      self.chunk_counter += 1;
      self.pending = Some(Cargo::chunk(index));
    }
    self.ship_pending();
    self.reduce(true)
  }

  /// Compress one node's staged bytes block by block and return the raw
  /// 16-word output of the final compression.
  ///
  /// During root extension the final block carries the ROOT flag and the
  /// cargo's output-block counter, while earlier blocks of the root chunk
  /// keep the chunk counter (the root chunk is always chunk 0).
  fn node_output_words(&self, id: NodeId, root_extension: bool) -> [u32; 16] {
    let node = self.tree.node(id);
    let Some(cargo) = node.cargo.as_ref() else {
      unreachable!("node {} compressed before staging", node.index());
    };
    let bytes = cargo.bytes();
    let body_counter = if root_extension { 0 } else { cargo.counter() };

    let mut cv = self.key_words;
    let mut offset = 0;
    loop {
      let end = min(offset + BLOCK_LEN, bytes.len());
      let is_final = end >= bytes.len();
      let block = &bytes[offset..end];

      let mut flags = self.flags;
      if node.is_parent() {
        flags |= PARENT;
      } else {
        if offset == 0 {
          flags |= CHUNK_START;
        }
        if is_final {
          flags |= CHUNK_END;
        }
      }

      if is_final {
        if root_extension {
          flags |= ROOT;
        }
        return compress(
          &cv,
          &block_words_from_bytes(block),
          cargo.counter(),
          block.len() as u32,
          flags,
        );
      }

      cv = first_8_words(compress(
        &cv,
        &block_words_from_bytes(block),
        body_counter,
        block.len() as u32,
        flags,
      ));
      offset = end;
    }
  }
}

impl Digest for Blake3 {
  const OUTPUT_SIZE: usize = OUT_LEN;
  type Output = [u8; OUT_LEN];

  #[inline]
  fn new() -> Self {
    Blake3::new()
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    // `finalize` works on a clone, so a hasher driven through this trait
    // alone never squeezes and absorb cannot fail.
    debug_assert!(!self.finalized, "update after squeeze");
    let _ = self.absorb(data);
  }

  #[inline]
  fn finalize(&self) -> Self::Output {
    let mut hasher = self.clone();
    let mut out = [0u8; OUT_LEN];
    out.copy_from_slice(&hasher.squeeze(OUT_LEN));
    out
  }

  #[inline]
  fn reset(&mut self) {
    *self = Self::with_seed(self.key_words, self.flags);
  }
}

impl Xof for Blake3 {
  fn squeeze(&mut self, out: &mut [u8]) {
    let bytes = Blake3::squeeze(self, out.len());
    out.copy_from_slice(&bytes);
  }
}
