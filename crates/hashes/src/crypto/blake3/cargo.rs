//! Staging buffers feeding the compression function.

use alloc::vec::Vec;

use super::error::Error;
use super::{BLOCK_LEN, CHUNK_LEN};

/// Fixed-capacity staging buffer owned by a tree node.
///
/// A chunk-sized cargo stages up to 1024 input bytes for a leaf; a
/// parent-sized cargo stages the concatenated 32-byte chaining values of the
/// node's two children. The counter is the chunk index for leaves and the
/// output-block index once the root is being extended.
#[derive(Clone, Debug)]
pub(crate) struct Cargo {
  bytes: Vec<u8>,
  capacity: usize,
  counter: u64,
}

impl Cargo {
  /// A leaf cargo for the chunk at `chunk_index`.
  pub(crate) fn chunk(chunk_index: u64) -> Self {
    Self {
      bytes: Vec::with_capacity(CHUNK_LEN),
      capacity: CHUNK_LEN,
      counter: chunk_index,
    }
  }

  /// A parent cargo, sized for two child chaining values.
  pub(crate) fn parent() -> Self {
    Self {
      bytes: Vec::with_capacity(BLOCK_LEN),
      capacity: BLOCK_LEN,
      counter: 0,
    }
  }

  pub(crate) fn remaining_capacity(&self) -> usize {
    self.capacity - self.bytes.len()
  }

  pub(crate) fn is_full(&self) -> bool {
    self.remaining_capacity() == 0
  }

  pub(crate) fn len(&self) -> usize {
    self.bytes.len()
  }

  pub(crate) fn bytes(&self) -> &[u8] {
    &self.bytes
  }

  /// Stage `input` behind the bytes already ingested.
  ///
  /// Callers slice input to [`Self::remaining_capacity`] first; an overflow
  /// is a logic defect reported as [`Error::CapacityExceeded`].
  pub(crate) fn ingest(&mut self, input: &[u8]) -> Result<(), Error> {
    let remaining = self.remaining_capacity();
    if input.len() > remaining {
      return Err(Error::CapacityExceeded { offered: input.len(), remaining });
    }
    self.bytes.extend_from_slice(input);
    Ok(())
  }

  pub(crate) fn counter(&self) -> u64 {
    self.counter
  }

  /// Advance the output-block counter. Root extension only.
  pub(crate) fn increment_counter(&mut self) {
    self.counter = self.counter.wrapping_add(1);
  }
}
