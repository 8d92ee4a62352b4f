//! Error types for the BLAKE3 engine.

use core::fmt;

use super::KEY_LEN;

/// Errors surfaced by hasher construction and absorption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
  /// A key was supplied whose length is not exactly 32 bytes.
  InvalidKeyLength {
    /// Length of the rejected key, in bytes.
    len: usize,
  },
  /// `absorb` was called after the output stream had already started.
  ///
  /// The engine state is left unmodified by the failing call.
  StateError,
  /// More bytes were offered to a staging buffer than it can hold.
  ///
  /// Callers slice input to the remaining capacity first, so this variant
  /// indicates an internal logic defect rather than a recoverable condition.
  CapacityExceeded {
    /// Bytes offered to the buffer.
    offered: usize,
    /// Bytes of capacity the buffer had left.
    remaining: usize,
  },
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InvalidKeyLength { len } => {
        write!(f, "key is not {KEY_LEN} bytes long (got {len})")
      }
      Self::StateError => f.write_str("cannot absorb after squeeze"),
      Self::CapacityExceeded { offered, remaining } => {
        write!(f, "cargo capacity exceeded: offered {offered} bytes with {remaining} remaining")
      }
    }
  }
}

impl core::error::Error for Error {}
