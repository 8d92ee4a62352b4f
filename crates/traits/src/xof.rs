//! Extendable-output function (XOF) trait.

/// Extendable-output function producing an arbitrary number of bytes.
///
/// Sequential calls are continuous: squeezing 32 then 32 bytes yields the
/// same stream as squeezing 64 bytes at once. This trait intentionally has
/// no `std::io::Read` dependency; it is usable in `no_std` environments.
pub trait Xof: Clone {
  /// Squeeze the next output bytes of the stream into `out`.
  fn squeeze(&mut self, out: &mut [u8]);
}
