//! Cryptographic hash functions.

pub mod blake3;

pub use blake3::{Blake3, Error};
