//! Core hashing traits.
//!
//! This crate provides the foundational traits the hash implementations in
//! this workspace conform to. It is `no_std` compatible and has zero
//! dependencies.
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Digest`] | Fixed-size cryptographic digests (streaming) |
//! | [`Xof`] | Extendable-output functions |
//!
//! # Fallibility Discipline
//!
//! This crate denies `unwrap`, `expect`, and indexing in non-test code to
//! ensure all error paths are handled explicitly.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

mod digest;
mod xof;

pub use digest::Digest;
pub use xof::Xof;
