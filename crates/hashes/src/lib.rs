//! Cryptographic digests with extendable output.
//!
//! This crate is `no_std` + `alloc` compatible and has zero library
//! dependencies outside this workspace. Dev-only dependencies are used for
//! oracle testing and benchmarking.
//!
//! # Modules
//!
//! - [`crypto`] - Cryptographic hash functions.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

extern crate alloc;

pub mod crypto;

pub use traits::{Digest, Xof};
