//! Hashing and signature primitives used throughout the reputation core:
//! `SHA-256` for nonces, commitments and validator-selection seeds, and
//! `secp256k1` for `ValidationResponse` signing (spec §3, §4.5).

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(missing_docs)]

/// Hash functions.
pub mod hash;

/// Cryptographic signatures.
pub mod signature;

pub use secp256k1;
