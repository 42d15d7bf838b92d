//! Shared data model for the reputation/trust-verification core.
//!
//! This crate owns nothing chain-specific: `Block` and `Transaction` here are
//! minimal *views* of the values the base chain hands us (see spec §1,
//! out-of-scope collaborators). Everything else — addresses, hashes, amounts,
//! and the wire format of reputation-carrying `OP_RETURN` payloads — is owned
//! by this core and lives here so every other crate in the workspace depends
//! on one small, stable vocabulary.

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

mod address;
pub mod error;
pub mod external;
pub mod op_return;

pub use address::{Address, BlockHash, TxHash, ADDRESS_LEN, HASH_LEN};
pub use error::PayloadError;

/// Amount in minimal monetary units. Signed so that penalties and diffs can
/// be expressed without a separate signed/unsigned split (spec §3).
pub type Amount = i64;

/// A block height. Negative values are used by validation requests to mean
/// "not yet known" in a couple of call sites in the original source; kept
/// signed for that reason (spec §3, `ValidationRequest.block_height`).
pub type BlockHeight = i32;

/// Unix timestamp, seconds.
pub type Timestamp = u32;
