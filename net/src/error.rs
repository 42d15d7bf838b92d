//! Error type definitions for the `Peers` capability.

use thiserror::Error;
use wot_types::Address;

/// Errors raised while sending to, or enumerating, peers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetError {
    /// The dispatcher holds no peer/socket mapping for a validator address
    /// (spec §5: "incoming challenges that find no peer mapping count
    /// immediately as non-responsive").
    #[error("no known peer mapping for validator {0}")]
    UnknownValidator(Address),
}

/// Result type for the `wot-net` crate.
pub type NetResult<T> = Result<T, NetError>;
