use thiserror::Error;

/// Errors raised while decoding a reputation-carrying `OP_RETURN` payload
/// (spec §6, §7: `MalformedPayload`).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// The payload body is shorter than the op's declared minimum wire size.
    #[error("payload too short: need at least {need} bytes, got {got}")]
    TooShort {
        /// Minimum required length for this op.
        need: usize,
        /// Actual length observed.
        got: usize,
    },
    /// The first bytes of the output did not match the protocol magic.
    #[error("bad protocol magic")]
    BadMagic,
    /// The op byte did not match any known reputation op.
    #[error("unknown op tag {0:#04x}")]
    UnknownOp(u8),
    /// A length-prefixed field declared a length that overruns the body.
    #[error("declared length {declared} overruns remaining body of {remaining} bytes")]
    LengthOverrun {
        /// Declared length of the field.
        declared: usize,
        /// Bytes actually remaining in the body.
        remaining: usize,
    },
    /// A `DAO_VOTE` payload's commit/reveal sub-byte did not match `0` or `1`.
    #[error("unknown DAO_VOTE sub-tag {0:#04x}")]
    UnknownSubTag(u8),
}
