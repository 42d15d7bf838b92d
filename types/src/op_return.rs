//! Wire format for reputation-carrying `OP_RETURN` outputs (spec §6).
//!
//! Every such output begins with a 4-byte protocol magic, a 1-byte op tag,
//! then an op-specific body. All integers are little-endian; lengths are
//! unsigned and length-prefix the bytes that follow them.

use byteorder::{ByteOrder, LittleEndian};

use crate::address::{Address, TxHash, ADDRESS_LEN, HASH_LEN};
use crate::error::PayloadError;
use crate::Amount;

/// 4-byte magic prefixing every reputation `OP_RETURN` payload. The exact
/// value is not mandated by spec.md; chosen here and used consistently by
/// encoder and decoder (see DESIGN.md, "protocol magic").
pub const PROTOCOL_MAGIC: [u8; 4] = *b"CVMR";

/// Known reputation op tags (spec §6).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum OpCode {
    /// `TRUST_EDGE` — add/replace a directed trust edge.
    TrustEdge = 0x10,
    /// `BONDED_VOTE` — a bonded reputation vote.
    BondedVote = 0x11,
    /// `DAO_DISPUTE` — open a dispute against a bonded vote.
    DaoDispute = 0x12,
    /// `DAO_VOTE` — commit or reveal a DAO dispute vote.
    DaoVote = 0x13,
    /// `VOTE` — legacy unbonded vote.
    Vote = 0x14,
    /// `CVM_DEPLOY` — contract deployment bytecode (consumed by the VM; out
    /// of scope for this core beyond static shape, see spec §1).
    CvmDeploy = 0x20,
    /// `CVM_CALL` — contract call payload (out of scope, see `CvmDeploy`).
    CvmCall = 0x21,
}

impl OpCode {
    /// Decode an op tag byte, or `None` if unknown (spec §6 op table).
    pub fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            0x10 => OpCode::TrustEdge,
            0x11 => OpCode::BondedVote,
            0x12 => OpCode::DaoDispute,
            0x13 => OpCode::DaoVote,
            0x14 => OpCode::Vote,
            0x20 => OpCode::CvmDeploy,
            0x21 => OpCode::CvmCall,
            _ => return None,
        })
    }
}

/// Body of a `TRUST_EDGE` (0x10) op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrustEdgePayload {
    pub from: Address,
    pub to: Address,
    pub weight: i16,
    pub bond: Amount,
    pub reason: String,
}

/// Body of a `BONDED_VOTE` (0x11) op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BondedVotePayload {
    pub target: Address,
    pub value: i16,
    pub bond: Amount,
    pub reason: String,
}

/// Body of a `DAO_DISPUTE` (0x12) op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaoDisputePayload {
    pub disputed_vote_tx: TxHash,
    pub bond: Amount,
    pub reason: String,
    pub use_commit_reveal: bool,
}

/// Body of a `DAO_VOTE` (0x13) op: the first sub-byte after the dispute id
/// distinguishes a commitment from a reveal (spec §6).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DaoVotePayload {
    /// Commit-phase submission: a hash binding a not-yet-revealed vote.
    Commit {
        dispute: TxHash,
        hash: TxHash,
        stake: Amount,
    },
    /// Reveal-phase submission: the vote and the nonce used in the commitment.
    Reveal {
        dispute: TxHash,
        vote: bool,
        nonce: TxHash,
    },
}

/// Body of a legacy unbonded `VOTE` (0x14) op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VotePayload {
    pub target: Address,
    pub value: i16,
    pub reason: String,
}

fn take<'a>(body: &'a [u8], n: usize) -> Result<(&'a [u8], &'a [u8]), PayloadError> {
    if body.len() < n {
        return Err(PayloadError::LengthOverrun {
            declared: n,
            remaining: body.len(),
        });
    }
    Ok(body.split_at(n))
}

fn take_address(body: &[u8]) -> Result<(Address, &[u8]), PayloadError> {
    let (raw, rest) = take(body, ADDRESS_LEN)?;
    let mut a = [0u8; ADDRESS_LEN];
    a.copy_from_slice(raw);
    Ok((Address(a), rest))
}

fn take_hash(body: &[u8]) -> Result<(TxHash, &[u8]), PayloadError> {
    let (raw, rest) = take(body, HASH_LEN)?;
    let mut h = [0u8; HASH_LEN];
    h.copy_from_slice(raw);
    Ok((TxHash(h), rest))
}

fn take_i16(body: &[u8]) -> Result<(i16, &[u8]), PayloadError> {
    let (raw, rest) = take(body, 2)?;
    Ok((LittleEndian::read_i16(raw), rest))
}

fn take_i64(body: &[u8]) -> Result<(i64, &[u8]), PayloadError> {
    let (raw, rest) = take(body, 8)?;
    Ok((LittleEndian::read_i64(raw), rest))
}

fn take_u8(body: &[u8]) -> Result<(u8, &[u8]), PayloadError> {
    let (raw, rest) = take(body, 1)?;
    Ok((raw[0], rest))
}

fn take_u16(body: &[u8]) -> Result<(u16, &[u8]), PayloadError> {
    let (raw, rest) = take(body, 2)?;
    Ok((LittleEndian::read_u16(raw), rest))
}

fn take_reason(body: &[u8], len: usize) -> Result<(String, &[u8]), PayloadError> {
    let (raw, rest) = take(body, len)?;
    Ok((String::from_utf8_lossy(raw).into_owned(), rest))
}

/// Split the leading magic + op tag off a raw `OP_RETURN` output, returning
/// the decoded [`OpCode`] and the remaining body.
pub fn split_header(output: &[u8]) -> Result<(OpCode, &[u8]), PayloadError> {
    if output.len() < PROTOCOL_MAGIC.len() + 1 {
        return Err(PayloadError::TooShort {
            need: PROTOCOL_MAGIC.len() + 1,
            got: output.len(),
        });
    }
    let (magic, rest) = output.split_at(PROTOCOL_MAGIC.len());
    if magic != PROTOCOL_MAGIC {
        return Err(PayloadError::BadMagic);
    }
    let (op_byte, body) = rest.split_at(1);
    let op = OpCode::from_byte(op_byte[0]).ok_or(PayloadError::UnknownOp(op_byte[0]))?;
    Ok((op, body))
}

/// Decode a `TRUST_EDGE` body.
pub fn decode_trust_edge(body: &[u8]) -> Result<TrustEdgePayload, PayloadError> {
    let (from, rest) = take_address(body)?;
    let (to, rest) = take_address(rest)?;
    let (weight, rest) = take_i16(rest)?;
    let (bond, rest) = take_i64(rest)?;
    let (reason_len, rest) = take_u8(rest)?;
    let (reason, _) = take_reason(rest, reason_len as usize)?;
    Ok(TrustEdgePayload {
        from,
        to,
        weight,
        bond,
        reason,
    })
}

/// Decode a `BONDED_VOTE` body.
pub fn decode_bonded_vote(body: &[u8]) -> Result<BondedVotePayload, PayloadError> {
    let (target, rest) = take_address(body)?;
    let (value, rest) = take_i16(rest)?;
    let (bond, rest) = take_i64(rest)?;
    let (reason_len, rest) = take_u8(rest)?;
    let (reason, _) = take_reason(rest, reason_len as usize)?;
    Ok(BondedVotePayload {
        target,
        value,
        bond,
        reason,
    })
}

/// Decode a `DAO_DISPUTE` body.
pub fn decode_dao_dispute(body: &[u8]) -> Result<DaoDisputePayload, PayloadError> {
    let (disputed_vote_tx, rest) = take_hash(body)?;
    let (bond, rest) = take_i64(rest)?;
    let (reason_len, rest) = take_u16(rest)?;
    let (reason, rest) = take_reason(rest, reason_len as usize)?;
    let (use_commit_reveal, _) = take_u8(rest)?;
    Ok(DaoDisputePayload {
        disputed_vote_tx,
        bond,
        reason,
        use_commit_reveal: use_commit_reveal != 0,
    })
}

/// Decode a `DAO_VOTE` body (commit or reveal, distinguished by sub-tag).
pub fn decode_dao_vote(body: &[u8]) -> Result<DaoVotePayload, PayloadError> {
    let (dispute, rest) = take_hash(body)?;
    let (sub_tag, rest) = take_u8(rest)?;
    match sub_tag {
        0 => {
            let (hash, rest) = take_hash(rest)?;
            let (stake, _) = take_i64(rest)?;
            Ok(DaoVotePayload::Commit {
                dispute,
                hash,
                stake,
            })
        }
        1 => {
            let (vote, rest) = take_u8(rest)?;
            let (nonce, _) = take_hash(rest)?;
            Ok(DaoVotePayload::Reveal {
                dispute,
                vote: vote != 0,
                nonce,
            })
        }
        other => Err(PayloadError::UnknownSubTag(other)),
    }
}

/// Decode a legacy `VOTE` body.
pub fn decode_vote(body: &[u8]) -> Result<VotePayload, PayloadError> {
    let (target, rest) = take_address(body)?;
    let (value, rest) = take_i16(rest)?;
    let (reason_len, rest) = take_u8(rest)?;
    let (reason, _) = take_reason(rest, reason_len as usize)?;
    Ok(VotePayload {
        target,
        value,
        reason,
    })
}
