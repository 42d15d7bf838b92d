//! Minimal views of the base-chain values this core consumes (spec §1:
//! "the base-chain block/transaction structures and script engine ... we
//! consume `Block` and `Transaction` values and `OP_RETURN` payload bytes").
//!
//! These are deliberately thin: the core never constructs or mutates them,
//! it only reads the fields it needs to drive dispatch (C1) and wallet
//! clustering (C3).

use crate::address::{Address, BlockHash, TxHash};

/// A transaction as seen by the dispatcher and clusterer.
#[derive(Clone, Debug, Default)]
pub struct Transaction {
    /// Content hash of this transaction.
    pub hash: TxHash,
    /// Addresses that control the UTXOs spent by this transaction's inputs.
    /// Empty for coinbase transactions. Used by C3's shared-input heuristic.
    pub input_addresses: Vec<Address>,
    /// Raw bytes of every `OP_RETURN` output on this transaction, in output
    /// order. C1 scans these for the reputation protocol magic.
    pub op_return_outputs: Vec<Vec<u8>>,
    /// True for the coinbase transaction of a block (excluded from clustering
    /// per spec §4.3: "for each non-coinbase tx").
    pub is_coinbase: bool,
}

/// A block as seen by the dispatcher.
#[derive(Clone, Debug, Default)]
pub struct Block {
    /// Height of this block.
    pub height: i32,
    /// Content hash of this block.
    pub hash: BlockHash,
    /// Transactions in canonical block order (spec §5: "the canonical
    /// ordering for edge inserts, vote records, dispute creation, and
    /// cluster merges").
    pub transactions: Vec<Transaction>,
}
