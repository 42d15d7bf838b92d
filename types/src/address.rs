use std::fmt;

use serde::{Deserialize, Serialize};

/// Length in bytes of an [`Address`].
pub const ADDRESS_LEN: usize = 20;
/// Length in bytes of a content hash ([`TxHash`], [`BlockHash`]).
pub const HASH_LEN: usize = 32;

/// A 20-byte account identifier (spec §3: `Address`).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; ADDRESS_LEN]);

/// A 32-byte content hash, used both for transaction hashes and block hashes
/// (spec §3: `TxHash` / `BlockHash`).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct TxHash(pub [u8; HASH_LEN]);

/// See [`TxHash`]; kept as a distinct type so block and transaction hashes
/// cannot be swapped by accident at call sites.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct BlockHash(pub [u8; HASH_LEN]);

macro_rules! hash_like {
    ($ty:ident, $len:expr) => {
        impl $ty {
            /// All-zero value, used as a sentinel in a few call sites (e.g.
            /// "no path found" VRF-style minimums).
            pub const fn zero() -> Self {
                $ty([0u8; $len])
            }

            /// Borrow the raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($ty), hex::encode(self.0))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(self.0))
            }
        }

        impl From<[u8; $len]> for $ty {
            fn from(bytes: [u8; $len]) -> Self {
                $ty(bytes)
            }
        }

        impl AsRef<[u8]> for $ty {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::zero()
            }
        }
    };
}

hash_like!(Address, ADDRESS_LEN);
hash_like!(TxHash, HASH_LEN);
hash_like!(BlockHash, HASH_LEN);
