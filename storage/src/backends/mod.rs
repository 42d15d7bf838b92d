//! # Storage backends
//!
//! Concrete implementations of [`crate::Database`] for specific storage
//! solutions (volatile memory, embedded databases, etc.).

pub mod hashmap;
#[cfg(feature = "rocksdb-backend")]
pub mod rocksdb;
