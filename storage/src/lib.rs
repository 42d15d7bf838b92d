//! Key/value storage abstraction away from specific backends. This crate
//! implements the `Database` capability spec.md §1 says is external to the
//! core ("the persistent key-value store ... we consume a `Database`
//! capability offering `read(key)`, `write(key,value)`, `list_prefix(prefix)`"):
//! the trait lives here so the rest of the workspace has something concrete
//! to depend on and test against, while a real node is free to supply its
//! own implementation instead.

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

#[macro_use]
extern crate log;

pub mod backends;
pub mod error;
pub mod storage;

pub use error::{StorageError, StorageResult};
pub use storage::{Database, WriteBatch, WriteBatchItem};
