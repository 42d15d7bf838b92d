//! `Peers` capability (spec §1: "P2P transport and the node's connection
//! manager ... we consume a `Peers` capability offering `send(peer, msg)`,
//! `broadcast(msg)`, enumeration, node-id mapping") plus the IP-subnet
//! bucketing helper C7 (Eclipse/Sybil protection) uses to detect validators
//! clustered on the same network.
//!
//! This crate does not implement a gossip/discovery protocol (spec §1
//! Non-goals: "the peer-discovery gossip protocol"); it only defines the
//! capability trait this core consumes and an in-memory implementation
//! useful for tests and single-process hosts.

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

#[macro_use]
extern crate log;

pub mod error;
pub mod peers;
pub mod subnet;

pub use error::{NetError, NetResult};
pub use peers::{InMemoryPeers, Peers, PeerId};
pub use subnet::{subnet_key, SubnetKey};
