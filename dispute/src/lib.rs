//! Commit-reveal DAO dispute voting and reward distribution (spec C6).
//!
//! `wot-trust-graph` owns the `DAODispute` record and the direct (non
//! commit-reveal) vote path; this crate owns everything specific to
//! commit-reveal voting: the phase machine, `VoteCommitment` storage, and
//! the reward split run once a dispute resolves.

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

#[macro_use]
extern crate log;

mod commitment;
pub mod error;
mod manager;
pub mod phase;
pub mod rewards;

pub use commitment::VoteCommitment;
pub use error::{DisputeError, DisputeResult};
pub use manager::{commitment_hash, DisputeManager};
pub use phase::Phase;
pub use rewards::RewardDistribution;
