//! DoS protection (spec C8): reputation-tiered rate limiting with a
//! consecutive-violation ban list, malicious-bytecode static analysis, P2P
//! traffic caps, and the mempool fee-multiplier policy.

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

#[macro_use]
extern crate log;

pub mod bandwidth;
pub mod bytecode;
pub mod error;
pub mod fee;
pub mod rate_limit;

pub use bandwidth::PeerTrafficGuard;
pub use bytecode::{analyze, should_reject, BytecodeRisk};
pub use error::{DosError, DosResult};
pub use fee::required_fee_multiplier;
pub use rate_limit::{reputation_tier, Action, RateLimiter, ReputationTier};
