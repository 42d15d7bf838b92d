//! HAT v2 distributed consensus validator (spec C5): randomized validator
//! selection, challenge/response, weighted vote tally, fraud recording, and
//! the hooks DAO escalation and accuracy tracking need from this crate.

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

#[macro_use]
extern crate log;

pub mod components;
pub mod error;
mod fraud;
mod keys;
mod manager;
pub mod response;
pub mod selection;
mod tally;
pub mod types;

pub use components::{ComponentSource, StaticComponentSource};
pub use error::{ConsensusError, ConsensusResult};
pub use fraud::{FraudLedger, MIN_FRAUD_SCORE_DIFFERENCE};
pub use manager::{DistributionOutcome, HatConsensusManager};
pub use response::compute_validator_response;
pub use selection::select_random_validators;
pub use tally::{detect_coordinated_sybil, tally_responses, verify_response, TallyOutcome};
pub use types::{
    ComponentStatus, FraudRecord, HATv2Score, HatConsensusResult, ValidationRequest, ValidationResponse,
    ValidationVote, CONSENSUS_THRESHOLD, MIN_VALIDATORS, NON_WOT_VOTE_WEIGHT, SCORE_TOLERANCE,
    WOT_COVERAGE_THRESHOLD, WOT_VOTE_WEIGHT,
};
