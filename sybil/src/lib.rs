//! Eclipse/Sybil protection (spec C7): validator eligibility gating by
//! network topology, stake, and WoT diversity, plus coordinated-attack
//! detection over a selected validator set.

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

#[macro_use]
extern crate log;

pub mod detection;
pub mod eligibility;
pub mod error;
mod profile;
mod registry;

pub use detection::{
    detect_coordinated_sybil_network, validate_validator_set_diversity, MIN_NON_WOT_FRACTION,
    SYBIL_CONFIDENCE_THRESHOLD,
};
pub use eligibility::is_validator_eligible;
pub use error::{SybilError, SybilResult};
pub use profile::ValidatorProfile;
pub use registry::ValidatorRegistry;
