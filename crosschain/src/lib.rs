//! Cross-chain trust aggregation (spec §4.11): verifies attestations from
//! foreign chains and folds them into a single time-decayed weighted score.

mod aggregator;
mod error;
mod score;

pub use aggregator::{time_decay, CrossChainAggregator};
pub use error::{CrossChainError, CrossChainResult};
pub use score::ForeignChainScore;
