//! Wallet clusterer, cluster-update handler (spec C3), and cluster-aware
//! trust query (spec C4).

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

#[macro_use]
extern crate log;

mod clusterer;
pub mod error;
pub mod events;
mod keys;
pub mod query;

pub use clusterer::{ClusterUpdateSummary, WalletCluster, WalletClusterer};
pub use error::{ClusteringError, ClusteringResult};
pub use events::{ClusterEventKind, ClusterUpdateEvent};
pub use query::{effective_trust, global_reputation, has_negative_cluster_trust, worst_cluster_member};
