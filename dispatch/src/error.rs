//! Error type for the block-ingress dispatcher (spec §7: `MalformedPayload`
//! "isolated, tx skipped, audit event").

use thiserror::Error;
use wot_types::PayloadError;

/// Failure processing a single reputation op. Every variant is *isolated*:
/// the dispatcher logs it, audits it, and moves on to the next output/tx
/// rather than aborting block processing (spec §4.1).
#[derive(Debug, Error)]
pub enum OpError {
    #[error("malformed OP_RETURN payload: {0}")]
    Malformed(#[from] PayloadError),
    #[error("transaction has no input address to attribute this op to")]
    NoSender,
    #[error(transparent)]
    TrustGraph(#[from] wot_trust_graph::TrustGraphError),
    #[error(transparent)]
    Dispute(#[from] wot_dispute::DisputeError),
    #[error(transparent)]
    Clustering(#[from] wot_clustering::ClusteringError),
}
