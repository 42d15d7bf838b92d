//! Error type for [`crate::CoreContext::load`]: each variant wraps the
//! failure of the subsystem that produced it, since loading is the only
//! fallible operation this crate itself performs (once loaded, every
//! subsystem's own error type is the one a caller sees).

use thiserror::Error;

/// Failure constructing a [`crate::CoreContext`].
#[derive(Debug, Error)]
pub enum CoreError {
    /// The supplied [`wot_config::Config`] failed validation (spec §6:
    /// percentage-sum and range invariants).
    #[error("invalid configuration: {0}")]
    Config(wot_config::ConfigError),
    /// Loading the Web-of-Trust graph failed.
    #[error("trust graph load failed: {0}")]
    TrustGraph(wot_trust_graph::TrustGraphError),
    /// Loading the wallet clusterer failed.
    #[error("clustering load failed: {0}")]
    Clustering(wot_clustering::ClusteringError),
    /// Loading the dispute manager failed.
    #[error("dispute manager load failed: {0}")]
    Dispute(wot_dispute::DisputeError),
    /// Loading the validator registry failed.
    #[error("validator registry load failed: {0}")]
    Sybil(wot_sybil::SybilError),
    /// Loading the HAT v2 consensus manager failed.
    #[error("consensus manager load failed: {0}")]
    Consensus(wot_consensus::ConsensusError),
    /// Loading the DoS rate limiter failed.
    #[error("rate limiter load failed: {0}")]
    Dos(wot_dos::DosError),
    /// Loading the security audit log failed.
    #[error("audit log load failed: {0}")]
    Audit(wot_audit::AuditError),
}

/// Result type for [`crate::CoreContext::load`].
pub type CoreResult<T> = Result<T, CoreError>;
