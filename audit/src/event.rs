//! `SecurityEvent` and its closed-sum event type (spec §4.10, §9
//! "Polymorphism": "a single `SecurityEvent` record carries optional fields
//! for all kinds rather than a class hierarchy").

use serde::{Deserialize, Serialize};
use wot_types::{Address, Timestamp, TxHash};

/// Severity levels, ordered low to high (spec §4.10).
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

/// Which owning component emitted an event. Each state-changing call across
/// spec §4.2-§4.9 is attributed to one of these (spec §4.10: "Each
/// state-changing call in §4.2-4.9 emits one event").
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SecurityEventType {
    /// C2 trust-graph mutation: edge add, bonded vote, slash.
    TrustGraphMutation,
    /// C3 cluster update: new member, merge.
    ClusterUpdate,
    /// C5 HAT consensus outcome: approved, rejected, needs DAO review.
    ConsensusOutcome,
    /// C6 dispute lifecycle: created, commit, reveal, resolved.
    DisputeLifecycle,
    /// C8 DoS enforcement: rate limit, ban.
    DosEnforcement,
    /// C8 bytecode static analysis outcome.
    BytecodeAnalysis,
    /// C9 circuit breaker state transition.
    CircuitBreakerTransition,
    /// C11 cross-chain trust aggregation.
    CrossChainAggregation,
}

/// One append-only audit record (spec §4.10).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// Monotonically increasing id, assigned at insertion (spec §5: "an
    /// event with a lower id was enqueued before one with a higher id").
    pub event_id: u64,
    pub event_type: SecurityEventType,
    pub severity: Severity,
    pub ts: Timestamp,
    /// Short human-readable description of the specific operation, e.g.
    /// `"add_trust_edge"` or `"enter_emergency_mode"`.
    pub detail: String,
    pub address: Option<Address>,
    pub tx: Option<TxHash>,
}
