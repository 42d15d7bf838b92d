//! Security audit log and anomaly detectors (spec §4.10).
//!
//! `wot-audit` records an append-only trail of security-relevant events
//! emitted by the other crates (trust-graph mutations, consensus outcomes,
//! DoS enforcement, circuit breaker transitions, ...) and watches a handful
//! of rolling statistics for signs of abuse.

mod anomaly;
mod error;
mod event;
mod keys;
mod log;

pub use anomaly::{ReputationAnomalyDetector, ValidatorAnomalyDetector, VotingAnomalyDetector};
pub use error::{AuditError, AuditResult};
pub use event::{SecurityEvent, SecurityEventType, Severity};
pub use log::{SecurityAuditLog, MAX_RECENT_EVENTS};
