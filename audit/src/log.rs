//! `SecurityAuditLog`: append-only, persisted event log with a bounded
//! recent-events deque and a configurable minimum severity (spec §4.10).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use wot_storage::Database;
use wot_types::{Address, Timestamp, TxHash};

use crate::error::{AuditError, AuditResult};
use crate::event::{SecurityEvent, SecurityEventType, Severity};
use crate::keys;

/// Default bound on the in-memory recent-events deque (spec §4.10: "default
/// 10 000").
pub const MAX_RECENT_EVENTS: usize = 10_000;

/// Append-only security event log. Every event is persisted via `db` under
/// its zero-padded `event_id` key and also kept in a bounded in-memory
/// deque for fast recent-history queries (anomaly detection, dashboards).
pub struct SecurityAuditLog<D: Database> {
    db: Arc<D>,
    next_id: AtomicU64,
    min_level: Severity,
    recent: RwLock<VecDeque<SecurityEvent>>,
}

impl<D: Database> SecurityAuditLog<D> {
    /// Build a log backed by `db`, resuming the monotonic id counter from
    /// whatever was last persisted.
    pub fn load(db: Arc<D>, min_level: Severity) -> AuditResult<Self> {
        let mut max_id = 0u64;
        let mut recent = VecDeque::new();
        for (_, value) in db.list_prefix(&keys::security_event_prefix())? {
            let event: SecurityEvent = bincode::deserialize(&value).map_err(|e| AuditError::Decode {
                key: "security_event".to_string(),
                msg: e.to_string(),
            })?;
            max_id = max_id.max(event.event_id);
            recent.push_back(event);
            if recent.len() > MAX_RECENT_EVENTS {
                recent.pop_front();
            }
        }
        Ok(SecurityAuditLog {
            db,
            next_id: AtomicU64::new(max_id + 1),
            min_level,
            recent: RwLock::new(recent),
        })
    }

    /// Record one event if `severity >= min_level`; returns the assigned
    /// `event_id`, or `None` if the event was filtered out.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        event_type: SecurityEventType,
        severity: Severity,
        ts: Timestamp,
        detail: impl Into<String>,
        address: Option<Address>,
        tx: Option<TxHash>,
    ) -> AuditResult<Option<u64>> {
        if severity < self.min_level {
            return Ok(None);
        }
        let event_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let event = SecurityEvent {
            event_id,
            event_type,
            severity,
            ts,
            detail: detail.into(),
            address,
            tx,
        };
        let bytes = bincode::serialize(&event).expect("SecurityEvent is always serializable");
        self.db.write(&keys::security_event_key(event_id), bytes)?;

        let mut recent = self.recent.write();
        recent.push_back(event);
        if recent.len() > MAX_RECENT_EVENTS {
            recent.pop_front();
        }
        Ok(Some(event_id))
    }

    /// Snapshot of the most recent (bounded) events, oldest first.
    pub fn recent_events(&self) -> Vec<SecurityEvent> {
        self.recent.read().iter().cloned().collect()
    }

    /// Last `n` recent events for a specific address, oldest first.
    pub fn recent_events_for(&self, address: Address, n: usize) -> Vec<SecurityEvent> {
        self.recent
            .read()
            .iter()
            .rev()
            .filter(|e| e.address == Some(address))
            .take(n)
            .cloned()
            .rev()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wot_storage::backends::hashmap::HashMapBackend;

    use super::*;

    #[test]
    fn event_ids_are_monotonic() {
        let log = SecurityAuditLog::load(Arc::new(HashMapBackend::new()), Severity::Debug).unwrap();
        let a = log.record(SecurityEventType::TrustGraphMutation, Severity::Info, 0, "a", None, None).unwrap().unwrap();
        let b = log.record(SecurityEventType::TrustGraphMutation, Severity::Info, 1, "b", None, None).unwrap().unwrap();
        assert!(b > a);
    }

    #[test]
    fn events_below_min_level_are_filtered() {
        let log = SecurityAuditLog::load(Arc::new(HashMapBackend::new()), Severity::Warning).unwrap();
        let result = log.record(SecurityEventType::DosEnforcement, Severity::Info, 0, "noop", None, None).unwrap();
        assert!(result.is_none());
        assert!(log.recent_events().is_empty());
    }

    #[test]
    fn reload_resumes_monotonic_counter() {
        let db = Arc::new(HashMapBackend::new());
        {
            let log = SecurityAuditLog::load(db.clone(), Severity::Debug).unwrap();
            log.record(SecurityEventType::TrustGraphMutation, Severity::Info, 0, "a", None, None).unwrap();
        }
        let reloaded = SecurityAuditLog::load(db, Severity::Debug).unwrap();
        let id = reloaded.record(SecurityEventType::TrustGraphMutation, Severity::Info, 1, "b", None, None).unwrap().unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn recent_events_for_filters_by_address() {
        let log = SecurityAuditLog::load(Arc::new(HashMapBackend::new()), Severity::Debug).unwrap();
        let addr = Address([1; 20]);
        log.record(SecurityEventType::TrustGraphMutation, Severity::Info, 0, "mine", Some(addr), None).unwrap();
        log.record(SecurityEventType::TrustGraphMutation, Severity::Info, 1, "other", Some(Address([2; 20])), None).unwrap();
        let mine = log.recent_events_for(addr, 10);
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].detail, "mine");
    }
}
