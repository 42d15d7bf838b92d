//! Persistent key layout for the security event log (spec §6:
//! `security_event_{id20}`, "fixed-width zero-padded decimal to preserve
//! lexicographic = chronological order for range scans").

/// `security_event_{event_id:020}`.
pub fn security_event_key(event_id: u64) -> Vec<u8> {
    format!("security_event_{:020}", event_id).into_bytes()
}

/// Prefix covering every persisted security event.
pub fn security_event_prefix() -> Vec<u8> {
    b"security_event_".to_vec()
}
