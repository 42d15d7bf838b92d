//! Persistent key encoding (spec §6 key layout table).

use wot_types::{Address, BlockHeight, Timestamp};

use crate::events::ClusterEventKind;

/// `cluster_member_{addr}`.
pub fn cluster_member_key(addr: &Address) -> Vec<u8> {
    format!("cluster_member_{}", addr).into_bytes()
}

/// Prefix for scanning every membership record.
pub fn cluster_member_prefix() -> Vec<u8> {
    b"cluster_member_".to_vec()
}

/// `cluster_event_{ts10}_{h10}_{kind}`: zero-padded decimal timestamp and
/// height preserve lexicographic = chronological order for range scans
/// (spec §6).
pub fn cluster_event_key(ts: Timestamp, height: BlockHeight, kind: ClusterEventKind, seq: u64) -> Vec<u8> {
    let kind_tag = match kind {
        ClusterEventKind::NewMember => "new_member",
        ClusterEventKind::ClusterMerge => "cluster_merge",
        ClusterEventKind::TrustInherited => "trust_inherited",
    };
    format!(
        "cluster_event_{:010}_{:010}_{}_{:020}",
        ts, height, kind_tag, seq
    )
    .into_bytes()
}

/// Prefix for scanning every cluster event in chronological order.
pub fn cluster_event_prefix() -> Vec<u8> {
    b"cluster_event_".to_vec()
}
