//! Per-peer P2P bandwidth and message-rate caps (spec §4.8: "per-peer
//! bandwidth cap (default 1 MB/s) and 1000 msg/min cap").

use std::collections::HashMap;

use parking_lot::RwLock;
use wot_net::PeerId;
use wot_types::Timestamp;

use crate::error::{DosError, DosResult};

#[derive(Default)]
struct PeerWindow {
    /// Second this window's byte counter applies to.
    bandwidth_second: Timestamp,
    bytes_this_second: u64,
    /// Start of the current 60s message-count window.
    message_window_start: Timestamp,
    messages_this_window: u32,
}

/// Tracks per-peer bandwidth and message rate against configured caps.
pub struct PeerTrafficGuard {
    max_bandwidth_per_peer_bytes_per_sec: u64,
    max_messages_per_minute: u32,
    peers: RwLock<HashMap<PeerId, PeerWindow>>,
}

impl PeerTrafficGuard {
    pub fn new(max_bandwidth_per_peer_bytes_per_sec: u64, max_messages_per_minute: u32) -> Self {
        PeerTrafficGuard {
            max_bandwidth_per_peer_bytes_per_sec,
            max_messages_per_minute,
            peers: RwLock::new(HashMap::new()),
        }
    }

    /// Record `bytes` received from `peer` at `now`; rejects once the
    /// per-second cap for that peer is exceeded.
    pub fn check_bandwidth(&self, peer: PeerId, bytes: u64, now: Timestamp) -> DosResult<()> {
        let mut peers = self.peers.write();
        let window = peers.entry(peer).or_default();
        if window.bandwidth_second != now {
            window.bandwidth_second = now;
            window.bytes_this_second = 0;
        }
        if window.bytes_this_second + bytes > self.max_bandwidth_per_peer_bytes_per_sec {
            return Err(DosError::RateLimited(peer));
        }
        window.bytes_this_second += bytes;
        Ok(())
    }

    /// Record one message from `peer` at `now`; rejects once the per-minute
    /// message cap is exceeded.
    pub fn check_message(&self, peer: PeerId, now: Timestamp) -> DosResult<()> {
        let mut peers = self.peers.write();
        let window = peers.entry(peer).or_default();
        if now.saturating_sub(window.message_window_start) >= 60 {
            window.message_window_start = now;
            window.messages_this_window = 0;
        }
        if window.messages_this_window >= self.max_messages_per_minute {
            return Err(DosError::RateLimited(peer));
        }
        window.messages_this_window += 1;
        Ok(())
    }
}
