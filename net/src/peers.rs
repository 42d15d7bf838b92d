//! The `Peers` capability itself: `send`, `broadcast`, enumeration, and
//! node-id (validator address) to socket-address mapping (spec §1).
//!
//! Messages cross this boundary as opaque bytes, the same way `wot-storage`'s
//! `Database` moves opaque bytes — callers (mainly `wot-consensus`) encode
//! `ValidationRequest`/`ValidationResponse` per spec §6 before calling `send`.

use std::collections::HashMap;
use std::net::SocketAddr;

use parking_lot::RwLock;
use wot_types::Address;

use crate::error::{NetError, NetResult};

/// A validator's address, used as the network-level identity callers send to.
pub type PeerId = Address;

/// Capability a host's P2P/connection manager must offer this core.
pub trait Peers {
    /// Send `message` to a single peer. Returns [`NetError::UnknownValidator`]
    /// if there is no known socket mapping (spec §5: unmapped validators
    /// "count immediately as non-responsive").
    fn send(&self, peer: PeerId, message: Vec<u8>) -> NetResult<()>;

    /// Send `message` to every known peer.
    fn broadcast(&self, message: Vec<u8>);

    /// List every peer this node currently has a mapping for.
    fn enumerate(&self) -> Vec<PeerId>;

    /// Look up the socket address behind a validator's node id, if known.
    fn socket_of(&self, peer: PeerId) -> Option<SocketAddr>;
}

/// In-memory `Peers` implementation: records outbound messages instead of
/// writing to a socket. Used by tests and by hosts embedding this core in a
/// single process with their own transport underneath.
#[derive(Default)]
pub struct InMemoryPeers {
    directory: RwLock<HashMap<PeerId, SocketAddr>>,
    outbox: RwLock<Vec<(PeerId, Vec<u8>)>>,
    broadcasts: RwLock<Vec<Vec<u8>>>,
}

impl InMemoryPeers {
    /// Build an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or update) the socket address a validator is reachable at.
    /// Mirrors peer-connect events a real connection manager would emit.
    pub fn register(&self, peer: PeerId, addr: SocketAddr) {
        self.directory.write().insert(peer, addr);
    }

    /// Remove a peer's mapping, e.g. on disconnect (spec §5: "peer
    /// disconnections remove entries").
    pub fn unregister(&self, peer: &PeerId) {
        self.directory.write().remove(peer);
    }

    /// Drain and return every message queued via `send` since the last drain.
    /// Test/inspection hook; a real transport would push to sockets instead.
    pub fn drain_outbox(&self) -> Vec<(PeerId, Vec<u8>)> {
        std::mem::take(&mut self.outbox.write())
    }

    /// Drain and return every message queued via `broadcast`.
    pub fn drain_broadcasts(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.broadcasts.write())
    }
}

impl Peers for InMemoryPeers {
    fn send(&self, peer: PeerId, message: Vec<u8>) -> NetResult<()> {
        if !self.directory.read().contains_key(&peer) {
            return Err(NetError::UnknownValidator(peer));
        }
        trace!("queued message of {} bytes to {}", message.len(), peer);
        self.outbox.write().push((peer, message));
        Ok(())
    }

    fn broadcast(&self, message: Vec<u8>) {
        trace!("queued broadcast of {} bytes", message.len());
        self.broadcasts.write().push(message);
    }

    fn enumerate(&self) -> Vec<PeerId> {
        self.directory.read().keys().copied().collect()
    }

    fn socket_of(&self, peer: PeerId) -> Option<SocketAddr> {
        self.directory.read().get(&peer).copied()
    }
}
