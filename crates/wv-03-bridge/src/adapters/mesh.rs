//! In-memory gossip mesh.
//!
//! Single-process broadcast substrate: local peers register a channel
//! sender and every newly seen message is pushed to all of them. The mesh
//! keeps its own seen-id cache, independent of the bridge's, so internal
//! and external dedup cannot mask each other.

use tracing::debug;

use crate::domain::seen_cache::SeenCache;
use crate::ports::outbound::{GossipDecision, GossipMesh, GossipMessage, GossipPeer};

/// Channel-fanout mesh for a single process.
pub struct InMemoryMesh {
    peers: Vec<GossipPeer>,
    seen: SeenCache,
}

impl InMemoryMesh {
    /// Creates a mesh with the given dedup window.
    pub fn new(seen_cache_size: usize) -> Self {
        Self {
            peers: Vec::new(),
            seen: SeenCache::new(seen_cache_size),
        }
    }

    /// Number of registered local peers.
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    fn distribute(&mut self, message: &GossipMessage) {
        // Peers whose receiver is gone are dropped from the set.
        self.peers.retain(|peer| peer.send(message.clone()).is_ok());
    }
}

impl GossipMesh for InMemoryMesh {
    fn add_peer(&mut self, peer: GossipPeer) {
        self.peers.push(peer);
    }

    fn send(&mut self, message: GossipMessage) -> Option<GossipMessage> {
        let id = message.id();
        if self.seen.contains_id(&id) {
            debug!("mesh send of already-seen message suppressed");
            return None;
        }
        self.seen.insert_id(id);
        self.distribute(&message);
        Some(message)
    }

    fn recv(&mut self, message: GossipMessage) -> GossipDecision {
        let id = message.id();
        if self.seen.contains_id(&id) {
            return GossipDecision::Ignore;
        }
        self.seen.insert_id(id);
        self.distribute(&message);
        GossipDecision::Accept(message)
    }
}
