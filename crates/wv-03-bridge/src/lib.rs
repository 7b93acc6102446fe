//! # Bridge Subsystem (wv-03)
//!
//! Admits transactions and blocks from external peers, deduplicates them,
//! screens them through the content firewall, and fans them out to both
//! the internal gossip mesh and the remote HTTP peer set.
//!
//! ## Architecture Role
//!
//! ```text
//!                        ┌──────────────┐
//!  [HTTP iface] ──add──→ │  Bridge (3)  │ ──scan──→ [Firewall (2)]
//!                        │              │
//!     mesh peers ←─send──│  seen-id set │──wire──→ [remote peer A]
//!     mesh peers ──recv─→│  peer sets   │──wire──→ [remote peer B] ...
//!                        └──────────────┘
//! ```
//!
//! ## Trust-Critical Properties
//!
//! - At-most-once wire send per (item id, peer) over the seen-cache window.
//! - Flagged payloads are never forwarded anywhere.
//! - A handler failure never takes the actor down; the next message
//!   resumes from the last good state.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{HttpPeerManager, HttpWireClient, InMemoryMesh};
pub use domain::seen_cache::SeenCache;
pub use domain::value_objects::{
    BridgeConfig, DEFAULT_SEEN_CACHE_SIZE, GET_MORE_PEERS_TIME, IGNORE_PEERS_TIME, NET_TIMEOUT,
};
pub use ports::outbound::{
    GossipDecision, GossipMesh, GossipMessage, GossipPayload, GossipPeer, PeerManager, WireClient,
    WireError,
};
pub use service::{BridgeHandle, BridgeMessage, BridgeService};
