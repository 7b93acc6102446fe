//! # Core Domain Entities
//!
//! The chain-level and network-level records shared by all subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: `Hash`, `TxId`, `Address`
//! - **Tokens**: `WINSTON_PER_AR`, `ar_to_winston`
//! - **Network**: `PeerAddr`, `Block`, `BlockStatus`

use std::fmt;
use std::net::SocketAddrV4;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// A 32-byte SHA-256 hash.
pub type Hash = [u8; 32];

/// A transaction identifier. SHA-256 of the signature for signed
/// transactions, fresh random bytes for unsigned ones.
pub type TxId = Hash;

/// A 32-byte wallet address (SHA-256 of the owner public key).
pub type Address = Hash;

/// Smallest token denomination: 10^12 Winston = 1 AR.
pub const WINSTON_PER_AR: u64 = 1_000_000_000_000;

/// Default HTTP listening port for a weavenet node.
pub const DEFAULT_HTTP_PORT: u16 = 1984;

/// Convert whole AR into Winston.
pub fn ar_to_winston(ar: u64) -> U256 {
    U256::from(ar) * U256::from(WINSTON_PER_AR)
}

/// An external peer endpoint: IPv4 quad plus port.
///
/// This is the wire-visible peer identity used by the bridge for its
/// remote peer set, ignore list, and per-peer send suppression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerAddr {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub port: u16,
}

impl PeerAddr {
    /// Creates a peer endpoint from an IPv4 quad and port.
    pub fn new(a: u8, b: u8, c: u8, d: u8, port: u16) -> Self {
        Self { a, b, c, d, port }
    }
}

impl fmt::Display for PeerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}:{}", self.a, self.b, self.c, self.d, self.port)
    }
}

impl From<SocketAddrV4> for PeerAddr {
    fn from(addr: SocketAddrV4) -> Self {
        let [a, b, c, d] = addr.ip().octets();
        Self::new(a, b, c, d, addr.port())
    }
}

impl From<PeerAddr> for SocketAddrV4 {
    fn from(peer: PeerAddr) -> Self {
        SocketAddrV4::new([peer.a, peer.b, peer.c, peer.d].into(), peer.port)
    }
}

/// A mined block as the bridge sees it.
///
/// The bridge deduplicates on `indep_hash` and carries the rest opaquely;
/// full block validation belongs to the consensus subsystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Independent hash identifying this block on the network.
    pub indep_hash: Hash,
    /// Height in the weave (0 = genesis).
    pub height: u64,
    /// Hash of the previous block.
    pub previous_block: Hash,
    /// Identifiers of the transactions included in this block.
    pub txs: Vec<TxId>,
    /// Unix timestamp (seconds since epoch).
    pub timestamp: u64,
}

impl Block {
    /// Creates a block with the given independent hash and no transactions.
    pub fn new(indep_hash: Hash, height: u64, previous_block: Hash, timestamp: u64) -> Self {
        Self {
            indep_hash,
            height,
            previous_block,
            txs: Vec::new(),
            timestamp,
        }
    }

    /// Builder method: set the included transaction ids.
    pub fn with_txs(mut self, txs: Vec<TxId>) -> Self {
        self.txs = txs;
        self
    }
}

/// Outcome of a remote block fetch.
///
/// Failed fetches produce sentinel payloads which the bridge treats as
/// already processed and drops without forwarding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStatus {
    /// The block was retrieved.
    Available(Block),
    /// The remote peer does not know the block.
    NotFound,
    /// The remote peer knows the block but cannot serve it.
    Unavailable,
}

impl BlockStatus {
    /// The independent hash, when a real block is present.
    pub fn indep_hash(&self) -> Option<Hash> {
        match self {
            Self::Available(block) => Some(block.indep_hash),
            Self::NotFound | Self::Unavailable => None,
        }
    }

    /// True for the `NotFound` / `Unavailable` sentinels.
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Self::Available(_))
    }
}
