//! Outbound ports (SPI) for the bridge subsystem.

use async_trait::async_trait;
use shared_types::{Block, BlockStatus, Hash, PeerAddr};
use thiserror::Error;
use tokio::sync::mpsc;
use wv_01_transaction::Transaction;

/// An item travelling the internal gossip mesh.
#[derive(Clone, Debug)]
pub enum GossipPayload {
    /// A transaction.
    Tx(Transaction),
    /// A block together with its recall block, carried opaquely.
    Block {
        block: Block,
        recall: BlockStatus,
    },
}

/// A gossip-mesh message.
#[derive(Clone, Debug)]
pub struct GossipMessage {
    pub payload: GossipPayload,
}

impl GossipMessage {
    /// Wraps a transaction.
    pub fn tx(tx: Transaction) -> Self {
        Self {
            payload: GossipPayload::Tx(tx),
        }
    }

    /// Wraps a block and its recall block.
    pub fn block(block: Block, recall: BlockStatus) -> Self {
        Self {
            payload: GossipPayload::Block { block, recall },
        }
    }

    /// The dedup id: `tx.id` for transactions, `indep_hash` for blocks.
    pub fn id(&self) -> Hash {
        match &self.payload {
            GossipPayload::Tx(tx) => tx.id,
            GossipPayload::Block { block, .. } => block.indep_hash,
        }
    }
}

/// Delivery address of a local mesh peer.
pub type GossipPeer = mpsc::UnboundedSender<GossipMessage>;

/// Outcome of handing an inbound message to the mesh.
#[derive(Debug)]
pub enum GossipDecision {
    /// The mesh accepted the message; the bridge should fan it out.
    Accept(GossipMessage),
    /// The mesh had already seen it.
    Ignore,
}

/// The internal gossip mesh contract.
///
/// The mesh owns its own dedup state; `send` distributes a locally
/// admitted item, `recv` folds in an item arriving from a mesh peer.
pub trait GossipMesh: Send {
    /// Registers a local peer to distribute to.
    fn add_peer(&mut self, peer: GossipPeer);

    /// Distributes a message to local peers. Returns the outbound message
    /// when it was new to the mesh, `None` when already seen.
    fn send(&mut self, message: GossipMessage) -> Option<GossipMessage>;

    /// Folds in a message received from a local peer.
    fn recv(&mut self, message: GossipMessage) -> GossipDecision;
}

/// Wire-level failures talking to a remote peer.
#[derive(Debug, Error)]
pub enum WireError {
    /// The request never completed.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The peer answered with a non-success status.
    #[error("peer rejected request: HTTP {0}")]
    Status(u16),
}

/// Outbound wire operations toward a remote peer.
#[async_trait]
pub trait WireClient: Send + Sync {
    /// Ships a transaction to a remote peer.
    async fn send_new_tx(&self, peer: PeerAddr, tx: &Transaction) -> Result<(), WireError>;

    /// Ships a block to a remote peer, conveying the local listening port
    /// as the return address and the recall block alongside.
    async fn send_new_block(
        &self,
        peer: PeerAddr,
        origin_port: u16,
        block: &Block,
        recall: &BlockStatus,
    ) -> Result<(), WireError>;

    /// Registers a newly learned peer with the local HTTP interface.
    async fn announce_peer(&self, peer: PeerAddr) -> Result<(), WireError>;
}

/// Remote peer-list management contract.
#[async_trait]
pub trait PeerManager: Send + Sync {
    /// Produces a refreshed remote peer list from the current one.
    async fn refresh(&self, current: Vec<PeerAddr>) -> Vec<PeerAddr>;
}
