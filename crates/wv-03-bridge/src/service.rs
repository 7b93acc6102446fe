//! Bridge service implementation.
//!
//! A single-task message loop owning the remote peer set, the ignore
//! list, the seen-id cache, and the gossip mesh. All I/O toward remote
//! peers runs in short-lived spawned tasks so the mailbox stays
//! responsive; within one admission the mark-seen / gossip / fan-out
//! sequence runs without processing any other mailbox message.

use std::collections::HashSet;
use std::sync::Arc;

use shared_types::{Block, BlockStatus, Hash, PeerAddr};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use wv_01_transaction::Transaction;
use wv_02_firewall::{FirewallHandle, ScanTarget};

use crate::domain::seen_cache::SeenCache;
use crate::domain::value_objects::BridgeConfig;
use crate::ports::outbound::{
    GossipDecision, GossipMesh, GossipMessage, GossipPayload, GossipPeer, PeerManager, WireClient,
};

/// Bridge mailbox messages.
#[derive(Debug)]
pub enum BridgeMessage {
    /// Suppress a peer; reinstatement is scheduled automatically.
    IgnorePeer(PeerAddr),
    /// Reinstate a suppressed peer.
    UnignorePeer(PeerAddr),
    /// Operator kill switch: mark an id as processed so it is never
    /// admitted. Nothing inside the node sends this.
    IgnoreId(Hash),
    /// Admit a transaction from the outside.
    AddTx(Transaction),
    /// Admit a block fetched from `origin`.
    AddBlock {
        origin: PeerAddr,
        block: BlockStatus,
        recall: BlockStatus,
    },
    /// Prepend a remote peer to the external peer set.
    AddRemotePeer(PeerAddr),
    /// Register a local peer with the gossip mesh.
    AddLocalPeer(GossipPeer),
    /// Read the current external peer set.
    GetRemotePeers {
        reply: oneshot::Sender<Vec<PeerAddr>>,
    },
    /// Replace the external peer set.
    UpdateRemotePeers(Vec<PeerAddr>),
    /// A message arriving from the internal gossip mesh.
    GossipIn(GossipMessage),
    /// Kick off a background peer refresh; reschedules itself.
    RefreshPeers,
}

/// Errors surfaced by individual message handlers. They are logged by the
/// actor loop and never escape it.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The requester dropped its reply channel before the answer arrived.
    #[error("reply channel dropped before the answer was sent")]
    ReplyDropped,
}

/// Cheap cloneable handle to the bridge actor. All operations are
/// fire-and-forget except [`BridgeHandle::get_remote_peers`].
#[derive(Clone, Debug)]
pub struct BridgeHandle {
    tx: mpsc::UnboundedSender<BridgeMessage>,
}

impl BridgeHandle {
    fn send(&self, message: BridgeMessage) {
        if self.tx.send(message).is_err() {
            debug!("bridge is gone; message dropped");
        }
    }

    /// Admit a transaction.
    pub fn add_tx(&self, tx: Transaction) {
        self.send(BridgeMessage::AddTx(tx));
    }

    /// Admit a block fetched from `origin`.
    pub fn add_block(&self, origin: PeerAddr, block: BlockStatus, recall: BlockStatus) {
        self.send(BridgeMessage::AddBlock {
            origin,
            block,
            recall,
        });
    }

    /// Suppress a peer for the configured window.
    pub fn ignore_peer(&self, peer: PeerAddr) {
        self.send(BridgeMessage::IgnorePeer(peer));
    }

    /// Mark an id as processed without admitting anything.
    pub fn ignore_id(&self, id: Hash) {
        self.send(BridgeMessage::IgnoreId(id));
    }

    /// Prepend a remote peer.
    pub fn add_remote_peer(&self, peer: PeerAddr) {
        self.send(BridgeMessage::AddRemotePeer(peer));
    }

    /// Register a local mesh peer.
    pub fn add_local_peer(&self, peer: GossipPeer) {
        self.send(BridgeMessage::AddLocalPeer(peer));
    }

    /// Replace the remote peer set.
    pub fn update_remote_peers(&self, peers: Vec<PeerAddr>) {
        self.send(BridgeMessage::UpdateRemotePeers(peers));
    }

    /// Deliver a message from the internal gossip mesh.
    pub fn gossip_in(&self, message: GossipMessage) {
        self.send(BridgeMessage::GossipIn(message));
    }

    /// Trigger a peer refresh cycle now.
    pub fn refresh_peers(&self) {
        self.send(BridgeMessage::RefreshPeers);
    }

    /// Read the current remote peer set. Empty if the bridge is gone.
    pub async fn get_remote_peers(&self) -> Vec<PeerAddr> {
        let (reply, response) = oneshot::channel();
        if self.tx.send(BridgeMessage::GetRemotePeers { reply }).is_err() {
            return Vec::new();
        }
        response.await.unwrap_or_default()
    }
}

/// The bridge actor.
pub struct BridgeService<W, P>
where
    W: WireClient + 'static,
    P: PeerManager + 'static,
{
    config: BridgeConfig,
    mesh: Box<dyn GossipMesh>,
    wire: Arc<W>,
    peer_manager: Arc<P>,
    firewall: FirewallHandle,
    external_peers: Vec<PeerAddr>,
    ignored_peers: HashSet<PeerAddr>,
    processed: SeenCache,
    handle: BridgeHandle,
    rx: mpsc::UnboundedReceiver<BridgeMessage>,
}

impl<W, P> BridgeService<W, P>
where
    W: WireClient + 'static,
    P: PeerManager + 'static,
{
    /// Spawns the bridge actor and returns its handle. The first peer
    /// refresh cycle is armed immediately.
    pub fn spawn(
        config: BridgeConfig,
        external_peers: Vec<PeerAddr>,
        mesh: Box<dyn GossipMesh>,
        wire: Arc<W>,
        peer_manager: Arc<P>,
        firewall: FirewallHandle,
    ) -> BridgeHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = BridgeHandle { tx };
        let processed = SeenCache::new(config.seen_cache_size);
        let service = Self {
            config,
            mesh,
            wire,
            peer_manager,
            firewall,
            external_peers,
            ignored_peers: HashSet::new(),
            processed,
            handle: handle.clone(),
            rx,
        };
        handle.refresh_peers();
        tokio::spawn(service.run());
        handle
    }

    async fn run(mut self) {
        info!(
            peers = self.external_peers.len(),
            port = self.config.port,
            "bridge started"
        );
        while let Some(message) = self.rx.recv().await {
            if let Err(err) = self.handle_message(message).await {
                warn!(%err, "bridge message handling failed; state preserved");
            }
        }
        debug!("bridge mailbox closed; actor stopping");
    }

    async fn handle_message(&mut self, message: BridgeMessage) -> Result<(), BridgeError> {
        match message {
            BridgeMessage::IgnorePeer(peer) => self.handle_ignore_peer(peer),
            BridgeMessage::UnignorePeer(peer) => {
                self.ignored_peers.remove(&peer);
                debug!(peer = %peer, "peer reinstated");
            }
            BridgeMessage::IgnoreId(id) => self.processed.insert_id(id),
            BridgeMessage::AddTx(tx) => self.admit_tx(tx).await,
            BridgeMessage::AddBlock {
                origin,
                block,
                recall,
            } => self.admit_block(origin, block, recall).await,
            BridgeMessage::AddRemotePeer(peer) => self.external_peers.insert(0, peer),
            BridgeMessage::AddLocalPeer(peer) => self.mesh.add_peer(peer),
            BridgeMessage::GetRemotePeers { reply } => {
                return reply
                    .send(self.external_peers.clone())
                    .map_err(|_| BridgeError::ReplyDropped);
            }
            BridgeMessage::UpdateRemotePeers(peers) => self.external_peers = peers,
            BridgeMessage::GossipIn(message) => self.handle_gossip_in(message),
            BridgeMessage::RefreshPeers => self.handle_refresh_peers(),
        }
        Ok(())
    }

    /// Admission for a transaction: dedup, firewall, internal gossip,
    /// external fan-out, then record the id.
    async fn admit_tx(&mut self, tx: Transaction) {
        if self.processed.contains_id(&tx.id) {
            debug!("transaction already processed; dropped");
            return;
        }
        if !self.firewall.scan(ScanTarget::Tx, tx.data.clone()).await {
            debug!("transaction rejected by firewall; dropped");
            return;
        }
        self.mesh.send(GossipMessage::tx(tx.clone()));
        self.fan_out_tx(&tx);
        self.processed.insert_id(tx.id);
    }

    /// Admission for a block. Sentinel payloads from failed fetches count
    /// as already processed and are dropped without forwarding.
    async fn admit_block(&mut self, origin: PeerAddr, block: BlockStatus, recall: BlockStatus) {
        if self.ignored_peers.contains(&origin) {
            debug!(peer = %origin, "block from ignored peer dropped");
            return;
        }
        let block = match block {
            BlockStatus::Available(block) => block,
            BlockStatus::NotFound | BlockStatus::Unavailable => {
                debug!("sentinel block payload dropped");
                return;
            }
        };
        let id = block.indep_hash;
        if self.processed.contains_id(&id) {
            debug!("block already processed; dropped");
            return;
        }
        if !self.firewall.scan(ScanTarget::Block, Vec::new()).await {
            debug!("block rejected by firewall; dropped");
            return;
        }
        self.mesh
            .send(GossipMessage::block(block.clone(), recall.clone()));
        self.fan_out_block(&block, &recall);
        self.processed.insert_id(id);
    }

    /// An item arriving from the internal mesh: if the mesh accepts it,
    /// fan it out externally and record its id.
    fn handle_gossip_in(&mut self, message: GossipMessage) {
        match self.mesh.recv(message) {
            GossipDecision::Accept(message) => {
                let id = message.id();
                match message.payload {
                    GossipPayload::Tx(tx) => self.fan_out_tx(&tx),
                    GossipPayload::Block { block, recall } => self.fan_out_block(&block, &recall),
                }
                self.processed.insert_id(id);
            }
            GossipDecision::Ignore => {}
        }
    }

    fn handle_ignore_peer(&mut self, peer: PeerAddr) {
        self.ignored_peers.insert(peer);
        info!(peer = %peer, "peer ignored");
        let handle = self.handle.clone();
        let timeout = self.config.ignore_peers_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            handle.send(BridgeMessage::UnignorePeer(peer));
        });
    }

    /// Detached refresh cycle: fetch a new peer list, announce the new
    /// entries locally, deliver the list back, then re-arm the timer.
    fn handle_refresh_peers(&self) {
        let current = self.external_peers.clone();
        let manager = Arc::clone(&self.peer_manager);
        let wire = Arc::clone(&self.wire);
        let handle = self.handle.clone();
        let interval = self.config.get_more_peers_interval;
        tokio::spawn(async move {
            let refreshed = manager.refresh(current.clone()).await;
            for peer in refreshed.iter().copied() {
                if current.contains(&peer) {
                    continue;
                }
                if let Err(err) = wire.announce_peer(peer).await {
                    debug!(%err, peer = %peer, "failed to announce refreshed peer");
                }
            }
            handle.update_remote_peers(refreshed);
            tokio::time::sleep(interval).await;
            handle.refresh_peers();
        });
    }

    /// Sends a transaction to every external peer not yet credited with
    /// it. The (id, peer) credit is recorded before the send task spawns,
    /// so a given peer is wired at most once per id.
    fn fan_out_tx(&mut self, tx: &Transaction) {
        for peer in self.external_peers.clone() {
            if self.processed.already_processed(&tx.id, Some(&peer)) {
                continue;
            }
            self.processed.insert_pair(tx.id, peer);
            let wire = Arc::clone(&self.wire);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Err(err) = wire.send_new_tx(peer, &tx).await {
                    debug!(%err, peer = %peer, "tx fan-out failed");
                }
            });
        }
    }

    fn fan_out_block(&mut self, block: &Block, recall: &BlockStatus) {
        let id = block.indep_hash;
        let port = self.config.port;
        for peer in self.external_peers.clone() {
            if self.processed.already_processed(&id, Some(&peer)) {
                continue;
            }
            self.processed.insert_pair(id, peer);
            let wire = Arc::clone(&self.wire);
            let block = block.clone();
            let recall = recall.clone();
            tokio::spawn(async move {
                if let Err(err) = wire.send_new_block(peer, port, &block, &recall).await {
                    debug!(%err, peer = %peer, "block fan-out failed");
                }
            });
        }
    }
}
