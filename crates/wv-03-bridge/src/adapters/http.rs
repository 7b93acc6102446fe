//! HTTP adapters for the wire and peer-management ports.
//!
//! Remote peers expose a JSON-over-HTTP interface: `POST /tx` for new
//! transactions, `POST /block` for new blocks, `GET /peers` for their peer
//! list. All calls run under the bridge's network timeout and are made
//! from short-lived fan-out tasks, so a slow peer never blocks the actor.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde::Serialize;
use shared_types::{Block, BlockStatus, PeerAddr};
use tracing::debug;
use wv_01_transaction::Transaction;

use crate::ports::outbound::{PeerManager, WireClient, WireError};

/// `POST /block` request body.
#[derive(Debug, Serialize)]
struct NewBlockBody<'a> {
    /// The sender's listening port, used as the return address.
    origin_port: u16,
    block: &'a Block,
    recall: &'a BlockStatus,
}

/// Reqwest-backed wire client.
///
/// Also keeps the local HTTP interface's peer registry: peers learned
/// through refresh are announced here so inbound handlers know them.
pub struct HttpWireClient {
    client: Client,
    registry: Arc<RwLock<HashSet<PeerAddr>>>,
}

impl HttpWireClient {
    /// Builds a client with the given network timeout.
    pub fn new(net_timeout: Duration) -> Result<Self, WireError> {
        let client = Client::builder()
            .timeout(net_timeout)
            .build()
            .map_err(|e| WireError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            registry: Arc::new(RwLock::new(HashSet::new())),
        })
    }

    /// Peers currently registered with the local HTTP interface.
    pub fn registered_peers(&self) -> Vec<PeerAddr> {
        self.registry.read().iter().copied().collect()
    }

    fn url(peer: PeerAddr, path: &str) -> String {
        format!("http://{peer}{path}")
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        peer: PeerAddr,
        path: &str,
        body: &T,
    ) -> Result<(), WireError> {
        let response = self
            .client
            .post(Self::url(peer, path))
            .json(body)
            .send()
            .await
            .map_err(|e| WireError::Transport(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(WireError::Status(response.status().as_u16()))
        }
    }
}

#[async_trait]
impl WireClient for HttpWireClient {
    async fn send_new_tx(&self, peer: PeerAddr, tx: &Transaction) -> Result<(), WireError> {
        self.post(peer, "/tx", tx).await
    }

    async fn send_new_block(
        &self,
        peer: PeerAddr,
        origin_port: u16,
        block: &Block,
        recall: &BlockStatus,
    ) -> Result<(), WireError> {
        let body = NewBlockBody {
            origin_port,
            block,
            recall,
        };
        self.post(peer, "/block", &body).await
    }

    async fn announce_peer(&self, peer: PeerAddr) -> Result<(), WireError> {
        self.registry.write().insert(peer);
        Ok(())
    }
}

/// Peer-list refresh by asking current peers for their peers.
pub struct HttpPeerManager {
    client: Client,
    max_peers: usize,
}

impl HttpPeerManager {
    /// Builds a manager with the given timeout and peer-list cap.
    pub fn new(net_timeout: Duration, max_peers: usize) -> Result<Self, WireError> {
        let client = Client::builder()
            .timeout(net_timeout)
            .build()
            .map_err(|e| WireError::Transport(e.to_string()))?;
        Ok(Self { client, max_peers })
    }

    async fn peers_of(&self, peer: PeerAddr) -> Result<Vec<PeerAddr>, WireError> {
        let response = self
            .client
            .get(HttpWireClient::url(peer, "/peers"))
            .send()
            .await
            .map_err(|e| WireError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(WireError::Status(response.status().as_u16()));
        }
        response
            .json()
            .await
            .map_err(|e| WireError::Transport(e.to_string()))
    }
}

#[async_trait]
impl PeerManager for HttpPeerManager {
    async fn refresh(&self, current: Vec<PeerAddr>) -> Vec<PeerAddr> {
        let mut merged = current.clone();
        for peer in &current {
            match self.peers_of(*peer).await {
                Ok(list) => {
                    for learned in list {
                        if !merged.contains(&learned) {
                            merged.push(learned);
                        }
                    }
                }
                Err(err) => debug!(%err, peer = %peer, "peer list fetch failed"),
            }
        }
        merged.truncate(self.max_peers);
        merged
    }
}
