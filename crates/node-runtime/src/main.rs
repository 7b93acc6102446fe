//! # weavenet Node Runtime
//!
//! Entry point wiring the admission-and-bridge core together:
//!
//! ```text
//! [Firewall (2)] ←──scan──┐
//!                         │
//! [remote peers] ←─wire─ [Bridge (3)] ─mesh─→ [local subsystems]
//!                         ↑
//!             [Peer refresh, every 2 min]
//! ```
//!
//! The HTTP listener, block storage, and the mining loop attach to the
//! bridge handle exported here; they live in their own subsystems.

mod config;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use wv_01_transaction::VerifierConfig;
use wv_02_firewall::{FirewallHandle, FirewallService, ScanSignature, StaticSignatureSource};
use wv_03_bridge::adapters::{HttpPeerManager, HttpWireClient, InMemoryMesh};
use wv_03_bridge::{BridgeConfig, BridgeHandle, BridgeService};

use crate::config::NodeConfig;

/// Upper bound on the remote peer set after a refresh.
const MAX_EXTERNAL_PEERS: usize = 50;

/// The running node: handles to the long-lived actors.
pub struct NodeRuntime {
    config: NodeConfig,
    bridge: BridgeHandle,
    #[allow(dead_code)] // Consumed by the HTTP interface subsystem.
    firewall: FirewallHandle,
    #[allow(dead_code)] // Consumed by the HTTP interface subsystem.
    verifier: VerifierConfig,
}

impl NodeRuntime {
    /// Wires and spawns every actor.
    pub fn start(config: NodeConfig) -> Result<Self> {
        let signatures = config
            .blacklist
            .iter()
            .enumerate()
            .map(|(i, pattern)| ScanSignature::new(format!("blacklist-{i}"), pattern.as_bytes()))
            .collect();
        let firewall = FirewallService::spawn(&StaticSignatureSource::new(signatures));

        let verifier = if config.allow_unsigned_txs {
            VerifierConfig::allow_unsigned()
        } else {
            VerifierConfig::strict()
        };

        let bridge_config = BridgeConfig {
            port: config.port,
            seen_cache_size: config.seen_cache_size,
            ..BridgeConfig::default()
        };
        let wire = Arc::new(HttpWireClient::new(bridge_config.net_timeout)?);
        let peer_manager = Arc::new(HttpPeerManager::new(
            bridge_config.net_timeout,
            MAX_EXTERNAL_PEERS,
        )?);
        let mesh = Box::new(InMemoryMesh::new(config.seen_cache_size));

        let bridge = BridgeService::spawn(
            bridge_config,
            config.bootstrap_peers.clone(),
            mesh,
            wire,
            peer_manager,
            firewall.clone(),
        );

        Ok(Self {
            config,
            bridge,
            firewall,
            verifier,
        })
    }

    /// The bridge handle for inbound interfaces.
    #[allow(dead_code)] // Consumed by the HTTP interface subsystem.
    pub fn bridge(&self) -> &BridgeHandle {
        &self.bridge
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = NodeConfig::from_env();
    info!(
        port = config.port,
        peers = config.bootstrap_peers.len(),
        "starting weavenet node"
    );

    let runtime = NodeRuntime::start(config)?;
    for peer in runtime.config.bootstrap_peers.iter().take(8) {
        info!(peer = %peer, "bootstrap peer");
    }

    info!("node is running; press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;

    info!("shutting down");
    Ok(())
}
