//! Node configuration.
//!
//! Plain defaults overridable through the environment:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `WEAVE_PORT` | Local HTTP listening port |
//! | `WEAVE_PEERS` | Comma-separated bootstrap peers (`a.b.c.d:port`) |
//! | `WEAVE_BLACKLIST` | Comma-separated firewall patterns |
//! | `WEAVE_ALLOW_UNSIGNED` | `1` accepts unsigned transactions (dev only) |

use std::net::SocketAddrV4;

use shared_types::{PeerAddr, DEFAULT_HTTP_PORT};
use tracing::warn;
use wv_03_bridge::DEFAULT_SEEN_CACHE_SIZE;

/// Node configuration.
#[derive(Clone, Debug)]
pub struct NodeConfig {
    /// Local HTTP listening port.
    pub port: u16,
    /// Remote peers to bootstrap the bridge with.
    pub bootstrap_peers: Vec<PeerAddr>,
    /// Capacity of the bridge's seen-id cache.
    pub seen_cache_size: usize,
    /// Firewall patterns loaded at startup.
    pub blacklist: Vec<String>,
    /// Accept unsigned transactions. Development networks only.
    pub allow_unsigned_txs: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
            bootstrap_peers: Vec::new(),
            seen_cache_size: DEFAULT_SEEN_CACHE_SIZE,
            blacklist: Vec::new(),
            allow_unsigned_txs: false,
        }
    }
}

impl NodeConfig {
    /// Builds the configuration from defaults plus environment overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(port) = std::env::var("WEAVE_PORT") {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!(value = %port, "WEAVE_PORT is not a port number; keeping default"),
            }
        }
        if let Ok(peers) = std::env::var("WEAVE_PEERS") {
            config.bootstrap_peers = parse_peer_list(&peers);
        }
        if let Ok(blacklist) = std::env::var("WEAVE_BLACKLIST") {
            config.blacklist = blacklist
                .split(',')
                .filter(|pattern| !pattern.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Ok(flag) = std::env::var("WEAVE_ALLOW_UNSIGNED") {
            config.allow_unsigned_txs = flag == "1";
        }
        config
    }
}

fn parse_peer_list(raw: &str) -> Vec<PeerAddr> {
    raw.split(',')
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.trim().parse::<SocketAddrV4>() {
            Ok(socket) => Some(PeerAddr::from(socket)),
            Err(_) => {
                warn!(entry, "unparseable peer entry skipped");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.port, 1984);
        assert!(config.bootstrap_peers.is_empty());
        assert!(!config.allow_unsigned_txs);
    }

    #[test]
    fn test_parse_peer_list() {
        let peers = parse_peer_list("10.0.0.1:1984, 10.0.0.2:1985,garbage");
        assert_eq!(
            peers,
            vec![
                PeerAddr::new(10, 0, 0, 1, 1984),
                PeerAddr::new(10, 0, 0, 2, 1985),
            ]
        );
    }

    #[test]
    fn test_parse_peer_list_empty() {
        assert!(parse_peer_list("").is_empty());
    }
}
