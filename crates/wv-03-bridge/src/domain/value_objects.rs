//! Bridge configuration values.

use std::time::Duration;

use shared_types::DEFAULT_HTTP_PORT;

/// Interval between remote peer-list refreshes.
pub const GET_MORE_PEERS_TIME: Duration = Duration::from_millis(120_000);

/// How long an ignored peer stays suppressed before reinstatement.
pub const IGNORE_PEERS_TIME: Duration = Duration::from_millis(300_000);

/// Network timeout for outbound HTTP calls made from fan-out tasks.
pub const NET_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Default capacity of the seen-id cache.
pub const DEFAULT_SEEN_CACHE_SIZE: usize = 10_000;

/// Bridge configuration.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Local HTTP listening port, conveyed as the return address when
    /// forwarding blocks.
    pub port: u16,
    /// Capacity of the seen-id cache before oldest-first eviction.
    pub seen_cache_size: usize,
    /// Interval between remote peer-list refreshes.
    pub get_more_peers_interval: Duration,
    /// Suppression window for ignored peers.
    pub ignore_peers_timeout: Duration,
    /// Timeout for outbound wire calls.
    pub net_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_HTTP_PORT,
            seen_cache_size: DEFAULT_SEEN_CACHE_SIZE,
            get_more_peers_interval: GET_MORE_PEERS_TIME,
            ignore_peers_timeout: IGNORE_PEERS_TIME,
            net_timeout: NET_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.port, 1984);
        assert_eq!(config.get_more_peers_interval, Duration::from_secs(120));
        assert_eq!(config.ignore_peers_timeout, Duration::from_secs(300));
        assert_eq!(config.net_timeout, Duration::from_secs(10));
    }
}
