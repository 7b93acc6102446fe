//! Seen-id cache for deduplication.
//!
//! Holds two kinds of entries: a bare item id (the item has been admitted)
//! and an `(id, peer)` pair (the item has already been sent to that peer).
//! The pair form only suppresses outbound sends; it never blocks inbound
//! acceptance on its own.
//!
//! The cache is bounded: entries evict oldest-first once capacity is
//! reached, which keeps the at-most-once property over the cache window
//! without growing forever. It is owned by a single actor, so no lock.

use std::collections::{HashSet, VecDeque};

use shared_types::{Hash, PeerAddr};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum SeenKey {
    Id(Hash),
    IdPeer(Hash, PeerAddr),
}

/// Bounded insertion-order-evicting set of seen ids and (id, peer) pairs.
#[derive(Debug)]
pub struct SeenCache {
    entries: HashSet<SeenKey>,
    insertion_order: VecDeque<SeenKey>,
    max_size: usize,
}

impl SeenCache {
    /// Creates a cache bounded at `max_size` entries.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashSet::with_capacity(max_size),
            insertion_order: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// True iff the bare id has been recorded.
    pub fn contains_id(&self, id: &Hash) -> bool {
        self.entries.contains(&SeenKey::Id(*id))
    }

    /// True iff the id has been credited to this specific peer.
    pub fn contains_pair(&self, id: &Hash, peer: &PeerAddr) -> bool {
        self.entries.contains(&SeenKey::IdPeer(*id, *peer))
    }

    /// Combined membership test: the bare id, or — when a peer is
    /// supplied — the (id, peer) pair.
    pub fn already_processed(&self, id: &Hash, peer: Option<&PeerAddr>) -> bool {
        self.contains_id(id) || peer.is_some_and(|peer| self.contains_pair(id, peer))
    }

    /// Records the bare id.
    pub fn insert_id(&mut self, id: Hash) {
        self.insert(SeenKey::Id(id));
    }

    /// Records an (id, peer) send credit.
    pub fn insert_pair(&mut self, id: Hash, peer: PeerAddr) {
        self.insert(SeenKey::IdPeer(id, peer));
    }

    fn insert(&mut self, key: SeenKey) {
        if self.entries.contains(&key) {
            return;
        }
        if self.entries.len() >= self.max_size {
            if let Some(oldest) = self.insertion_order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key.clone());
        self.insertion_order.push_back(key);
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True iff nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(d: u8) -> PeerAddr {
        PeerAddr::new(10, 0, 0, d, 1984)
    }

    #[test]
    fn test_bare_id_membership() {
        let mut cache = SeenCache::new(100);
        assert!(!cache.contains_id(&[1u8; 32]));
        cache.insert_id([1u8; 32]);
        assert!(cache.contains_id(&[1u8; 32]));
    }

    #[test]
    fn test_pair_does_not_imply_bare_id() {
        let mut cache = SeenCache::new(100);
        cache.insert_pair([1u8; 32], peer(1));

        assert!(cache.contains_pair(&[1u8; 32], &peer(1)));
        assert!(!cache.contains_id(&[1u8; 32]));
        assert!(!cache.contains_pair(&[1u8; 32], &peer(2)));
    }

    #[test]
    fn test_combined_membership() {
        let mut cache = SeenCache::new(100);
        cache.insert_pair([1u8; 32], peer(1));
        cache.insert_id([2u8; 32]);

        assert!(cache.already_processed(&[1u8; 32], Some(&peer(1))));
        assert!(!cache.already_processed(&[1u8; 32], Some(&peer(2))));
        assert!(!cache.already_processed(&[1u8; 32], None));
        assert!(cache.already_processed(&[2u8; 32], None));
        assert!(cache.already_processed(&[2u8; 32], Some(&peer(9))));
    }

    #[test]
    fn test_duplicate_insert_is_idempotent() {
        let mut cache = SeenCache::new(100);
        cache.insert_id([1u8; 32]);
        cache.insert_id([1u8; 32]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_oldest_first_eviction() {
        let mut cache = SeenCache::new(3);
        cache.insert_id([1u8; 32]);
        cache.insert_id([2u8; 32]);
        cache.insert_id([3u8; 32]);
        cache.insert_id([4u8; 32]);

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains_id(&[1u8; 32]));
        assert!(cache.contains_id(&[4u8; 32]));
    }
}
