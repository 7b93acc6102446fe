//! # SHA-256 Hashing
//!
//! The single hash algorithm visible on the wire: transaction ids, wallet
//! addresses, and block hashes are all 32-byte SHA-256 digests.

use sha2::{Digest, Sha256};
use shared_types::Hash;

/// Stateful SHA-256 hasher for streaming input.
pub struct Sha256Hasher {
    inner: Sha256,
}

impl Sha256Hasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> Hash {
        self.inner.finalize().into()
    }
}

impl Default for Sha256Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_length() {
        assert_eq!(sha256(b"Hello, World!").len(), 32);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(sha256(b"test"), sha256(b"test"));
    }

    #[test]
    fn test_different_inputs() {
        assert_ne!(sha256(b"input1"), sha256(b"input2"));
    }

    #[test]
    fn test_streaming_matches_oneshot() {
        let mut hasher = Sha256Hasher::new();
        hasher.update(b"hello ").update(b"world");
        assert_eq!(hasher.finalize(), sha256(b"hello world"));
    }

    #[test]
    fn test_known_vector() {
        // SHA-256 of the empty string.
        let digest = sha256(b"");
        assert_eq!(
            digest[..4],
            [0xe3, 0xb0, 0xc4, 0x42],
        );
    }
}
