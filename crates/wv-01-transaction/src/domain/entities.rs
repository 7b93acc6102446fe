//! # Transaction Entities
//!
//! The transaction record and its tag pairs.
//!
//! ## Lifecycle
//!
//! A transaction is created unsigned with a freshly drawn random id, then
//! mutated exactly once by [`Transaction::sign`], which overwrites `owner`,
//! `signature`, and `id`. From that point the record is treated as
//! immutable; any further field mutation invalidates the signature.

use primitive_types::U256;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use shared_crypto::{sha256, to_wallet_address, CryptoError, RsaKeyPair};
use shared_types::TxId;

use super::encoding::canonical;

/// A named byte-string pair attached to a transaction.
///
/// The pair shape is fixed by this type; the serialized concatenation of
/// all pairs is bounded by [`super::verify::MAX_TAGS_BYTES`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name bytes.
    pub name: Vec<u8>,
    /// Tag value bytes.
    pub value: Vec<u8>,
}

impl Tag {
    /// Creates a tag pair.
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Byte length of the delimiter-free flattened form.
    ///
    /// Used only for the size bound; two different tag lists can flatten to
    /// the same length, so this is never a key.
    pub fn flattened_len(&self) -> usize {
        self.name.len() + self.value.len()
    }
}

/// A weavenet transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// 32-byte identifier. Random for unsigned transactions, SHA-256 of the
    /// signature once signed.
    pub id: TxId,
    /// Id of the owner's previous transaction, or empty before the first.
    pub last_tx: Vec<u8>,
    /// Owner public-key bytes (RSA modulus, big-endian).
    pub owner: Vec<u8>,
    /// Ordered tag pairs.
    pub tags: Vec<Tag>,
    /// 32-byte recipient address, or empty for pure-data transactions.
    pub target: Vec<u8>,
    /// Transferred quantity in Winston.
    pub quantity: U256,
    /// Arbitrary payload bytes.
    pub data: Vec<u8>,
    /// RSA signature over the canonical encoding.
    pub signature: Vec<u8>,
    /// Fee in Winston; must cover the size-based minimum cost.
    pub reward: U256,
}

impl Transaction {
    /// Creates an empty unsigned transaction with a fresh random id.
    ///
    /// The id is drawn from the operating system CSPRNG so unsigned ids are
    /// unpredictable on the network.
    pub fn new() -> Self {
        let mut id = [0u8; 32];
        OsRng.fill_bytes(&mut id);
        Self {
            id,
            last_tx: Vec::new(),
            owner: Vec::new(),
            tags: Vec::new(),
            target: Vec::new(),
            quantity: U256::zero(),
            data: Vec::new(),
            signature: Vec::new(),
            reward: U256::zero(),
        }
    }

    /// Builder method: set the payload bytes.
    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = data.into();
        self
    }

    /// Builder method: set the reward.
    pub fn with_reward(mut self, reward: U256) -> Self {
        self.reward = reward;
        self
    }

    /// Builder method: set the previous-transaction reference.
    pub fn with_last_tx(mut self, last_tx: impl Into<Vec<u8>>) -> Self {
        self.last_tx = last_tx.into();
        self
    }

    /// Builder method: set the tag pairs.
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Creates an unsigned transfer to `destination`.
    ///
    /// The destination may be a full public key or an already-derived
    /// 32-byte address; public keys are normalized to their address.
    pub fn transfer(
        destination: &[u8],
        quantity: U256,
        reward: U256,
        last_tx: impl Into<Vec<u8>>,
    ) -> Self {
        let target = if destination.len() == 32 {
            destination.to_vec()
        } else {
            to_wallet_address(destination).to_vec()
        };
        let mut tx = Self::new().with_reward(reward).with_last_tx(last_tx);
        tx.target = target;
        tx.quantity = quantity;
        tx
    }

    /// Signs the transaction with the given wallet keypair.
    ///
    /// Sets `owner` to the keypair's public bytes, signs the canonical
    /// encoding, then rebinds `id` to the SHA-256 of the signature. The id
    /// of a signed transaction therefore depends only on its signature bits.
    pub fn sign(&mut self, keypair: &RsaKeyPair) -> Result<(), CryptoError> {
        self.owner = keypair.owner_bytes();
        let signature = keypair.sign(&canonical(self))?;
        self.id = sha256(&signature);
        self.signature = signature;
        Ok(())
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draws_distinct_ids() {
        let a = Transaction::new();
        let b = Transaction::new();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_builder_chain() {
        let tx = Transaction::new()
            .with_data(b"TEST DATA".to_vec())
            .with_reward(U256::from(10))
            .with_last_tx(vec![1u8; 32]);
        assert_eq!(tx.data, b"TEST DATA");
        assert_eq!(tx.reward, U256::from(10));
        assert_eq!(tx.last_tx, vec![1u8; 32]);
    }

    #[test]
    fn test_transfer_keeps_address_destination() {
        let address = [7u8; 32];
        let tx = Transaction::transfer(&address, U256::from(5), U256::from(1), Vec::new());
        assert_eq!(tx.target, address.to_vec());
    }

    #[test]
    fn test_transfer_normalizes_public_key_destination() {
        // Anything that is not exactly 32 bytes is treated as a public key.
        let public_key = vec![0xAB; 256];
        let tx = Transaction::transfer(&public_key, U256::from(5), U256::from(1), Vec::new());
        assert_eq!(tx.target, to_wallet_address(&public_key).to_vec());
        assert_eq!(tx.target.len(), 32);
    }

    #[test]
    fn test_tag_flattened_len() {
        let tag = Tag::new(b"Content-Type".to_vec(), b"text/plain".to_vec());
        assert_eq!(tag.flattened_len(), 22);
    }
}
