//! # Transaction Verifier
//!
//! Composes the admission checks: signature, pricing, field-size bounds,
//! last-transaction chaining, and id binding. The verdict is a plain
//! boolean; individual failures are reported at `debug!` level and never
//! raise.

use primitive_types::U256;
use shared_crypto::{sha256, to_wallet_address, verify_signature};
use shared_types::{Address, WalletLedger};
use tracing::{debug, warn};

use super::encoding::canonical;
use super::entities::Transaction;
use super::pricing::min_cost;

/// Maximum byte length of `last_tx`.
pub const MAX_LAST_TX_BYTES: usize = 32;
/// Maximum byte length of the owner public key.
pub const MAX_OWNER_BYTES: usize = 512;
/// Maximum byte length of the flattened tag list.
pub const MAX_TAGS_BYTES: usize = 2048;
/// Maximum byte length of the target address.
pub const MAX_TARGET_BYTES: usize = 32;
/// Maximum decimal digits of quantity and reward.
pub const MAX_AMOUNT_DIGITS: usize = 21;
/// Maximum byte length of the signature.
pub const MAX_SIGNATURE_BYTES: usize = 512;

/// Verifier configuration.
#[derive(Clone, Debug, Default)]
pub struct VerifierConfig {
    /// Accept transactions without checking signature and id binding.
    ///
    /// Exists for local development networks only. Off by default; enabling
    /// it logs a warning because it disables the chain's core trust
    /// property.
    pub allow_unsigned_txs: bool,
}

impl VerifierConfig {
    /// Strict configuration: every check enforced.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Development configuration that skips signature and id checks.
    pub fn allow_unsigned() -> Self {
        warn!("transaction verifier accepting UNSIGNED transactions; never use on a live network");
        Self {
            allow_unsigned_txs: true,
        }
    }
}

/// True iff the reward covers the size-based minimum cost at `diff`.
pub fn tx_cost_above_min(tx: &Transaction, diff: u64) -> bool {
    tx.reward >= min_cost(tx.data.len() as u64, diff)
}

/// Verifies a single transaction against the current difficulty and wallet
/// ledger. All checks must pass simultaneously.
pub fn verify(tx: &Transaction, diff: u64, ledger: &WalletLedger, config: &VerifierConfig) -> bool {
    if !config.allow_unsigned_txs {
        if !verify_signature(&tx.owner, &canonical(tx), &tx.signature) {
            debug!(id = %hex_id(&tx.id), "rejected: invalid signature");
            return false;
        }
        if tx.id != sha256(&tx.signature) {
            debug!(id = %hex_id(&tx.id), "rejected: id does not bind signature");
            return false;
        }
    }
    if !tx_cost_above_min(tx, diff) {
        debug!(
            id = %hex_id(&tx.id),
            reward = %tx.reward,
            required = %min_cost(tx.data.len() as u64, diff),
            "rejected: reward below minimum cost"
        );
        return false;
    }
    if !fields_within_bounds(tx) {
        debug!(id = %hex_id(&tx.id), "rejected: field size bound exceeded");
        return false;
    }
    if !last_tx_matches(tx, ledger) {
        debug!(id = %hex_id(&tx.id), "rejected: last-tx chain mismatch");
        return false;
    }
    true
}

/// Verifies a sequence in order, applying each verified transaction to the
/// ledger before checking the next. Any single failure fails the batch.
pub fn verify_txs(
    txs: &[Transaction],
    diff: u64,
    ledger: &WalletLedger,
    config: &VerifierConfig,
) -> bool {
    let mut ledger = ledger.clone();
    for tx in txs {
        if !verify(tx, diff, &ledger, config) {
            return false;
        }
        let owner = to_wallet_address(&tx.owner);
        if ledger
            .apply_transfer(owner, target_address(tx), tx.quantity, tx.reward, tx.id)
            .is_err()
        {
            return false;
        }
    }
    true
}

/// Checks every field-size bound from the wire contract.
///
/// Tag pairs are structurally (name, value) two-tuples by construction;
/// the bound applies to their delimiter-free flattened length.
pub fn fields_within_bounds(tx: &Transaction) -> bool {
    let tags_len: usize = tx.tags.iter().map(|tag| tag.flattened_len()).sum();
    tx.last_tx.len() <= MAX_LAST_TX_BYTES
        && tx.owner.len() <= MAX_OWNER_BYTES
        && tags_len <= MAX_TAGS_BYTES
        && tx.target.len() <= MAX_TARGET_BYTES
        && decimal_digits(tx.quantity) <= MAX_AMOUNT_DIGITS
        && tx.signature.len() <= MAX_SIGNATURE_BYTES
        && decimal_digits(tx.reward) <= MAX_AMOUNT_DIGITS
}

/// The last-transaction chain check.
///
/// An empty ledger passes unconditionally (genesis bootstrap). Otherwise
/// the owner's wallet must exist and its recorded last-tx must equal the
/// transaction's `last_tx`.
pub fn last_tx_matches(tx: &Transaction, ledger: &WalletLedger) -> bool {
    if ledger.is_empty() {
        return true;
    }
    let owner = to_wallet_address(&tx.owner);
    match ledger.lookup(&owner) {
        Some(entry) => entry.last_tx == tx.last_tx,
        None => false,
    }
}

fn target_address(tx: &Transaction) -> Option<Address> {
    if tx.target.len() == 32 {
        let mut address = [0u8; 32];
        address.copy_from_slice(&tx.target);
        Some(address)
    } else {
        None
    }
}

fn decimal_digits(value: U256) -> usize {
    value.to_string().len()
}

fn hex_id(id: &[u8; 32]) -> String {
    hex::encode(&id[..4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Tag;
    use once_cell::sync::Lazy;
    use shared_crypto::RsaKeyPair;
    use shared_types::ar_to_winston;

    static KEYPAIR: Lazy<RsaKeyPair> =
        Lazy::new(|| RsaKeyPair::generate_with_bits(2048).unwrap());
    static OTHER_KEYPAIR: Lazy<RsaKeyPair> =
        Lazy::new(|| RsaKeyPair::generate_with_bits(2048).unwrap());

    fn signed_data_tx(data: &[u8], reward: U256) -> Transaction {
        let mut tx = Transaction::new().with_data(data.to_vec()).with_reward(reward);
        tx.sign(&KEYPAIR).unwrap();
        tx
    }

    fn strict() -> VerifierConfig {
        VerifierConfig::strict()
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let tx = signed_data_tx(b"TEST DATA", ar_to_winston(10));
        assert!(verify(&tx, 1, &WalletLedger::new(), &strict()));
    }

    #[test]
    fn test_forged_data_fails() {
        let mut tx = signed_data_tx(b"TEST DATA", ar_to_winston(10));
        tx.data = b"FAKE DATA".to_vec();
        assert!(!verify(&tx, 1, &WalletLedger::new(), &strict()));
    }

    #[test]
    fn test_tampered_quantity_fails() {
        let mut tx = signed_data_tx(b"TEST DATA", ar_to_winston(10));
        tx.quantity = U256::from(1);
        assert!(!verify(&tx, 1, &WalletLedger::new(), &strict()));
    }

    #[test]
    fn test_tampered_target_fails() {
        let mut tx = signed_data_tx(b"TEST DATA", ar_to_winston(10));
        tx.target = vec![9u8; 32];
        assert!(!verify(&tx, 1, &WalletLedger::new(), &strict()));
    }

    #[test]
    fn test_tampered_last_tx_fails() {
        let mut tx = signed_data_tx(b"TEST DATA", ar_to_winston(10));
        tx.last_tx = vec![9u8; 32];
        assert!(!verify(&tx, 1, &WalletLedger::new(), &strict()));
    }

    #[test]
    fn test_swapped_owner_fails() {
        let mut tx = signed_data_tx(b"TEST DATA", ar_to_winston(10));
        tx.owner = OTHER_KEYPAIR.owner_bytes();
        assert!(!verify(&tx, 1, &WalletLedger::new(), &strict()));
    }

    #[test]
    fn test_id_binds_signature() {
        let tx = signed_data_tx(b"TEST DATA", ar_to_winston(10));
        assert_eq!(tx.id, sha256(&tx.signature));

        let mut forged = tx.clone();
        forged.id = [0u8; 32];
        assert!(!verify(&forged, 1, &WalletLedger::new(), &strict()));
    }

    #[test]
    fn test_reward_below_cost_fails() {
        let tx = signed_data_tx(b"TEST DATA", ar_to_winston(10));
        assert!(tx_cost_above_min(&tx, 1));

        let mut cheap = Transaction::new()
            .with_data(b"TEST DATA".to_vec())
            .with_reward(U256::one());
        cheap.sign(&KEYPAIR).unwrap();
        assert!(!tx_cost_above_min(&cheap, 10));
        assert!(!verify(&cheap, 10, &WalletLedger::new(), &strict()));
    }

    #[test]
    fn test_oversized_tags_fail() {
        let mut tx = Transaction::new()
            .with_data(b"TEST DATA".to_vec())
            .with_reward(ar_to_winston(10))
            .with_tags(vec![Tag::new(vec![0u8; 1500], vec![0u8; 1500])]);
        tx.sign(&KEYPAIR).unwrap();
        assert!(!verify(&tx, 1, &WalletLedger::new(), &strict()));
    }

    #[test]
    fn test_tags_within_bound_pass() {
        let mut tx = Transaction::new()
            .with_data(b"TEST DATA".to_vec())
            .with_reward(ar_to_winston(10))
            .with_tags(vec![
                Tag::new(b"Content-Type".to_vec(), b"text/plain".to_vec()),
                Tag::new(b"App".to_vec(), b"weavenet".to_vec()),
            ]);
        tx.sign(&KEYPAIR).unwrap();
        assert!(verify(&tx, 1, &WalletLedger::new(), &strict()));
    }

    #[test]
    fn test_oversized_last_tx_rejected_by_bounds() {
        let mut tx = Transaction::new()
            .with_data(b"D".to_vec())
            .with_reward(ar_to_winston(10))
            .with_last_tx(vec![0u8; 33]);
        tx.sign(&KEYPAIR).unwrap();
        assert!(!fields_within_bounds(&tx));
        assert!(!verify(&tx, 1, &WalletLedger::new(), &strict()));
    }

    #[test]
    fn test_last_tx_chain_against_ledger() {
        let w2_address = KEYPAIR.address();
        let id1 = vec![0x11u8; 32];
        let ledger = WalletLedger::from_entries([
            ([1u8; 32], U256::from(1000), Vec::new()),
            (w2_address, U256::from(2000), id1.clone()),
            ([3u8; 32], U256::from(3000), Vec::new()),
        ]);

        let mut chained = Transaction::new()
            .with_data(b"TEST DATA".to_vec())
            .with_reward(ar_to_winston(10))
            .with_last_tx(id1);
        chained.sign(&KEYPAIR).unwrap();
        assert!(verify(&chained, 1, &ledger, &strict()));

        let mut unchained = Transaction::new()
            .with_data(b"TEST DATA".to_vec())
            .with_reward(ar_to_winston(10));
        unchained.sign(&KEYPAIR).unwrap();
        assert!(!verify(&unchained, 1, &ledger, &strict()));
    }

    #[test]
    fn test_unknown_owner_fails_on_nonempty_ledger() {
        let ledger = WalletLedger::from_entries([([1u8; 32], U256::from(1000), Vec::new())]);
        let tx = signed_data_tx(b"TEST DATA", ar_to_winston(10));
        assert!(!verify(&tx, 1, &ledger, &strict()));
    }

    #[test]
    fn test_verify_txs_chains_ledger_updates() {
        let owner = KEYPAIR.address();
        let ledger = WalletLedger::from_entries([(owner, ar_to_winston(100), Vec::new())]);

        let mut first = Transaction::new()
            .with_data(b"TEST DATA".to_vec())
            .with_reward(ar_to_winston(10));
        first.sign(&KEYPAIR).unwrap();

        // The second transaction must reference the first one's id.
        let mut second = Transaction::new()
            .with_data(b"MORE DATA".to_vec())
            .with_reward(ar_to_winston(10))
            .with_last_tx(first.id.to_vec());
        second.sign(&KEYPAIR).unwrap();

        assert!(verify_txs(&[first.clone(), second.clone()], 1, &ledger, &strict()));
        // Out of order the chain breaks.
        assert!(!verify_txs(&[second, first], 1, &ledger, &strict()));
    }

    #[test]
    fn test_unsigned_bypass_is_gated() {
        let mut tx = Transaction::new()
            .with_data(b"TEST DATA".to_vec())
            .with_reward(ar_to_winston(10));
        tx.owner = KEYPAIR.owner_bytes();

        assert!(!verify(&tx, 1, &WalletLedger::new(), &strict()));
        assert!(verify(
            &tx,
            1,
            &WalletLedger::new(),
            &VerifierConfig::allow_unsigned()
        ));
    }
}
