//! # Wallet Ledger
//!
//! The per-address balance and last-transaction record the verifier checks
//! transaction chains against. Owned and persisted by the node subsystem;
//! this crate only defines the in-memory shape and the apply rule.

use std::collections::HashMap;

use primitive_types::U256;
use tracing::debug;

use crate::entities::{Address, TxId};
use crate::errors::LedgerError;

/// A single wallet record: balance plus the id of the owner's most recent
/// transaction (empty bytes before the first one).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletEntry {
    pub balance: U256,
    pub last_tx: Vec<u8>,
}

impl WalletEntry {
    pub fn new(balance: U256, last_tx: Vec<u8>) -> Self {
        Self { balance, last_tx }
    }
}

/// The wallet ledger: a set of wallet entries indexed by address.
///
/// An empty ledger passes the last-transaction chain check unconditionally.
/// That is the genesis-bootstrap escape hatch; production deployments seed
/// the ledger before accepting transactions.
#[derive(Clone, Debug, Default)]
pub struct WalletLedger {
    entries: HashMap<Address, WalletEntry>,
}

impl WalletLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from `(address, balance, last_tx)` triples.
    pub fn from_entries(entries: impl IntoIterator<Item = (Address, U256, Vec<u8>)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(address, balance, last_tx)| (address, WalletEntry::new(balance, last_tx)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn lookup(&self, address: &Address) -> Option<&WalletEntry> {
        self.entries.get(address)
    }

    pub fn insert(&mut self, address: Address, entry: WalletEntry) {
        self.entries.insert(address, entry);
    }

    /// Applies a verified transfer: debit `quantity + reward` from the owner,
    /// credit `quantity` to the target, and advance the owner's last-tx to
    /// the applied transaction's id.
    ///
    /// On an empty ledger this is a no-op: the chain check already passed
    /// unconditionally, and there is no wallet to debit. Balances saturate
    /// at zero; sufficiency is a consensus concern, not a chain concern.
    pub fn apply_transfer(
        &mut self,
        owner: Address,
        target: Option<Address>,
        quantity: U256,
        reward: U256,
        new_last_tx: TxId,
    ) -> Result<(), LedgerError> {
        if self.entries.is_empty() {
            debug!("apply_transfer on empty ledger; nothing to update");
            return Ok(());
        }

        let entry = self
            .entries
            .get_mut(&owner)
            .ok_or(LedgerError::UnknownWallet(owner))?;
        entry.balance = entry.balance.saturating_sub(quantity + reward);
        entry.last_tx = new_last_tx.to_vec();

        if let Some(target) = target {
            let credited = self
                .entries
                .entry(target)
                .or_insert_with(|| WalletEntry::new(U256::zero(), Vec::new()));
            credited.balance += quantity;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        [byte; 32]
    }

    #[test]
    fn test_empty_ledger_apply_is_noop() {
        let mut ledger = WalletLedger::new();
        let result = ledger.apply_transfer(addr(1), None, U256::from(5), U256::from(1), [9u8; 32]);
        assert!(result.is_ok());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_apply_transfer_moves_funds_and_advances_last_tx() {
        let mut ledger = WalletLedger::from_entries([
            (addr(1), U256::from(1000), Vec::new()),
            (addr(2), U256::from(50), Vec::new()),
        ]);

        ledger
            .apply_transfer(addr(1), Some(addr(2)), U256::from(100), U256::from(10), [7u8; 32])
            .unwrap();

        let owner = ledger.lookup(&addr(1)).unwrap();
        assert_eq!(owner.balance, U256::from(890));
        assert_eq!(owner.last_tx, vec![7u8; 32]);

        let target = ledger.lookup(&addr(2)).unwrap();
        assert_eq!(target.balance, U256::from(150));
    }

    #[test]
    fn test_apply_transfer_creates_target_wallet() {
        let mut ledger = WalletLedger::from_entries([(addr(1), U256::from(1000), Vec::new())]);

        ledger
            .apply_transfer(addr(1), Some(addr(3)), U256::from(40), U256::zero(), [7u8; 32])
            .unwrap();

        let target = ledger.lookup(&addr(3)).unwrap();
        assert_eq!(target.balance, U256::from(40));
        assert!(target.last_tx.is_empty());
    }

    #[test]
    fn test_apply_transfer_unknown_owner() {
        let mut ledger = WalletLedger::from_entries([(addr(1), U256::from(10), Vec::new())]);
        let result = ledger.apply_transfer(addr(9), None, U256::one(), U256::one(), [7u8; 32]);
        assert_eq!(result, Err(LedgerError::UnknownWallet(addr(9))));
    }

    #[test]
    fn test_balance_saturates_at_zero() {
        let mut ledger = WalletLedger::from_entries([(addr(1), U256::from(5), Vec::new())]);
        ledger
            .apply_transfer(addr(1), None, U256::from(100), U256::from(100), [7u8; 32])
            .unwrap();
        assert_eq!(ledger.lookup(&addr(1)).unwrap().balance, U256::zero());
    }
}
