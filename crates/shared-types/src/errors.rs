//! Shared error types.

use thiserror::Error;

use crate::entities::Address;

/// Errors raised when mutating the wallet ledger.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The owner wallet is not present in a non-empty ledger.
    #[error("unknown wallet {}", hex_prefix(.0))]
    UnknownWallet(Address),
}

fn hex_prefix(address: &Address) -> String {
    hex::encode(&address[..4])
}
