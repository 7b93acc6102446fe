//! # Shared Types - Cross-Subsystem Entities
//!
//! Defines the core entities every weavenet subsystem speaks in:
//!
//! | Cluster | Types |
//! |---------|-------|
//! | Identity | `Hash`, `TxId`, `Address` |
//! | Tokens | `WINSTON_PER_AR`, `ar_to_winston` |
//! | Network | `PeerAddr`, `Block`, `BlockStatus` |
//! | Ledger | `WalletLedger`, `WalletEntry` |

pub mod entities;
pub mod errors;
pub mod ledger;

pub use entities::{ar_to_winston, Address, Block, BlockStatus, Hash, PeerAddr, TxId};
pub use entities::{DEFAULT_HTTP_PORT, WINSTON_PER_AR};
pub use errors::LedgerError;
pub use ledger::{WalletEntry, WalletLedger};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
