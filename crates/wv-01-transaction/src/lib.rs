//! # Transaction Subsystem (wv-01)
//!
//! Constructs, signs, prices, and verifies weavenet transactions.
//!
//! ## Architecture Role
//!
//! ```text
//! [HTTP iface] ──new tx──→ [Transaction (1)] ──verified──→ [Bridge (3)]
//!                                │
//!                                ↓ canonical bytes
//!                          [shared-crypto]
//! ```
//!
//! ## Trust-Critical Properties
//!
//! - The canonical encoding is bit-exact: it is both the signing input and,
//!   through the signature, the id input.
//! - A signed transaction is immutable; mutating any canonical field
//!   invalidates the signature.
//! - The reward must cover the size-based minimum cost at the current
//!   network difficulty.

pub mod domain;

pub use domain::encoding::canonical;
pub use domain::entities::{Tag, Transaction};
pub use domain::pricing::{min_cost, BASE_FIELD_BYTES, COST_PER_BYTE, DIFF_CENTER};
pub use domain::verify::{tx_cost_above_min, verify, verify_txs, VerifierConfig};
