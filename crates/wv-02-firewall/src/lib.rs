//! # Content Firewall Subsystem (wv-02)
//!
//! Screens transaction payloads against a table of binary signatures
//! before the bridge forwards them anywhere.
//!
//! ## Architecture Role
//!
//! ```text
//! [Bridge (3)] ──ScanRequest──→ [Firewall (2)] ──(data, pass)──→ reply
//!                                     │
//!                                     ↓ loaded once at start
//!                              [SignatureSource]
//! ```
//!
//! ## Semantics
//!
//! - Blocks always pass (block content is consensus business).
//! - Transactions pass iff no loaded signature matches their payload.
//! - Any other request kind fails closed.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{find_match, ScanSignature, ScanTarget};
pub use ports::{SignatureSource, StaticSignatureSource};
pub use service::{FirewallHandle, FirewallService};
