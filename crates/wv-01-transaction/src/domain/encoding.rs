//! # Canonical Encoding
//!
//! The deterministic byte layout of a transaction, used as both the signing
//! input and (through the signature) the id input. Must stay bit-exact
//! across implementations or signatures stop verifying.
//!
//! Layout:
//!
//! ```text
//! owner || target || data || ascii_decimal(quantity) || ascii_decimal(reward) || last_tx
//! ```
//!
//! Quantities are base-10 ASCII with no leading zeros and no sign; empty
//! byte fields contribute nothing.

use super::entities::Transaction;

/// Serializes the canonical signing/id input for a transaction.
///
/// The signature field itself is not part of the encoding.
pub fn canonical(tx: &Transaction) -> Vec<u8> {
    let quantity = tx.quantity.to_string();
    let reward = tx.reward.to_string();

    let mut out = Vec::with_capacity(
        tx.owner.len()
            + tx.target.len()
            + tx.data.len()
            + quantity.len()
            + reward.len()
            + tx.last_tx.len(),
    );
    out.extend_from_slice(&tx.owner);
    out.extend_from_slice(&tx.target);
    out.extend_from_slice(&tx.data);
    out.extend_from_slice(quantity.as_bytes());
    out.extend_from_slice(reward.as_bytes());
    out.extend_from_slice(&tx.last_tx);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;

    #[test]
    fn test_layout_order() {
        let mut tx = Transaction::new();
        tx.owner = b"OWNER".to_vec();
        tx.target = b"TARGET".to_vec();
        tx.data = b"DATA".to_vec();
        tx.quantity = U256::from(123);
        tx.reward = U256::from(45);
        tx.last_tx = b"LAST".to_vec();

        assert_eq!(canonical(&tx), b"OWNERTARGETDATA12345LAST".to_vec());
    }

    #[test]
    fn test_zero_quantities_encode_as_single_digit() {
        let tx = Transaction::new().with_data(b"D".to_vec());
        // quantity and reward are both zero
        assert_eq!(canonical(&tx), b"D00".to_vec());
    }

    #[test]
    fn test_empty_fields_contribute_nothing() {
        let mut tx = Transaction::new();
        tx.quantity = U256::from(7);
        tx.reward = U256::from(8);
        assert_eq!(canonical(&tx), b"78".to_vec());
    }

    #[test]
    fn test_signature_not_part_of_encoding() {
        let mut tx = Transaction::new().with_data(b"D".to_vec());
        let before = canonical(&tx);
        tx.signature = vec![0xFF; 64];
        assert_eq!(canonical(&tx), before);
    }

    #[test]
    fn test_deterministic() {
        let tx = Transaction::new()
            .with_data(b"payload".to_vec())
            .with_reward(U256::from(1_000_000u64));
        assert_eq!(canonical(&tx), canonical(&tx.clone()));
    }
}
