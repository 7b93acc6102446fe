//! # RSA Signatures
//!
//! Wallet signatures over the canonical transaction encoding.
//!
//! The wire format fixes the scheme: RSA with PKCS#1 v1.5 padding over a
//! SHA-256 digest, public exponent 65537. A wallet's public identity is the
//! big-endian modulus (the "owner bytes", at most 512 bytes for a 4096-bit
//! key), and its address is the SHA-256 of those bytes.

use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use shared_types::Address;

use crate::errors::CryptoError;
use crate::hashing::sha256;

/// Fixed RSA public exponent. Owner bytes only carry the modulus.
pub const RSA_PUBLIC_EXPONENT: u64 = 65537;

/// Default modulus size for newly generated wallets.
pub const DEFAULT_KEY_BITS: usize = 4096;

/// An RSA wallet keypair.
pub struct RsaKeyPair {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
}

impl RsaKeyPair {
    /// Generate a fresh keypair with the default modulus size.
    pub fn generate() -> Result<Self, CryptoError> {
        Self::generate_with_bits(DEFAULT_KEY_BITS)
    }

    /// Generate a fresh keypair with an explicit modulus size.
    pub fn generate_with_bits(bits: usize) -> Result<Self, CryptoError> {
        let private_key = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;
        let public_key = private_key.to_public_key();
        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// The owner bytes: big-endian modulus of the public key.
    pub fn owner_bytes(&self) -> Vec<u8> {
        self.public_key.n().to_bytes_be()
    }

    /// The wallet address: SHA-256 of the owner bytes.
    pub fn address(&self) -> Address {
        to_wallet_address(&self.owner_bytes())
    }

    /// Sign a message: PKCS#1 v1.5 over the SHA-256 digest.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let digest: [u8; 32] = Sha256::digest(message).into();
        self.private_key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))
    }
}

/// Verify `signature` over `message` under the public key carried in
/// `owner` bytes. Returns `false` for malformed keys as well as for
/// signature mismatches; verification never raises.
pub fn verify_signature(owner: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let modulus = BigUint::from_bytes_be(owner);
    let public_key = match RsaPublicKey::new(modulus, BigUint::from(RSA_PUBLIC_EXPONENT)) {
        Ok(key) => key,
        Err(_) => return false,
    };
    let digest: [u8; 32] = Sha256::digest(message).into();
    public_key
        .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
        .is_ok()
}

/// Derive a 32-byte wallet address from owner public-key bytes.
pub fn to_wallet_address(owner: &[u8]) -> Address {
    sha256(owner)
}
