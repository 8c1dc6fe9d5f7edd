//! # Passphrase Identities
//!
//! Keypair derivation from a passphrase: the private key is the SHA-256
//! digest of the passphrase bytes, the public key is the compressed
//! secp256k1 point. The same secret scalar backs both the ECDSA and the
//! Schnorr signing paths.

use crate::errors::CryptoError;
use crate::hashing::sha256;
use k256::ecdsa::{SigningKey, VerifyingKey};
use zeroize::Zeroize;

/// Compressed secp256k1 public key (33 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey([u8; 33]);

impl PublicKey {
    /// Create from compressed bytes (33 bytes, starting with 0x02 or 0x03).
    pub fn from_bytes(bytes: [u8; 33]) -> Result<Self, CryptoError> {
        // Validate it's a valid compressed point
        VerifyingKey::from_sec1_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Create from a lowercase hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let decoded = hex::decode(hex_str).map_err(|_| CryptoError::InvalidPublicKey)?;
        let bytes: [u8; 33] = decoded
            .try_into()
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        Self::from_bytes(bytes)
    }

    /// Get raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Hex encoding of the compressed point.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The 32-byte x coordinate, used by the BIP-340 verification path.
    pub fn x_only(&self) -> &[u8] {
        &self.0[1..]
    }
}

/// secp256k1 keypair derived from a passphrase or raw secret.
pub struct KeyPair {
    secret: [u8; 32],
    public: PublicKey,
}

impl KeyPair {
    /// Derive a keypair from a passphrase: secret = SHA-256(passphrase).
    pub fn from_passphrase(passphrase: &str) -> Result<Self, CryptoError> {
        Self::from_secret_bytes(sha256(passphrase.as_bytes()))
    }

    /// Create from raw secret key bytes (32 bytes).
    pub fn from_secret_bytes(secret: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes(&secret.into()).map_err(|_| CryptoError::InvalidPrivateKey)?;

        // SEC1 compressed encoding is always exactly 33 bytes
        let sec1 = signing_key.verifying_key().to_sec1_bytes();
        let mut compressed = [0u8; 33];
        compressed.copy_from_slice(&sec1[..33]);

        Ok(Self {
            secret,
            public: PublicKey(compressed),
        })
    }

    /// The compressed public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Raw secret scalar bytes. Callers must not retain copies.
    pub(crate) fn secret_bytes(&self) -> &[u8; 32] {
        &self.secret
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}
