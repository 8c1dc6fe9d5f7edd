//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Invalid signature encoding (not valid hex, DER, or raw bytes)
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Signature does not verify against the message and public key
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}
