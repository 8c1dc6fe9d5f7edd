//! # ECDSA Signatures (secp256k1)
//!
//! Transaction signing and verification over prehashed content.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - DER signature encoding on the wire, hex at the API boundary
//!
//! Signing operates on the 32-byte SHA-256 digest of a transaction's
//! signable wire bytes; this module never hashes.

use crate::encoding::SignatureInput;
use crate::errors::CryptoError;
use crate::hashing::Hash;
use crate::identity::{KeyPair, PublicKey};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};

/// Sign a message hash, returning the DER-encoded signature as hex.
///
/// Deterministic: the same `(hash, keys)` input always produces the same
/// signature bytes.
pub fn sign(hash: &Hash, keys: &KeyPair) -> Result<String, CryptoError> {
    let signing_key = SigningKey::from_bytes(keys.secret_bytes().into())
        .map_err(|_| CryptoError::InvalidPrivateKey)?;

    let signature: Signature = signing_key
        .sign_prehash(hash)
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

    Ok(hex::encode(signature.to_der().as_bytes()))
}

/// Verify a DER-encoded signature (hex or raw bytes) against a message
/// hash and a compressed public key.
pub fn verify(
    hash: &Hash,
    signature: SignatureInput<'_>,
    public_key: &PublicKey,
) -> Result<bool, CryptoError> {
    let der = signature.to_bytes()?;
    let parsed =
        Signature::from_der(&der).map_err(|_| CryptoError::InvalidSignatureFormat)?;

    let verifying_key = VerifyingKey::from_sec1_bytes(public_key.as_bytes())
        .map_err(|_| CryptoError::InvalidPublicKey)?;

    Ok(verifying_key.verify_prehash(hash, &parsed).is_ok())
}
