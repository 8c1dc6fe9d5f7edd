//! # Schnorr Signatures (secp256k1, BIP-340)
//!
//! Version 2 transaction signatures: 64-byte signatures over the x-only
//! public key. Signing uses fixed auxiliary randomness so the same
//! `(hash, keys)` input always yields the same signature bytes.

use crate::encoding::SignatureInput;
use crate::errors::CryptoError;
use crate::hashing::Hash;
use crate::identity::{KeyPair, PublicKey};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::schnorr::{Signature, SigningKey, VerifyingKey};

/// Sign a message hash, returning the 64-byte signature as hex.
pub fn sign(hash: &Hash, keys: &KeyPair) -> Result<String, CryptoError> {
    let signing_key = SigningKey::from_bytes(keys.secret_bytes())
        .map_err(|_| CryptoError::InvalidPrivateKey)?;

    let signature: Signature = signing_key
        .sign_prehash(hash)
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

    Ok(hex::encode(signature.to_bytes()))
}

/// Verify a 64-byte signature (hex or raw bytes) against a message hash
/// and a compressed public key.
///
/// Verification is x-only per BIP-340; the parity byte of the compressed
/// key is ignored.
pub fn verify(
    hash: &Hash,
    signature: SignatureInput<'_>,
    public_key: &PublicKey,
) -> Result<bool, CryptoError> {
    let bytes = signature.to_bytes()?;
    if bytes.len() != 64 {
        return Err(CryptoError::InvalidSignatureFormat);
    }
    let parsed =
        Signature::try_from(bytes.as_slice()).map_err(|_| CryptoError::InvalidSignatureFormat)?;

    let verifying_key = VerifyingKey::from_bytes(public_key.x_only())
        .map_err(|_| CryptoError::InvalidPublicKey)?;

    Ok(verifying_key.verify_prehash(hash, &parsed).is_ok())
}
