//! Signature verifier bridge.
//!
//! Implements the `SignatureVerifier` port on top of `forgenet-crypto`.
//! The canonical transaction hash is the SHA-256 digest of the signable
//! wire bytes.

use crate::ports::outbound::SignatureVerifier;
use forgenet_crypto::{ecdsa, schnorr, sha256, CryptoError, Hash, KeyPair, PublicKey, SignatureInput};
use forgenet_types::DecodedTransaction;

/// Default signature verifier backed by the node's crypto primitives.
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptoSignatureVerifier;

impl SignatureVerifier for CryptoSignatureVerifier {
    fn hash(&self, transaction: &DecodedTransaction) -> Hash {
        sha256(&transaction.serialized)
    }

    fn sign_ecdsa(&self, hash: &Hash, keys: &KeyPair) -> Result<String, CryptoError> {
        ecdsa::sign(hash, keys)
    }

    fn verify_ecdsa(
        &self,
        hash: &Hash,
        signature: SignatureInput<'_>,
        public_key: &PublicKey,
    ) -> Result<bool, CryptoError> {
        ecdsa::verify(hash, signature, public_key)
    }

    fn sign_schnorr(&self, hash: &Hash, keys: &KeyPair) -> Result<String, CryptoError> {
        schnorr::sign(hash, keys)
    }

    fn verify_schnorr(
        &self,
        hash: &Hash,
        signature: SignatureInput<'_>,
        public_key: &PublicKey,
    ) -> Result<bool, CryptoError> {
        schnorr::verify(hash, signature, public_key)
    }
}
