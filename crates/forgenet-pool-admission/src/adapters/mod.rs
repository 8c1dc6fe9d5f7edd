//! Adapters implementing the outbound ports.

pub mod crypto;

pub use crypto::CryptoSignatureVerifier;
