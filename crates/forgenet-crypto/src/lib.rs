//! # Forgenet Crypto - Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 | Transaction content hashing |
//! | `identity` | SHA-256 key derivation | Passphrase-derived keypairs |
//! | `ecdsa` | secp256k1, DER encoding | Transaction signatures |
//! | `schnorr` | secp256k1 BIP-340 | Transaction signatures (v2) |
//!
//! ## Security Properties
//!
//! - **ECDSA**: RFC 6979 deterministic nonces, no RNG dependency for signing
//! - **Schnorr**: BIP-340 with fixed auxiliary randomness, deterministic
//! - **Key material**: secret bytes zeroized on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod encoding;
pub mod errors;
pub mod hashing;
pub mod identity;
pub mod schnorr;

pub use encoding::SignatureInput;
pub use errors::CryptoError;
pub use hashing::{sha256, Hash};
pub use identity::{KeyPair, PublicKey};
