//! # Forgenet Shared Types
//!
//! Chain entities shared across Forgenet subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: transaction and configuration types used by
//!   more than one subsystem are defined here.
//! - **Wire Fidelity**: `TransactionData` serializes to the camelCase JSON
//!   form transactions arrive in; its canonical byte size is defined by that
//!   encoding.
//! - **Untrusted Input Form**: `TransactionData` models ingress data before
//!   validation, so identity and signature fields are optional.

pub mod config;
pub mod entities;

pub use config::{Milestone, NetworkConfig};
pub use entities::{DecodedTransaction, TransactionData, TransactionType, TxId};
