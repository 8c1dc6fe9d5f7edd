//! Ports for the admission subsystem.
//!
//! Inbound ports are driven by callers and handlers; outbound ports are
//! the external systems admission depends on.

pub mod inbound;
pub mod outbound;

pub use inbound::ErrorSink;
pub use outbound::{
    CacheOutcome, ConfigStore, DecodeOutcome, DynamicFeeContext, EpochClock,
    ForgedTransactionStore, HandlerLookup, HandlerRegistry, Pool, SignatureVerifier, StateStore,
    TransactionDecoder, TransactionHandler, WalletState,
};
