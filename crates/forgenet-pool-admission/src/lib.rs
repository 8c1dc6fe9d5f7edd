//! # Transaction Admission Subsystem
//!
//! ## Purpose
//!
//! Receives batches of candidate transactions from untrusted network and
//! API boundaries and decides, for each, whether it may enter the local
//! pool, be broadcast to peers, or must be rejected with a stable reason
//! code. This is the gatekeeper in front of the authoritative pool.
//!
//! ## Pipeline
//!
//! ```text
//! batch → cache dedup → pool dedup → size → sender quota
//!       → temporal/network gates → handler eligibility
//!       → decode → handler verify → fee classification
//!       → forged reconciliation → pool insertion → Report
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Every input id terminates in exactly one classification | `domain/processor.rs` - terminal gates |
//! | `errors[id]` non-empty iff id invalid | `domain/processor.rs` - `push_error()` |
//! | Rejected transactions never reach the pool | `domain/processor.rs` - `insert_into_pool()` guard |
//! | Output arrays preserve batch input order | sequential per-transaction progression |
//! | One batch per processor | `validate()` consumes the instance |
//!
//! ## Error Vocabulary
//!
//! The reason codes are part of the external contract and serialize to
//! stable strings: `ERR_DUPLICATE`, `ERR_TOO_LARGE`, `ERR_FROM_FUTURE`,
//! `ERR_EXPIRED`, `ERR_WRONG_NETWORK`, `ERR_UNSUPPORTED`, `ERR_BAD_DATA`,
//! `ERR_LOW_FEE`, `ERR_APPLY`, `ERR_FORGED`, `ERR_TRANSACTION_SCHEMA`,
//! `ERR_POOL_FULL`, `ERR_UNKNOWN`.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - SignatureVerifier bridge over forgenet-crypto      │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - ErrorSink capability for handlers          │
//! │  ports/outbound.rs - Pool, StateStore, ForgedTransactionStore,  │
//! │                      HandlerRegistry, TransactionDecoder,       │
//! │                      ConfigStore, EpochClock, WalletState,      │
//! │                      SignatureVerifier                          │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/processor.rs   - Processor, ProcessorDeps               │
//! │  domain/errors.rs      - AdmissionErrorKind, ProcessorError     │
//! │  domain/dynamic_fee.rs - fee thresholds and classification      │
//! │  domain/expiration.rs  - absolute-height expiration             │
//! │  domain/report.rs      - Report                                 │
//! │  domain/entities.rs    - AdmissionConfig, PoolRejection         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Model
//!
//! Single-threaded cooperative within one batch: the orchestrator awaits
//! each collaborator call (pool queries, forged lookup, handler checks)
//! before proceeding, and transactions are processed sequentially so
//! error ordering is deterministic and sender quota accounting stays
//! consistent. The pool synchronises itself; every pool call is treated
//! as atomic.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::CryptoSignatureVerifier;
pub use domain::{
    AdmissionConfig, AdmissionError, AdmissionErrorKind, DynamicFeeConfig, FeeDecision,
    PoolRejection, Processor, ProcessorDeps, ProcessorError, Report,
};
pub use ports::{
    CacheOutcome, ConfigStore, DecodeOutcome, DynamicFeeContext, EpochClock, ErrorSink,
    ForgedTransactionStore, HandlerLookup, HandlerRegistry, Pool, SignatureVerifier, StateStore,
    TransactionDecoder, TransactionHandler, WalletState,
};
