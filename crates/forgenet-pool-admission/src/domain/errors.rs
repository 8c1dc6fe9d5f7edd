//! Admission error types.
//!
//! The error kind vocabulary is part of the external contract: the
//! serialized strings are stable and consumed by API clients and peers.

use forgenet_types::TxId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason codes for rejected transactions.
///
/// Serializes to the stable `ERR_*` strings of the admission contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdmissionErrorKind {
    /// Already in the cache or the pool.
    ErrDuplicate,
    /// Canonical encoding exceeds the configured byte ceiling.
    ErrTooLarge,
    /// Timestamp too far ahead of the node clock.
    ErrFromFuture,
    /// Expired relative to the current chain height.
    ErrExpired,
    /// Network byte does not match the active network.
    ErrWrongNetwork,
    /// No handler registered for the transaction type.
    ErrUnsupported,
    /// Failed the handler verification process.
    ErrBadData,
    /// Fee below both the pool and the broadcast thresholds.
    ErrLowFee,
    /// Fee classification failed.
    ErrApply,
    /// Already included in a forged block.
    ErrForged,
    /// Rejected by schema validation at decode.
    ErrTransactionSchema,
    /// Pool at capacity.
    ErrPoolFull,
    /// Unrecognised failure, message attached verbatim.
    ErrUnknown,
}

impl AdmissionErrorKind {
    /// The stable wire string for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ErrDuplicate => "ERR_DUPLICATE",
            Self::ErrTooLarge => "ERR_TOO_LARGE",
            Self::ErrFromFuture => "ERR_FROM_FUTURE",
            Self::ErrExpired => "ERR_EXPIRED",
            Self::ErrWrongNetwork => "ERR_WRONG_NETWORK",
            Self::ErrUnsupported => "ERR_UNSUPPORTED",
            Self::ErrBadData => "ERR_BAD_DATA",
            Self::ErrLowFee => "ERR_LOW_FEE",
            Self::ErrApply => "ERR_APPLY",
            Self::ErrForged => "ERR_FORGED",
            Self::ErrTransactionSchema => "ERR_TRANSACTION_SCHEMA",
            Self::ErrPoolFull => "ERR_POOL_FULL",
            Self::ErrUnknown => "ERR_UNKNOWN",
        }
    }
}

impl std::fmt::Display for AdmissionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded rejection reason for a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionError {
    /// Reason code.
    #[serde(rename = "type")]
    pub kind: AdmissionErrorKind,
    /// Human readable message.
    pub message: String,
}

impl AdmissionError {
    /// Creates a new admission error.
    pub fn new(kind: AdmissionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Fatal processor failures.
///
/// Per-transaction rejections are accumulated in the report and never
/// surface here; these are programmer-invariant violations that abort the
/// whole batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessorError {
    /// A transaction reached a stage that requires an id without one.
    #[error("transaction has no id")]
    MissingId,

    /// A classified transaction is missing from the working set.
    #[error("transaction {0} was classified but is missing from the working set")]
    MissingFromWorkingSet(TxId),
}
