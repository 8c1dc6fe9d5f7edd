//! Admission configuration and working-set value types.

use super::dynamic_fee::DynamicFeeConfig;
use super::errors::AdmissionErrorKind;
use forgenet_types::TxId;

/// Maximum tolerated clock skew for transaction timestamps, in seconds.
pub const MAX_FUTURE_SKEW_SECONDS: u32 = 3600;

/// Admission configuration.
#[derive(Clone, Debug)]
pub struct AdmissionConfig {
    /// Byte ceiling on a transaction's canonical encoding.
    pub max_transaction_bytes: u32,
    /// Block-age horizon for expiration of version 1 transactions.
    pub max_transaction_age: u32,
    /// Dynamic fee thresholds and addon tables.
    pub dynamic_fees: DynamicFeeConfig,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            max_transaction_bytes: 2_097_152,
            max_transaction_age: 2700,
            dynamic_fees: DynamicFeeConfig::default(),
        }
    }
}

impl AdmissionConfig {
    /// A small config for tests.
    pub fn for_testing() -> Self {
        Self {
            max_transaction_bytes: 4096,
            max_transaction_age: 2700,
            dynamic_fees: DynamicFeeConfig::for_testing(),
        }
    }
}

/// A rejection returned by the pool's bulk insert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolRejection {
    /// Id of the rejected transaction.
    pub id: TxId,
    /// Reason code; `ErrPoolFull` rejections still allow gossip.
    pub kind: AdmissionErrorKind,
    /// Message from the pool.
    pub message: String,
}
