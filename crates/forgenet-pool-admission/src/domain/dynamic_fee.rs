//! Dynamic fee policy.
//!
//! A transaction's fee is classified into two independent flags: eligible
//! to enter the local pool, and eligible to be gossiped to peers. With
//! dynamic fees enabled the thresholds scale with the transaction's wire
//! size plus a per-type addon; with dynamic fees disabled the fee must
//! equal the type's static fee.

use forgenet_types::TransactionType;
use std::collections::BTreeMap;

/// Dynamic fee thresholds and per-type addon table.
#[derive(Clone, Debug)]
pub struct DynamicFeeConfig {
    /// Whether dynamic fees are active.
    pub enabled: bool,
    /// Satoshi per byte required to enter the pool.
    pub min_fee_pool: u64,
    /// Satoshi per byte required to be broadcast.
    pub min_fee_broadcast: u64,
    /// Per-type byte addons, keyed by the type's stable name.
    pub addon_bytes: BTreeMap<String, u64>,
}

impl Default for DynamicFeeConfig {
    fn default() -> Self {
        let addon_bytes = [
            ("transfer", 100),
            ("second_signature", 250),
            ("delegate_registration", 400_000),
            ("vote", 100),
            ("multi_signature", 500),
            ("ipfs", 250),
            ("multi_payment", 500),
            ("delegate_resignation", 100),
            ("htlc_lock", 100),
            ("htlc_claim", 0),
            ("htlc_refund", 0),
        ]
        .into_iter()
        .map(|(name, addon)| (name.to_string(), addon))
        .collect();

        Self {
            enabled: true,
            min_fee_pool: 3000,
            min_fee_broadcast: 3000,
            addon_bytes,
        }
    }
}

impl DynamicFeeConfig {
    /// A config with low thresholds for tests.
    pub fn for_testing() -> Self {
        Self {
            min_fee_pool: 100,
            min_fee_broadcast: 100,
            ..Self::default()
        }
    }

    /// Byte addon for a transaction type name; unknown types get none.
    pub fn addon_for(&self, type_name: &str) -> u64 {
        self.addon_bytes.get(type_name).copied().unwrap_or(0)
    }
}

/// Outcome of fee classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeDecision {
    /// The transaction may enter the local pool.
    pub enter_pool: bool,
    /// The transaction may be gossiped to peers.
    pub broadcast: bool,
}

impl FeeDecision {
    /// True when the fee qualifies for neither the pool nor gossip.
    pub fn is_rejected(&self) -> bool {
        !self.enter_pool && !self.broadcast
    }
}

/// The standard dynamic fee formula: `(addon + size) * satoshi_per_byte`.
///
/// A non-positive rate is clamped to one satoshi per byte.
pub fn standard_dynamic_fee(addon_bytes: u64, satoshi_per_byte: u64, size_bytes: u64) -> u64 {
    let rate = satoshi_per_byte.max(1);
    addon_bytes.saturating_add(size_bytes).saturating_mul(rate)
}

/// Classifies a fee against the pool and broadcast minimums.
pub fn classify(fee: u64, pool_minimum: u64, broadcast_minimum: u64) -> FeeDecision {
    FeeDecision {
        enter_pool: fee >= pool_minimum,
        broadcast: fee >= broadcast_minimum,
    }
}

/// Classifies a fee with dynamic fees disabled: only the exact static fee
/// is accepted, for both the pool and gossip.
pub fn classify_static(fee: u64, static_fee: u64) -> FeeDecision {
    let matches = fee == static_fee;
    FeeDecision {
        enter_pool: matches,
        broadcast: matches,
    }
}

/// Default static fees per core type, in base units.
pub fn default_static_fee(tx_type: TransactionType) -> u64 {
    match tx_type {
        TransactionType::Transfer => 10_000_000,
        TransactionType::SecondSignature => 500_000_000,
        TransactionType::DelegateRegistration => 2_500_000_000,
        TransactionType::Vote => 100_000_000,
        TransactionType::MultiSignature => 500_000_000,
        TransactionType::Ipfs => 500_000_000,
        TransactionType::MultiPayment => 10_000_000,
        TransactionType::DelegateResignation => 2_500_000_000,
        TransactionType::HtlcLock => 10_000_000,
        TransactionType::HtlcClaim => 0,
        TransactionType::HtlcRefund => 0,
    }
}
