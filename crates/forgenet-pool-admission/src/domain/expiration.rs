//! Transaction expiration.
//!
//! The calculator maps a transaction to the absolute block height after
//! which it is no longer eligible for the pool, or `None` for
//! non-expiring transactions.

use forgenet_types::TransactionData;

/// Chain context for expiration calculation, snapshotted per transaction.
#[derive(Clone, Copy, Debug)]
pub struct ExpirationContext {
    /// Seconds between blocks at the current milestone.
    pub block_time: u32,
    /// Current chain height.
    pub current_height: u64,
    /// Current epoch time in seconds.
    pub now: u32,
    /// Maximum transaction age in blocks.
    pub max_transaction_age: u32,
}

/// Computes the absolute expiration height of a transaction.
///
/// - An explicit non-zero `expiration` field wins.
/// - Version >= 2 transactions without one never expire.
/// - Version 1 transactions expire `max_transaction_age` blocks after the
///   height they were created at, derived from the timestamp age.
pub fn calculate_expiration(tx: &TransactionData, ctx: &ExpirationContext) -> Option<u64> {
    if let Some(expiration) = tx.expiration {
        if expiration > 0 {
            return Some(u64::from(expiration));
        }
    }

    if tx.version >= 2 {
        return None;
    }

    let created_seconds_ago = ctx.now.saturating_sub(tx.timestamp);
    let created_blocks_ago = u64::from(created_seconds_ago / ctx.block_time.max(1));

    Some(
        (ctx.current_height + u64::from(ctx.max_transaction_age))
            .saturating_sub(created_blocks_ago),
    )
}
