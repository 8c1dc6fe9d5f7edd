//! Outbound (Driven) ports for the admission subsystem.
//!
//! These traits define the external systems the processor depends on:
//! the pool, the state store and its ingress cache, the forged-history
//! index, per-type transaction handlers, the wire decoder, consensus
//! configuration, the epoch clock, wallet state, and the signature
//! verifier.
//!
//! Pool queries, forged-history lookups, and handler checks are
//! suspension points (`async`); configuration and clock reads are not.

use crate::domain::dynamic_fee::{default_static_fee, standard_dynamic_fee};
use crate::domain::entities::PoolRejection;
use crate::ports::inbound::ErrorSink;
use async_trait::async_trait;
use forgenet_crypto::{CryptoError, Hash, KeyPair, PublicKey, SignatureInput};
use forgenet_types::{
    DecodedTransaction, Milestone, NetworkConfig, TransactionData, TransactionType, TxId,
};
use std::sync::Arc;

/// The local pool of unconfirmed transactions.
#[async_trait]
pub trait Pool: Send + Sync {
    /// Checks whether a transaction id is already pooled.
    async fn has(&self, id: &str) -> bool;

    /// Checks whether a sender has reached its pooled-transaction quota.
    async fn has_exceeded_max_transactions(&self, sender_public_key: &str) -> bool;

    /// Bulk insert. Returns one rejection per transaction that was NOT
    /// stored; everything else is stored atomically per transaction.
    async fn add_transactions(&self, transactions: Vec<TransactionData>) -> Vec<PoolRejection>;
}

/// Outcome of recording a batch in the ingress cache.
#[derive(Clone, Debug, Default)]
pub struct CacheOutcome {
    /// Transactions seen for the first time this epoch.
    pub added: Vec<TransactionData>,
    /// Transactions already recorded earlier.
    pub not_added: Vec<TransactionData>,
}

/// Chain state: the ingress cache and the current height.
pub trait StateStore: Send + Sync {
    /// Records a batch in the ingress cache, partitioning it into new and
    /// already-seen transactions.
    fn cache_transactions(&self, transactions: Vec<TransactionData>) -> CacheOutcome;

    /// Height of the last applied block.
    fn last_height(&self) -> u64;
}

/// Lookup index over transactions already included in forged blocks.
#[async_trait]
pub trait ForgedTransactionStore: Send + Sync {
    /// Returns the subset of `ids` that are already on chain.
    async fn forged_ids(&self, ids: &[TxId]) -> Vec<TxId>;
}

/// Result of resolving a handler for a transaction type.
#[derive(Clone)]
pub enum HandlerLookup {
    /// A handler is registered for the type.
    Found(Arc<dyn TransactionHandler>),
    /// No handler for this `(type_group, type)` pair; carries the best
    /// available type name for reporting.
    UnsupportedType(String),
    /// Resolution failed for another reason.
    Failed(String),
}

/// Registry of per-type transaction handlers.
pub trait HandlerRegistry: Send + Sync {
    /// Resolves the handler for a wire type pair.
    fn get(&self, type_group: u32, tx_type: u16) -> HandlerLookup;
}

/// Inputs to a handler's dynamic fee calculation.
#[derive(Clone, Copy, Debug)]
pub struct DynamicFeeContext<'a> {
    /// Byte addon configured for the transaction's type.
    pub addon_bytes: u64,
    /// Fee rate threshold being evaluated.
    pub satoshi_per_byte: u64,
    /// The decoded transaction.
    pub transaction: &'a DecodedTransaction,
}

/// Business-rule validator for one transaction type.
#[async_trait]
pub trait TransactionHandler: Send + Sync {
    /// The type this handler validates.
    fn transaction_type(&self) -> TransactionType;

    /// Cryptographic and stateful verification of a decoded transaction.
    ///
    /// `Ok(false)` means the transaction is structurally sound but does
    /// not verify; `Err` carries an unrecognised failure message.
    async fn verify(
        &self,
        transaction: &DecodedTransaction,
        wallets: &dyn WalletState,
        crypto: &dyn SignatureVerifier,
    ) -> Result<bool, String>;

    /// Type-specific pool eligibility. A handler that declines records
    /// the reason on the sink and returns `false`.
    async fn can_enter_transaction_pool(
        &self,
        transaction: &TransactionData,
        pool: &dyn Pool,
        errors: &mut dyn ErrorSink,
    ) -> bool;

    /// Minimum fee at the given rate. The default applies the standard
    /// size-plus-addon formula.
    fn dynamic_fee(&self, ctx: DynamicFeeContext<'_>) -> Result<u64, String> {
        Ok(standard_dynamic_fee(
            ctx.addon_bytes,
            ctx.satoshi_per_byte,
            ctx.transaction.serialized.len() as u64,
        ))
    }

    /// The static fee charged when dynamic fees are disabled.
    fn static_fee(&self) -> u64 {
        default_static_fee(self.transaction_type())
    }
}

/// Outcome of rebuilding a typed transaction from ingress data.
#[derive(Clone, Debug)]
pub enum DecodeOutcome {
    /// Schema validation passed.
    Decoded(DecodedTransaction),
    /// The payload violates the transaction schema.
    SchemaError(String),
    /// Decoding failed for another reason.
    Failed(String),
}

/// The wire decode boundary.
pub trait TransactionDecoder: Send + Sync {
    /// Rebuilds a typed transaction from its data form.
    fn decode(&self, data: &TransactionData) -> DecodeOutcome;
}

/// Read-only consensus configuration.
pub trait ConfigStore: Send + Sync {
    /// The active network identity.
    fn network(&self) -> NetworkConfig;

    /// The milestone active at a height.
    fn milestone(&self, height: u64) -> Milestone;
}

/// Epoch clock, in seconds.
///
/// Abstracted to allow testing with deterministic time.
pub trait EpochClock: Send + Sync {
    /// Returns the current epoch time in seconds.
    fn now(&self) -> u32;
}

/// Read-only wallet state consulted by handlers.
pub trait WalletState: Send + Sync {
    /// The confirmed nonce of a sender.
    fn nonce(&self, public_key: &str) -> u64;

    /// The confirmed balance of a sender, in base units.
    fn balance(&self, public_key: &str) -> u64;
}

/// The signature verifier bridge.
///
/// Verification accepts signatures as hex strings or raw byte buffers;
/// signing is deterministic for a fixed `(hash, keys)` input.
pub trait SignatureVerifier: Send + Sync {
    /// Canonical hash of a transaction's signable bytes.
    fn hash(&self, transaction: &DecodedTransaction) -> Hash;

    /// Signs a hash with ECDSA, returning DER hex.
    fn sign_ecdsa(&self, hash: &Hash, keys: &KeyPair) -> Result<String, CryptoError>;

    /// Verifies an ECDSA signature.
    fn verify_ecdsa(
        &self,
        hash: &Hash,
        signature: SignatureInput<'_>,
        public_key: &PublicKey,
    ) -> Result<bool, CryptoError>;

    /// Signs a hash with Schnorr, returning 64-byte hex.
    fn sign_schnorr(&self, hash: &Hash, keys: &KeyPair) -> Result<String, CryptoError>;

    /// Verifies a Schnorr signature.
    fn verify_schnorr(
        &self,
        hash: &Hash,
        signature: SignatureInput<'_>,
        public_key: &PublicKey,
    ) -> Result<bool, CryptoError>;
}

// =============================================================================
// MOCKS FOR TESTING
// =============================================================================

/// Mock pool for testing.
#[cfg(test)]
pub struct MockPool {
    existing: parking_lot::Mutex<std::collections::HashSet<TxId>>,
    exceeded_senders: std::collections::HashSet<String>,
    rejections: Vec<PoolRejection>,
    /// Ids submitted through `add_transactions`, in call order.
    pub submitted: parking_lot::Mutex<Vec<TxId>>,
}

#[cfg(test)]
impl MockPool {
    pub fn new() -> Self {
        Self {
            existing: parking_lot::Mutex::new(std::collections::HashSet::new()),
            exceeded_senders: std::collections::HashSet::new(),
            rejections: Vec::new(),
            submitted: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn with_existing(self, id: &str) -> Self {
        self.existing.lock().insert(id.to_string());
        self
    }

    pub fn with_exceeded_sender(mut self, public_key: &str) -> Self {
        self.exceeded_senders.insert(public_key.to_string());
        self
    }

    pub fn with_rejection(mut self, rejection: PoolRejection) -> Self {
        self.rejections.push(rejection);
        self
    }
}

#[cfg(test)]
#[async_trait]
impl Pool for MockPool {
    async fn has(&self, id: &str) -> bool {
        self.existing.lock().contains(id)
    }

    async fn has_exceeded_max_transactions(&self, sender_public_key: &str) -> bool {
        self.exceeded_senders.contains(sender_public_key)
    }

    async fn add_transactions(&self, transactions: Vec<TransactionData>) -> Vec<PoolRejection> {
        let mut submitted = self.submitted.lock();
        for tx in &transactions {
            if let Some(id) = &tx.id {
                submitted.push(id.clone());
            }
        }
        self.rejections.clone()
    }
}

/// Mock state store with an in-memory ingress cache.
#[cfg(test)]
pub struct MockStateStore {
    cached: parking_lot::Mutex<std::collections::HashSet<TxId>>,
    height: u64,
}

#[cfg(test)]
impl MockStateStore {
    pub fn new(height: u64) -> Self {
        Self {
            cached: parking_lot::Mutex::new(std::collections::HashSet::new()),
            height,
        }
    }

    pub fn with_cached(self, id: &str) -> Self {
        self.cached.lock().insert(id.to_string());
        self
    }
}

#[cfg(test)]
impl StateStore for MockStateStore {
    fn cache_transactions(&self, transactions: Vec<TransactionData>) -> CacheOutcome {
        let mut cached = self.cached.lock();
        let mut outcome = CacheOutcome::default();
        for tx in transactions {
            match &tx.id {
                Some(id) if !cached.insert(id.clone()) => outcome.not_added.push(tx),
                _ => outcome.added.push(tx),
            }
        }
        outcome
    }

    fn last_height(&self) -> u64 {
        self.height
    }
}

/// Mock forged-history index.
#[cfg(test)]
#[derive(Default)]
pub struct MockForgedStore {
    forged: std::collections::HashSet<TxId>,
}

#[cfg(test)]
impl MockForgedStore {
    pub fn with_forged(mut self, id: &str) -> Self {
        self.forged.insert(id.to_string());
        self
    }
}

#[cfg(test)]
#[async_trait]
impl ForgedTransactionStore for MockForgedStore {
    async fn forged_ids(&self, ids: &[TxId]) -> Vec<TxId> {
        ids.iter().filter(|id| self.forged.contains(*id)).cloned().collect()
    }
}

/// Configurable mock handler.
#[cfg(test)]
pub struct MockHandler {
    pub tx_type: TransactionType,
    pub verify_result: Result<bool, String>,
    pub can_enter: bool,
    pub can_enter_error: Option<(crate::domain::errors::AdmissionErrorKind, String)>,
    pub dynamic_fee_error: Option<String>,
}

#[cfg(test)]
impl Default for MockHandler {
    fn default() -> Self {
        Self {
            tx_type: TransactionType::Transfer,
            verify_result: Ok(true),
            can_enter: true,
            can_enter_error: None,
            dynamic_fee_error: None,
        }
    }
}

#[cfg(test)]
#[async_trait]
impl TransactionHandler for MockHandler {
    fn transaction_type(&self) -> TransactionType {
        self.tx_type
    }

    async fn verify(
        &self,
        _transaction: &DecodedTransaction,
        _wallets: &dyn WalletState,
        _crypto: &dyn SignatureVerifier,
    ) -> Result<bool, String> {
        self.verify_result.clone()
    }

    async fn can_enter_transaction_pool(
        &self,
        transaction: &TransactionData,
        _pool: &dyn Pool,
        errors: &mut dyn ErrorSink,
    ) -> bool {
        if let (Some((kind, message)), Some(id)) = (&self.can_enter_error, &transaction.id) {
            errors.push_error(id, *kind, message.clone());
        }
        self.can_enter
    }

    fn dynamic_fee(&self, ctx: DynamicFeeContext<'_>) -> Result<u64, String> {
        if let Some(message) = &self.dynamic_fee_error {
            return Err(message.clone());
        }
        Ok(standard_dynamic_fee(
            ctx.addon_bytes,
            ctx.satoshi_per_byte,
            ctx.transaction.serialized.len() as u64,
        ))
    }
}

/// Mock registry resolving every core type to one handler.
#[cfg(test)]
pub struct MockHandlerRegistry {
    handler: Arc<dyn TransactionHandler>,
    failure: Option<String>,
}

#[cfg(test)]
impl MockHandlerRegistry {
    pub fn new(handler: Arc<dyn TransactionHandler>) -> Self {
        Self {
            handler,
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            handler: Arc::new(MockHandler::default()),
            failure: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
impl HandlerRegistry for MockHandlerRegistry {
    fn get(&self, type_group: u32, tx_type: u16) -> HandlerLookup {
        if let Some(message) = &self.failure {
            return HandlerLookup::Failed(message.clone());
        }
        match TransactionType::from_parts(type_group, tx_type) {
            Some(_) => HandlerLookup::Found(Arc::clone(&self.handler)),
            None => HandlerLookup::UnsupportedType(format!("{type_group}/{tx_type}")),
        }
    }
}

/// Mock decoder serializing the data form as the wire bytes.
#[cfg(test)]
#[derive(Default)]
pub struct MockDecoder {
    schema_failures: std::collections::HashSet<TxId>,
    failures: std::collections::HashSet<TxId>,
    id_stripping: std::collections::HashSet<TxId>,
}

#[cfg(test)]
impl MockDecoder {
    pub fn with_schema_failure(mut self, id: &str) -> Self {
        self.schema_failures.insert(id.to_string());
        self
    }

    pub fn with_failure(mut self, id: &str) -> Self {
        self.failures.insert(id.to_string());
        self
    }

    /// Decodes the transaction but drops its id, simulating a decoder
    /// that violates the schema-validation contract.
    pub fn with_id_stripping(mut self, id: &str) -> Self {
        self.id_stripping.insert(id.to_string());
        self
    }
}

#[cfg(test)]
impl TransactionDecoder for MockDecoder {
    fn decode(&self, data: &TransactionData) -> DecodeOutcome {
        let mut data = data.clone();
        if let Some(id) = &data.id {
            if self.schema_failures.contains(id) {
                return DecodeOutcome::SchemaError(format!("data.{id} should match schema"));
            }
            if self.failures.contains(id) {
                return DecodeOutcome::Failed("deserialization buffer underrun".to_string());
            }
            if self.id_stripping.contains(id) {
                data.id = None;
            }
        }
        let serialized = serde_json::to_vec(&data).unwrap_or_default();
        DecodeOutcome::Decoded(DecodedTransaction { data, serialized })
    }
}

/// Mock configuration store.
#[cfg(test)]
pub struct MockConfigStore {
    pub network: NetworkConfig,
    pub milestone: Milestone,
}

#[cfg(test)]
impl Default for MockConfigStore {
    fn default() -> Self {
        Self {
            network: NetworkConfig::mainnet(),
            milestone: Milestone::genesis(),
        }
    }
}

#[cfg(test)]
impl ConfigStore for MockConfigStore {
    fn network(&self) -> NetworkConfig {
        self.network.clone()
    }

    fn milestone(&self, _height: u64) -> Milestone {
        self.milestone.clone()
    }
}

/// Mock epoch clock with a fixed time.
#[cfg(test)]
pub struct MockClock(pub u32);

#[cfg(test)]
impl EpochClock for MockClock {
    fn now(&self) -> u32 {
        self.0
    }
}

/// Mock wallet state.
#[cfg(test)]
#[derive(Default)]
pub struct MockWallets {
    pub nonces: std::collections::HashMap<String, u64>,
    pub balances: std::collections::HashMap<String, u64>,
}

#[cfg(test)]
impl WalletState for MockWallets {
    fn nonce(&self, public_key: &str) -> u64 {
        self.nonces.get(public_key).copied().unwrap_or(0)
    }

    fn balance(&self, public_key: &str) -> u64 {
        self.balances.get(public_key).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_data(id: &str) -> TransactionData {
        TransactionData {
            id: Some(id.to_string()),
            version: 2,
            network: None,
            type_group: 1,
            tx_type: 0,
            timestamp: 0,
            sender_public_key: "03".repeat(33),
            fee: 10_000_000,
            amount: 1,
            nonce: Some(1),
            expiration: None,
            recipient_id: None,
            signature: None,
            second_signature: None,
            vendor_field: None,
        }
    }

    #[tokio::test]
    async fn test_mock_pool_membership() {
        let pool = MockPool::new().with_existing("aa");
        assert!(pool.has("aa").await);
        assert!(!pool.has("bb").await);
    }

    #[tokio::test]
    async fn test_mock_pool_records_submissions() {
        let pool = MockPool::new();
        pool.add_transactions(vec![create_test_data("aa"), create_test_data("bb")])
            .await;

        assert_eq!(*pool.submitted.lock(), vec!["aa".to_string(), "bb".to_string()]);
    }

    #[test]
    fn test_mock_cache_partitions_batch() {
        let store = MockStateStore::new(100);
        let outcome =
            store.cache_transactions(vec![create_test_data("aa"), create_test_data("aa")]);

        assert_eq!(outcome.added.len(), 1);
        assert_eq!(outcome.not_added.len(), 1);

        // A second batch with the same id is now fully cached
        let outcome = store.cache_transactions(vec![create_test_data("aa")]);
        assert!(outcome.added.is_empty());
        assert_eq!(outcome.not_added.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_forged_store_preserves_order() {
        let store = MockForgedStore::default().with_forged("bb").with_forged("aa");
        let ids = vec!["aa".to_string(), "bb".to_string(), "cc".to_string()];

        assert_eq!(store.forged_ids(&ids).await, vec!["aa", "bb"]);
    }

    #[test]
    fn test_mock_registry_resolves_core_types() {
        let registry = MockHandlerRegistry::new(Arc::new(MockHandler::default()));

        assert!(matches!(registry.get(1, 0), HandlerLookup::Found(_)));
        assert!(matches!(registry.get(9, 9), HandlerLookup::UnsupportedType(_)));
    }

    #[test]
    fn test_mock_decoder_outcomes() {
        let decoder = MockDecoder::default()
            .with_schema_failure("aa")
            .with_failure("bb");

        assert!(matches!(
            decoder.decode(&create_test_data("aa")),
            DecodeOutcome::SchemaError(_)
        ));
        assert!(matches!(
            decoder.decode(&create_test_data("bb")),
            DecodeOutcome::Failed(_)
        ));
        assert!(matches!(
            decoder.decode(&create_test_data("cc")),
            DecodeOutcome::Decoded(_)
        ));
    }
}
