//! End-to-end admission scenarios driven through the public API only:
//! an in-memory pool with real capacity behavior, an ingress cache that
//! persists across batches, and a transfer handler that verifies real
//! Schnorr signatures through the crypto bridge.

use async_trait::async_trait;
use forgenet_crypto::{schnorr, sha256, KeyPair, SignatureInput};
use forgenet_pool_admission::{
    AdmissionConfig, AdmissionErrorKind, CacheOutcome, ConfigStore, CryptoSignatureVerifier,
    DecodeOutcome, EpochClock, ErrorSink, ForgedTransactionStore, HandlerLookup, HandlerRegistry,
    Pool, PoolRejection, Processor, ProcessorDeps, Report, SignatureVerifier, StateStore,
    TransactionDecoder, TransactionHandler, WalletState,
};
use forgenet_types::{
    DecodedTransaction, Milestone, NetworkConfig, TransactionData, TransactionType, TxId,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

const NOW: u32 = 80_000;
const HEIGHT: u64 = 1_000;

// =============================================================================
// COLLABORATOR FAKES
// =============================================================================

struct InMemoryPool {
    pooled: Mutex<HashSet<TxId>>,
    quota_exceeded: HashSet<String>,
    capacity: usize,
}

impl InMemoryPool {
    fn new(capacity: usize) -> Self {
        Self {
            pooled: Mutex::new(HashSet::new()),
            quota_exceeded: HashSet::new(),
            capacity,
        }
    }

    fn with_quota_exceeded(mut self, public_key: &str) -> Self {
        self.quota_exceeded.insert(public_key.to_string());
        self
    }

    fn contains(&self, id: &str) -> bool {
        self.pooled.lock().contains(id)
    }
}

#[async_trait]
impl Pool for InMemoryPool {
    async fn has(&self, id: &str) -> bool {
        self.pooled.lock().contains(id)
    }

    async fn has_exceeded_max_transactions(&self, sender_public_key: &str) -> bool {
        self.quota_exceeded.contains(sender_public_key)
    }

    async fn add_transactions(&self, transactions: Vec<TransactionData>) -> Vec<PoolRejection> {
        let mut pooled = self.pooled.lock();
        let mut rejections = Vec::new();
        for tx in transactions {
            let Some(id) = tx.id else { continue };
            if pooled.len() >= self.capacity {
                rejections.push(PoolRejection {
                    id,
                    kind: AdmissionErrorKind::ErrPoolFull,
                    message: "Pool is full".to_string(),
                });
            } else {
                pooled.insert(id);
            }
        }
        rejections
    }
}

struct IngressCache {
    seen: Mutex<HashSet<TxId>>,
    height: u64,
}

impl IngressCache {
    fn new(height: u64) -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            height,
        }
    }
}

impl StateStore for IngressCache {
    fn cache_transactions(&self, transactions: Vec<TransactionData>) -> CacheOutcome {
        let mut seen = self.seen.lock();
        let mut outcome = CacheOutcome::default();
        for tx in transactions {
            match &tx.id {
                Some(id) if !seen.insert(id.clone()) => outcome.not_added.push(tx),
                _ => outcome.added.push(tx),
            }
        }
        outcome
    }

    fn last_height(&self) -> u64 {
        self.height
    }
}

#[derive(Default)]
struct ForgedLedger {
    forged: HashSet<TxId>,
}

impl ForgedLedger {
    fn with_forged(mut self, id: &str) -> Self {
        self.forged.insert(id.to_string());
        self
    }
}

#[async_trait]
impl ForgedTransactionStore for ForgedLedger {
    async fn forged_ids(&self, ids: &[TxId]) -> Vec<TxId> {
        ids.iter().filter(|id| self.forged.contains(*id)).cloned().collect()
    }
}

/// Transfer handler verifying real Schnorr signatures through the bridge.
struct TransferHandler;

#[async_trait]
impl TransactionHandler for TransferHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::Transfer
    }

    async fn verify(
        &self,
        transaction: &DecodedTransaction,
        _wallets: &dyn WalletState,
        crypto: &dyn SignatureVerifier,
    ) -> Result<bool, String> {
        let Some(signature) = &transaction.data.signature else {
            return Ok(false);
        };
        let public_key = forgenet_crypto::PublicKey::from_hex(&transaction.data.sender_public_key)
            .map_err(|e| e.to_string())?;

        let hash = crypto.hash(transaction);
        crypto
            .verify_schnorr(&hash, SignatureInput::Hex(signature), &public_key)
            .map_err(|e| e.to_string())
    }

    async fn can_enter_transaction_pool(
        &self,
        transaction: &TransactionData,
        _pool: &dyn Pool,
        errors: &mut dyn ErrorSink,
    ) -> bool {
        if transaction.recipient_id.is_none() {
            if let Some(id) = &transaction.id {
                errors.push_error(
                    id,
                    AdmissionErrorKind::ErrApply,
                    "Recipient is required for transfers".to_string(),
                );
            }
            return false;
        }
        true
    }
}

struct CoreHandlerRegistry {
    transfer: Arc<TransferHandler>,
}

impl Default for CoreHandlerRegistry {
    fn default() -> Self {
        Self {
            transfer: Arc::new(TransferHandler),
        }
    }
}

impl HandlerRegistry for CoreHandlerRegistry {
    fn get(&self, type_group: u32, tx_type: u16) -> HandlerLookup {
        match TransactionType::from_parts(type_group, tx_type) {
            Some(TransactionType::Transfer) => HandlerLookup::Found(self.transfer.clone()),
            Some(other) => HandlerLookup::UnsupportedType(other.name().to_string()),
            None => HandlerLookup::UnsupportedType(format!("{type_group}/{tx_type}")),
        }
    }
}

/// Decoder reconstructing the signable wire bytes: the JSON encoding of
/// the payload with identity and signature fields cleared.
struct JsonDecoder;

fn signable_bytes(data: &TransactionData) -> Vec<u8> {
    let mut signable = data.clone();
    signable.id = None;
    signable.signature = None;
    signable.second_signature = None;
    serde_json::to_vec(&signable).unwrap_or_default()
}

impl TransactionDecoder for JsonDecoder {
    fn decode(&self, data: &TransactionData) -> DecodeOutcome {
        if data.id.is_none() {
            return DecodeOutcome::SchemaError("data should have required property 'id'".to_string());
        }
        if data.signature.is_none() {
            return DecodeOutcome::SchemaError(
                "data should have required property 'signature'".to_string(),
            );
        }
        DecodeOutcome::Decoded(DecodedTransaction {
            data: data.clone(),
            serialized: signable_bytes(data),
        })
    }
}

struct StaticConfig;

impl ConfigStore for StaticConfig {
    fn network(&self) -> NetworkConfig {
        NetworkConfig::mainnet()
    }

    fn milestone(&self, _height: u64) -> Milestone {
        Milestone::genesis()
    }
}

struct FixedClock(u32);

impl EpochClock for FixedClock {
    fn now(&self) -> u32 {
        self.0
    }
}

#[derive(Default)]
struct EmptyWallets;

impl WalletState for EmptyWallets {
    fn nonce(&self, _public_key: &str) -> u64 {
        0
    }

    fn balance(&self, _public_key: &str) -> u64 {
        u64::MAX
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

fn create_deps() -> ProcessorDeps {
    ProcessorDeps {
        pool: Arc::new(InMemoryPool::new(64)),
        state_store: Arc::new(IngressCache::new(HEIGHT)),
        forged_store: Arc::new(ForgedLedger::default()),
        handlers: Arc::new(CoreHandlerRegistry::default()),
        decoder: Arc::new(JsonDecoder),
        config_store: Arc::new(StaticConfig),
        clock: Arc::new(FixedClock(NOW)),
        wallets: Arc::new(EmptyWallets),
        crypto: Arc::new(CryptoSignatureVerifier),
        config: AdmissionConfig::for_testing(),
    }
}

/// Builds a transfer signed with the given passphrase. The id is derived
/// from the signable bytes, the signature is Schnorr over their hash.
fn signed_transfer(passphrase: &str, nonce: u64, amount: u64) -> TransactionData {
    let keys = KeyPair::from_passphrase(passphrase).unwrap();
    let mut data = TransactionData {
        id: None,
        version: 2,
        network: Some(0x17),
        type_group: 1,
        tx_type: 0,
        timestamp: NOW - 60,
        sender_public_key: keys.public_key().to_hex(),
        fee: 10_000_000,
        amount,
        nonce: Some(nonce),
        expiration: None,
        recipient_id: Some("AJWRd23HNEhPLkK1ymMnwnDBX2a7QBZqff".to_string()),
        signature: None,
        second_signature: None,
        vendor_field: None,
    };

    let payload = signable_bytes(&data);
    let hash = sha256(&payload);
    data.signature = Some(schnorr::sign(&hash, &keys).unwrap());
    data.id = Some(hex::encode(hash));
    data
}

fn tx_id(data: &TransactionData) -> TxId {
    data.id.clone().unwrap()
}

fn first_error_kind(report: &Report, id: &str) -> AdmissionErrorKind {
    report.errors_for(id).expect("id should have errors")[0].kind
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[tokio::test]
async fn test_signed_transfer_is_accepted_and_pooled() {
    let mut deps = create_deps();
    let pool = Arc::new(InMemoryPool::new(64));
    deps.pool = pool.clone();

    let tx = signed_transfer("this is a top secret passphrase", 1, 1_000);
    let id = tx_id(&tx);

    let report = Processor::new(&deps).validate(vec![tx]).await.unwrap();

    assert_eq!(report.accept, vec![id.clone()]);
    assert_eq!(report.broadcast, vec![id.clone()]);
    assert!(report.errors.is_none());
    assert!(pool.contains(&id));
}

#[tokio::test]
async fn test_tampered_transaction_fails_verification() {
    let deps = create_deps();
    let mut tx = signed_transfer("secret", 1, 1_000);
    tx.amount = 1_000_000;
    let id = tx_id(&tx);

    let report = Processor::new(&deps).validate(vec![tx]).await.unwrap();

    assert_eq!(first_error_kind(&report, &id), AdmissionErrorKind::ErrBadData);
    assert!(report.accept.is_empty());
}

#[tokio::test]
async fn test_unsigned_transaction_fails_schema() {
    let deps = create_deps();
    let mut tx = signed_transfer("secret", 1, 1_000);
    tx.signature = None;
    let id = tx_id(&tx);

    let report = Processor::new(&deps).validate(vec![tx]).await.unwrap();

    assert_eq!(
        first_error_kind(&report, &id),
        AdmissionErrorKind::ErrTransactionSchema
    );
}

#[tokio::test]
async fn test_resubmission_across_batches_hits_the_cache() {
    let deps = create_deps();
    let tx = signed_transfer("secret", 1, 1_000);
    let id = tx_id(&tx);

    let first = Processor::new(&deps).validate(vec![tx.clone()]).await.unwrap();
    assert_eq!(first.accept, vec![id.clone()]);

    // Same ingress cache, new processor: the repeat is a duplicate.
    let second = Processor::new(&deps).validate(vec![tx]).await.unwrap();
    assert!(second.accept.is_empty());
    assert_eq!(second.invalid, vec![id.clone()]);
    assert_eq!(first_error_kind(&second, &id), AdmissionErrorKind::ErrDuplicate);
}

#[tokio::test]
async fn test_forged_transaction_never_reaches_the_pool() {
    let mut deps = create_deps();
    let tx = signed_transfer("secret", 1, 1_000);
    let id = tx_id(&tx);
    deps.forged_store = Arc::new(ForgedLedger::default().with_forged(&id));
    let pool = Arc::new(InMemoryPool::new(64));
    deps.pool = pool.clone();

    let report = Processor::new(&deps).validate(vec![tx]).await.unwrap();

    assert!(report.accept.is_empty());
    assert!(report.broadcast.is_empty());
    assert_eq!(first_error_kind(&report, &id), AdmissionErrorKind::ErrForged);
    assert!(!pool.contains(&id));
}

#[tokio::test]
async fn test_pool_overflow_still_broadcasts() {
    let mut deps = create_deps();
    deps.pool = Arc::new(InMemoryPool::new(1));

    let first = signed_transfer("secret", 1, 1_000);
    let second = signed_transfer("secret", 2, 2_000);
    let overflow_id = tx_id(&second);

    let report = Processor::new(&deps)
        .validate(vec![first.clone(), second])
        .await
        .unwrap();

    assert_eq!(report.accept, vec![tx_id(&first)]);
    // The overflow transaction is still eligible for gossip
    assert!(report.broadcast.contains(&overflow_id));
    assert_eq!(
        first_error_kind(&report, &overflow_id),
        AdmissionErrorKind::ErrPoolFull
    );
}

#[tokio::test]
async fn test_sender_over_quota_is_excess() {
    let keys = KeyPair::from_passphrase("secret").unwrap();
    let mut deps = create_deps();
    deps.pool = Arc::new(InMemoryPool::new(64).with_quota_exceeded(&keys.public_key().to_hex()));

    let tx = signed_transfer("secret", 1, 1_000);
    let id = tx_id(&tx);

    let report = Processor::new(&deps).validate(vec![tx]).await.unwrap();

    assert_eq!(report.excess, vec![id]);
    assert!(report.errors.is_none());
}

#[tokio::test]
async fn test_wrong_network_rejected() {
    let deps = create_deps();
    let mut tx = signed_transfer("secret", 1, 1_000);
    tx.network = Some(0x1e);
    let id = tx_id(&tx);

    let report = Processor::new(&deps).validate(vec![tx]).await.unwrap();

    assert_eq!(
        first_error_kind(&report, &id),
        AdmissionErrorKind::ErrWrongNetwork
    );
}

#[tokio::test]
async fn test_handler_declines_transfer_without_recipient() {
    let deps = create_deps();
    let mut tx = signed_transfer("secret", 1, 1_000);
    tx.recipient_id = None;
    let id = tx_id(&tx);

    let report = Processor::new(&deps).validate(vec![tx]).await.unwrap();

    let errors = report.errors_for(&id).unwrap();
    assert_eq!(errors[0].kind, AdmissionErrorKind::ErrApply);
    assert_eq!(errors[0].message, "Recipient is required for transfers");
}

#[tokio::test]
async fn test_report_wire_shape() {
    let deps = create_deps();
    let accepted = signed_transfer("secret", 1, 1_000);
    let mut low_fee = signed_transfer("secret", 2, 1_000);
    low_fee.fee = 1;
    // Fee is part of the signable payload, so re-derive id and signature
    let keys = KeyPair::from_passphrase("secret").unwrap();
    let payload = signable_bytes(&low_fee);
    let hash = sha256(&payload);
    low_fee.signature = Some(schnorr::sign(&hash, &keys).unwrap());
    low_fee.id = Some(hex::encode(hash));

    let accepted_id = tx_id(&accepted);
    let low_fee_id = tx_id(&low_fee);

    let report = Processor::new(&deps)
        .validate(vec![accepted, low_fee])
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["accept"][0], accepted_id.as_str());
    assert_eq!(json["invalid"][0], low_fee_id.as_str());
    assert_eq!(json["errors"][low_fee_id.as_str()][0]["type"], "ERR_LOW_FEE");
    assert_eq!(json["excess"].as_array().unwrap().len(), 0);
}
