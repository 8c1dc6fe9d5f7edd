//! # Admission Processor
//!
//! The batch orchestrator: receives candidate transactions from an
//! untrusted boundary and decides, for each, whether it enters the local
//! pool, gets broadcast to peers, or is rejected with a stable reason
//! code.
//!
//! ## Pipeline
//!
//! ```text
//! batch ──cache──→ working set ──per-transaction filter──→ {accept, broadcast}
//!                        │                                       │
//!                        └─ ERR_DUPLICATE            forged reconciliation
//!                                                                │
//!                                                        pool insertion
//!                                                                │
//!                                                             Report
//! ```
//!
//! A transaction that fails any gate is not processed further and never
//! touches the pool. Per-transaction failures are accumulated in the
//! report; only programmer-invariant violations abort the batch.
//!
//! ## Invariants Enforced
//!
//! - Every input id terminates in `accept ∪ broadcast`, `excess`, or
//!   `invalid` (duplicates of an already-invalid id aside).
//! - `errors` carries at least one entry for an id iff the id is invalid.
//! - Output arrays preserve the input order of the batch.
//! - `accept` at return reflects exactly what the pool stored.
//!
//! A processor validates one batch: `validate` consumes the instance, so
//! reuse is unrepresentable.

use super::dynamic_fee::{classify, classify_static, FeeDecision};
use super::entities::{AdmissionConfig, MAX_FUTURE_SKEW_SECONDS};
use super::errors::{AdmissionError, AdmissionErrorKind, ProcessorError};
use super::expiration::{calculate_expiration, ExpirationContext};
use super::report::Report;
use crate::ports::inbound::ErrorSink;
use crate::ports::outbound::{
    ConfigStore, DecodeOutcome, DynamicFeeContext, EpochClock, ForgedTransactionStore,
    HandlerLookup, HandlerRegistry, Pool, SignatureVerifier, StateStore, TransactionDecoder,
    TransactionHandler, WalletState,
};
use forgenet_types::{DecodedTransaction, TransactionData, TxId};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

/// Collaborators of the admission processor.
///
/// Constructed once per node and shared by reference; each processor
/// borrows it for a single batch.
pub struct ProcessorDeps {
    /// The local pool.
    pub pool: Arc<dyn Pool>,
    /// Ingress cache and chain height.
    pub state_store: Arc<dyn StateStore>,
    /// Forged-history index.
    pub forged_store: Arc<dyn ForgedTransactionStore>,
    /// Per-type handler registry.
    pub handlers: Arc<dyn HandlerRegistry>,
    /// Wire decode boundary.
    pub decoder: Arc<dyn TransactionDecoder>,
    /// Consensus configuration.
    pub config_store: Arc<dyn ConfigStore>,
    /// Epoch clock.
    pub clock: Arc<dyn EpochClock>,
    /// Wallet state consulted by handlers.
    pub wallets: Arc<dyn WalletState>,
    /// Signature verifier bridge.
    pub crypto: Arc<dyn SignatureVerifier>,
    /// Admission configuration.
    pub config: AdmissionConfig,
}

/// Single-use admission processor for one batch.
pub struct Processor<'a> {
    deps: &'a ProcessorDeps,
    accept: Vec<TxId>,
    broadcast: Vec<TxId>,
    invalid: Vec<TxId>,
    excess: Vec<TxId>,
    errors: BTreeMap<TxId, Vec<AdmissionError>>,
    working: HashMap<TxId, TransactionData>,
}

impl<'a> Processor<'a> {
    /// Creates a processor bound to the node's collaborators.
    pub fn new(deps: &'a ProcessorDeps) -> Self {
        Self {
            deps,
            accept: Vec::new(),
            broadcast: Vec::new(),
            invalid: Vec::new(),
            excess: Vec::new(),
            errors: BTreeMap::new(),
            working: HashMap::new(),
        }
    }

    /// Validates a batch and returns the admission report.
    ///
    /// Consumes the processor: a new instance is required per batch.
    ///
    /// # Errors
    ///
    /// Only programmer-invariant violations are returned as `Err`; every
    /// per-transaction failure is recorded in the report instead.
    pub async fn validate(
        mut self,
        batch: Vec<TransactionData>,
    ) -> Result<Report, ProcessorError> {
        let outcome = self.deps.state_store.cache_transactions(batch);

        for transaction in &outcome.not_added {
            let id = transaction.id.as_ref().ok_or(ProcessorError::MissingId)?;
            // A repeated duplicate keeps only its first cache error.
            if !self.errors.contains_key(id) {
                self.push_error(
                    id,
                    AdmissionErrorKind::ErrDuplicate,
                    "Already in cache.".to_string(),
                );
            }
        }

        if !outcome.added.is_empty() {
            for transaction in outcome.added {
                self.filter_transaction(transaction).await?;
            }

            self.reconcile_forged().await?;
            self.insert_into_pool().await;

            debug!(
                accept = self.accept.len(),
                broadcast = self.broadcast.len(),
                excess = self.excess.len(),
                invalid = self.invalid.len(),
                "admission batch processed"
            );
        }

        Ok(self.into_report())
    }

    /// Runs the per-transaction gates. Each gate is terminal: the first
    /// rejection stops processing of the transaction.
    async fn filter_transaction(
        &mut self,
        data: TransactionData,
    ) -> Result<(), ProcessorError> {
        let id = data.id.clone().ok_or(ProcessorError::MissingId)?;

        if self.deps.pool.has(&id).await {
            self.push_error(
                &id,
                AdmissionErrorKind::ErrDuplicate,
                format!("Duplicate transaction {id}"),
            );
            return Ok(());
        }

        let max_bytes = self.deps.config.max_transaction_bytes;
        if data.canonical_size() > max_bytes as usize {
            self.push_error(
                &id,
                AdmissionErrorKind::ErrTooLarge,
                format!("Transaction {id} is larger than {max_bytes} bytes."),
            );
            return Ok(());
        }

        if self
            .deps
            .pool
            .has_exceeded_max_transactions(&data.sender_public_key)
            .await
        {
            // Quota excess is reported separately; it is not an error.
            self.excess.push(id);
            return Ok(());
        }

        let Some(handler) = self.apply_semantic_gate(&id, &data).await else {
            return Ok(());
        };

        let decoded = match self.deps.decoder.decode(&data) {
            DecodeOutcome::Decoded(decoded) => decoded,
            DecodeOutcome::SchemaError(message) => {
                self.push_error(&id, AdmissionErrorKind::ErrTransactionSchema, message);
                return Ok(());
            }
            DecodeOutcome::Failed(message) => {
                self.push_error(&id, AdmissionErrorKind::ErrUnknown, message);
                return Ok(());
            }
        };
        // Schema validation guarantees an id on anything it lets through.
        if decoded.id().is_none() {
            return Err(ProcessorError::MissingId);
        }

        let deps = self.deps;
        match handler
            .verify(&decoded, deps.wallets.as_ref(), deps.crypto.as_ref())
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                self.push_error(
                    &id,
                    AdmissionErrorKind::ErrBadData,
                    "Transaction didn't pass the verification process.".to_string(),
                );
                return Ok(());
            }
            Err(message) => {
                self.push_error(&id, AdmissionErrorKind::ErrUnknown, message);
                return Ok(());
            }
        }

        let decision = match self.classify_fee(&decoded, handler.as_ref()) {
            Ok(decision) => decision,
            Err(message) => {
                self.push_error(&id, AdmissionErrorKind::ErrApply, message);
                return Ok(());
            }
        };

        if decision.is_rejected() {
            self.push_error(
                &id,
                AdmissionErrorKind::ErrLowFee,
                "The fee is too low to broadcast and accept the transaction".to_string(),
            );
            return Ok(());
        }

        if decision.enter_pool {
            self.accept.push(id.clone());
        }
        if decision.broadcast {
            self.broadcast.push(id.clone());
        }
        self.working.insert(id, data);

        Ok(())
    }

    /// Temporal, network, and type gates, in order. Returns the resolved
    /// handler when every gate passes, `None` after recording the
    /// rejection otherwise.
    async fn apply_semantic_gate(
        &mut self,
        id: &TxId,
        data: &TransactionData,
    ) -> Option<Arc<dyn TransactionHandler>> {
        let deps = self.deps;
        let now = deps.clock.now();

        if data.timestamp > now + MAX_FUTURE_SKEW_SECONDS {
            let ahead = data.timestamp - now;
            self.push_error(
                id,
                AdmissionErrorKind::ErrFromFuture,
                format!("Transaction {id} is {ahead} seconds in the future"),
            );
            return None;
        }

        let current_height = deps.state_store.last_height();
        let milestone = deps.config_store.milestone(current_height);
        let context = ExpirationContext {
            block_time: milestone.block_time,
            current_height,
            now,
            max_transaction_age: deps.config.max_transaction_age,
        };

        if let Some(expiration) = calculate_expiration(data, &context) {
            if expiration <= current_height + 1 {
                let behind = current_height as i64 - expiration as i64;
                self.push_error(
                    id,
                    AdmissionErrorKind::ErrExpired,
                    format!("Transaction {id} is expired since {behind} blocks."),
                );
                return None;
            }
        }

        if let Some(network) = data.network {
            let pub_key_hash = deps.config_store.network().pub_key_hash;
            if network != pub_key_hash {
                self.push_error(
                    id,
                    AdmissionErrorKind::ErrWrongNetwork,
                    format!("Transaction network '{network}' does not match '{pub_key_hash}'"),
                );
                return None;
            }
        }

        match deps.handlers.get(data.type_group, data.tx_type) {
            HandlerLookup::Found(handler) => {
                if handler
                    .can_enter_transaction_pool(data, deps.pool.as_ref(), self)
                    .await
                {
                    Some(handler)
                } else {
                    // Handlers record their own reason; guard the
                    // partition invariant when one declines silently.
                    if !self.errors.contains_key(id) {
                        self.push_error(
                            id,
                            AdmissionErrorKind::ErrUnknown,
                            format!("Transaction {id} was declined by its handler"),
                        );
                    }
                    None
                }
            }
            HandlerLookup::UnsupportedType(name) => {
                self.push_error(
                    id,
                    AdmissionErrorKind::ErrUnsupported,
                    format!("Invalidating transaction of unsupported type '{name}'"),
                );
                None
            }
            HandlerLookup::Failed(message) => {
                self.push_error(id, AdmissionErrorKind::ErrUnknown, message);
                None
            }
        }
    }

    /// Evaluates the dynamic fee policy for a decoded transaction.
    fn classify_fee(
        &self,
        decoded: &DecodedTransaction,
        handler: &dyn TransactionHandler,
    ) -> Result<FeeDecision, String> {
        let fees = &self.deps.config.dynamic_fees;
        let fee = decoded.data.fee;

        if fees.enabled {
            let addon_bytes = fees.addon_for(handler.transaction_type().name());
            let pool_minimum = handler.dynamic_fee(DynamicFeeContext {
                addon_bytes,
                satoshi_per_byte: fees.min_fee_pool,
                transaction: decoded,
            })?;
            let broadcast_minimum = handler.dynamic_fee(DynamicFeeContext {
                addon_bytes,
                satoshi_per_byte: fees.min_fee_broadcast,
                transaction: decoded,
            })?;
            Ok(classify(fee, pool_minimum, broadcast_minimum))
        } else {
            Ok(classify_static(fee, handler.static_fee()))
        }
    }

    /// Drops transactions that are already on chain from both sets.
    ///
    /// Runs after all per-transaction gates and before pool insertion so
    /// that forged transactions never touch the pool.
    async fn reconcile_forged(&mut self) -> Result<(), ProcessorError> {
        let mut ids: Vec<TxId> = Vec::new();
        for id in self.accept.iter().chain(self.broadcast.iter()) {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        if ids.is_empty() {
            return Ok(());
        }

        for id in self.deps.forged_store.forged_ids(&ids).await {
            if !self.working.contains_key(&id) {
                return Err(ProcessorError::MissingFromWorkingSet(id));
            }

            warn!(%id, "dropping forged transaction received at ingress");
            self.push_error(&id, AdmissionErrorKind::ErrForged, "Already forged.".to_string());
            self.accept.retain(|accepted| accepted != &id);
            self.broadcast.retain(|gossiped| gossiped != &id);
        }

        Ok(())
    }

    /// Submits the accepted transactions and reconciles the rejections
    /// the pool reports back.
    async fn insert_into_pool(&mut self) {
        if self.accept.is_empty() {
            return;
        }

        let transactions: Vec<TransactionData> = self
            .accept
            .iter()
            .filter_map(|id| self.working.get(id).cloned())
            .collect();

        for rejection in self.deps.pool.add_transactions(transactions).await {
            self.accept.retain(|accepted| accepted != &rejection.id);
            // A full pool still allows gossip; any other failure means
            // the transaction is unfit and must not be broadcast.
            if rejection.kind != AdmissionErrorKind::ErrPoolFull {
                self.broadcast.retain(|gossiped| gossiped != &rejection.id);
            }
            self.push_error(&rejection.id, rejection.kind, rejection.message);
        }
    }

    fn into_report(self) -> Report {
        Report {
            accept: self.accept,
            broadcast: self.broadcast,
            invalid: self.invalid,
            excess: self.excess,
            errors: if self.errors.is_empty() {
                None
            } else {
                Some(self.errors)
            },
        }
    }
}

impl ErrorSink for Processor<'_> {
    fn push_error(&mut self, id: &str, kind: AdmissionErrorKind, message: String) {
        match self.errors.entry(id.to_string()) {
            Entry::Vacant(slot) => {
                self.invalid.push(id.to_string());
                slot.insert(vec![AdmissionError::new(kind, message)]);
            }
            Entry::Occupied(mut slot) => {
                slot.get_mut().push(AdmissionError::new(kind, message));
            }
        }
    }
}
