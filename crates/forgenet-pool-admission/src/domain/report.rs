//! The aggregate admission outcome.

use super::errors::AdmissionError;
use forgenet_types::TxId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of validating one batch.
///
/// The id arrays preserve the input order of the batch. `accept` and
/// `broadcast` may overlap; `excess` and `invalid` are disjoint from each
/// other and from `accept`. `errors` is present iff at least one
/// transaction is invalid, and groups messages per id in the order they
/// were recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Ids stored in the local pool.
    pub accept: Vec<TxId>,
    /// Ids to gossip to peers.
    pub broadcast: Vec<TxId>,
    /// Ids rejected with at least one error.
    pub invalid: Vec<TxId>,
    /// Ids rejected by the sender quota; not errors.
    pub excess: Vec<TxId>,
    /// Rejection reasons per id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<TxId, Vec<AdmissionError>>>,
}

impl Report {
    /// Errors recorded for an id, if any.
    pub fn errors_for(&self, id: &str) -> Option<&[AdmissionError]> {
        self.errors
            .as_ref()
            .and_then(|map| map.get(id))
            .map(|entries| entries.as_slice())
    }
}
