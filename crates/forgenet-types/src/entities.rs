//! # Core Chain Entities
//!
//! Transaction types as they cross the ingress boundary.
//!
//! ## Clusters
//!
//! - **Identity**: `TxId`, `TransactionType`
//! - **Ingress**: `TransactionData` (untrusted, pre-validation)
//! - **Typed**: `DecodedTransaction` (post schema validation)

use serde::{Deserialize, Serialize};

/// A transaction identifier: the lowercase hex encoding of the content hash.
pub type TxId = String;

/// Core transaction types (type group 1).
///
/// The numeric discriminant is the on-wire `type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum TransactionType {
    /// Balance transfer to a single recipient.
    Transfer = 0,
    /// Registration of a second passphrase.
    SecondSignature = 1,
    /// Delegate registration.
    DelegateRegistration = 2,
    /// Vote or unvote for a delegate.
    Vote = 3,
    /// Multi-signature registration.
    MultiSignature = 4,
    /// IPFS hash anchoring.
    Ipfs = 5,
    /// Batched transfer to many recipients.
    MultiPayment = 6,
    /// Delegate resignation.
    DelegateResignation = 7,
    /// Timelocked transfer lock.
    HtlcLock = 8,
    /// Claim of a timelocked transfer.
    HtlcClaim = 9,
    /// Refund of an expired timelocked transfer.
    HtlcRefund = 10,
}

/// The type group carrying the core transaction types.
pub const CORE_TYPE_GROUP: u32 = 1;

impl TransactionType {
    /// Resolves a `(type_group, type)` wire pair to a core type.
    ///
    /// Returns `None` for unknown pairs; callers treat those as
    /// unsupported transaction types.
    pub fn from_parts(type_group: u32, tx_type: u16) -> Option<Self> {
        if type_group != CORE_TYPE_GROUP {
            return None;
        }
        Some(match tx_type {
            0 => Self::Transfer,
            1 => Self::SecondSignature,
            2 => Self::DelegateRegistration,
            3 => Self::Vote,
            4 => Self::MultiSignature,
            5 => Self::Ipfs,
            6 => Self::MultiPayment,
            7 => Self::DelegateResignation,
            8 => Self::HtlcLock,
            9 => Self::HtlcClaim,
            10 => Self::HtlcRefund,
            _ => return None,
        })
    }

    /// Stable lowercase name, used in fee addon tables and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::SecondSignature => "second_signature",
            Self::DelegateRegistration => "delegate_registration",
            Self::Vote => "vote",
            Self::MultiSignature => "multi_signature",
            Self::Ipfs => "ipfs",
            Self::MultiPayment => "multi_payment",
            Self::DelegateResignation => "delegate_resignation",
            Self::HtlcLock => "htlc_lock",
            Self::HtlcClaim => "htlc_claim",
            Self::HtlcRefund => "htlc_refund",
        }
    }
}

/// A raw transaction as received from the network or API boundary.
///
/// Untrusted input form: `id` and signatures are optional because nothing
/// has been validated yet. Serialization matches the camelCase wire JSON,
/// and absent optional fields are omitted so the canonical byte size of a
/// transaction is independent of which optionals were never present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    /// Content hash, lowercase hex. Assigned by the sender; verified later.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<TxId>,
    /// Transaction format version.
    pub version: u8,
    /// Network identifier byte, when the sender pinned one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<u8>,
    /// Type group (1 = core).
    pub type_group: u32,
    /// Numeric transaction type within the group.
    #[serde(rename = "type")]
    pub tx_type: u16,
    /// Epoch timestamp in seconds.
    pub timestamp: u32,
    /// Sender's compressed public key, hex.
    pub sender_public_key: String,
    /// Fee in base units.
    pub fee: u64,
    /// Transferred amount in base units.
    pub amount: u64,
    /// Sender nonce (version >= 2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    /// Absolute block height after which the transaction expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u32>,
    /// Recipient address, base58.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    /// Primary signature, hex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Second-passphrase signature, hex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_signature: Option<String>,
    /// Optional vendor field (plain text memo).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_field: Option<String>,
}

impl TransactionData {
    /// Canonical byte size of the transaction.
    ///
    /// Defined as the length of the canonical JSON encoding. This is a
    /// compatibility shim: size ceilings are enforced against this length,
    /// not against the binary wire length.
    pub fn canonical_size(&self) -> usize {
        // Serialization of a plain struct cannot fail.
        serde_json::to_vec(self).map(|v| v.len()).unwrap_or(0)
    }

    /// Resolves the core transaction type of this payload.
    pub fn transaction_type(&self) -> Option<TransactionType> {
        TransactionType::from_parts(self.type_group, self.tx_type)
    }
}

/// A typed transaction produced by the decode boundary after schema
/// validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedTransaction {
    /// The validated data form.
    pub data: TransactionData,
    /// Binary wire encoding of the signable payload.
    pub serialized: Vec<u8>,
}

impl DecodedTransaction {
    /// Returns the transaction id.
    ///
    /// Decoded transactions always carry an id; schema validation rejects
    /// payloads without one.
    pub fn id(&self) -> Option<&TxId> {
        self.data.id.as_ref()
    }
}
