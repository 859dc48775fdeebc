//! Transaction submission and status types

use serde::{Deserialize, Serialize};

use crate::types::common::{CommitmentLevel, ResponseContext};

/// Configuration for sendTransaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionConfig {
    /// Always base64
    pub encoding: String,
    /// Skip the node's simulation step
    pub skip_preflight: bool,
    /// Commitment used for simulation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preflight_commitment: Option<CommitmentLevel>,
    /// Rebroadcast attempts by the node; zero leaves resubmission to the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<usize>,
}

impl SendTransactionConfig {
    /// Base64 payload, preflight at `commitment`, no node-side rebroadcast
    pub fn new(commitment: CommitmentLevel) -> Self {
        Self {
            encoding: "base64".to_string(),
            skip_preflight: false,
            preflight_commitment: Some(commitment),
            max_retries: Some(0),
        }
    }
}

/// Signature status as reported by getSignatureStatuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    /// Slot the transaction was processed in
    pub slot: u64,
    /// Confirmations so far, `None` once rooted
    pub confirmations: Option<u64>,
    /// Error information (null for success)
    pub err: Option<serde_json::Value>,
    /// The confirmation status (commitment level)
    pub confirmation_status: Option<CommitmentLevel>,
}

impl SignatureStatus {
    /// Whether the transaction executed with an error
    pub fn is_failed(&self) -> bool {
        self.err.is_some()
    }

    /// Whether the status meets the `required` commitment
    pub fn satisfies(&self, required: CommitmentLevel) -> bool {
        match self.confirmation_status {
            Some(level) => level.satisfies(required),
            // older nodes omit the status; rooted transactions have no count
            None => self.confirmations.is_none(),
        }
    }
}

/// Response wrapper for getSignatureStatuses
#[derive(Debug, Clone, Deserialize)]
pub struct SignatureStatusesResponse {
    /// The context of the response
    pub context: ResponseContext,
    /// One entry per requested signature, null if unknown
    pub value: Vec<Option<SignatureStatus>>,
}
