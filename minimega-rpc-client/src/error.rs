//! Error types for the marketplace RPC client
//!
//! Transport failures, decode failures and on-chain rejections are kept in
//! separate variants so callers can tell them apart without string matching.

use std::time::Duration;
use thiserror::Error;

use minimega_base::{DecodeError, EncodeError};

/// Main error type for the marketplace client
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP transport or JSON-RPC level failure
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Account bytes did not match the expected layout
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Instruction arguments could not be encoded
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    /// A required account does not exist
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// The external signer declined or failed
    #[error("Signing failed: {0}")]
    Signing(#[from] SigningError),

    /// The chain refused the transaction; `reason` is reported verbatim
    #[error("Transaction rejected{}: {reason}", signature.as_deref().map(|s| format!(" ({s})")).unwrap_or_default())]
    TransactionRejected {
        /// Signature of the rejected transaction, when known
        signature: Option<String>,
        /// Rejection reason as returned by the node
        reason: String,
    },

    /// Confirmation did not arrive in time
    #[error("Transaction {signature} not confirmed within {after:?}")]
    Timeout {
        /// Signature that was being awaited
        signature: String,
        /// How long confirmation was awaited
        after: Duration,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ClientError>;

/// HTTP-specific errors
#[derive(Error, Debug)]
pub enum HttpError {
    /// Request failed with HTTP error
    #[error("HTTP request failed with status {status}: {message}")]
    RequestFailed {
        /// The HTTP status code
        status: u16,
        /// The error message from the server
        message: String,
    },

    /// JSON-RPC error response
    #[error("RPC error {code}: {message}")]
    RpcError {
        /// The JSON-RPC error code
        code: i64,
        /// The error message
        message: String,
        /// The error data
        data: Option<serde_json::Value>,
    },

    /// The request could not be sent or the connection failed
    #[error("Transport failure")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be read
    #[error("Failed to read response body")]
    ResponseBody(#[source] reqwest::Error),

    /// Invalid endpoint URL
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}

impl HttpError {
    /// Create an RPC error from a JSON-RPC error response
    pub fn from_rpc_error(code: i64, message: String, data: Option<serde_json::Value>) -> Self {
        Self::RpcError {
            code,
            message,
            data,
        }
    }
}

/// Validation errors for input data
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid public key format
    #[error("Invalid public key: {0}")]
    InvalidPubkey(String),

    /// Invalid signature format
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Invalid transaction data
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
}

/// Serialization/deserialization errors
#[derive(Error, Debug)]
pub enum SerializationError {
    /// JSON deserialization failed
    #[error("Failed to deserialize from JSON")]
    JsonDeserialize {
        /// The source error
        #[source]
        source: serde_json::Error,
        /// The data that failed to deserialize
        data: String,
    },

    /// Base64 decoding failed
    #[error("Failed to decode base64: {0}")]
    Base64Decode(String),

    /// Account data arrived in an encoding other than base64
    #[error("Unsupported account data encoding: {0}")]
    UnsupportedEncoding(String),
}

/// Failure reported by a [`WalletSigner`](crate::connection::WalletSigner)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SigningError(pub String);

/// Helper functions for common error patterns
impl ClientError {
    /// Whether the failure happened before reaching the program
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(HttpError::Transport(_))
                | Self::Http(HttpError::RequestFailed { .. })
                | Self::Http(HttpError::ResponseBody(_))
        )
    }

    /// Whether the chain refused the transaction
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::TransactionRejected { .. })
    }

    /// Get error code for JSON-RPC errors
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            Self::Http(HttpError::RpcError { code, .. }) => Some(*code),
            _ => None,
        }
    }
}

impl From<minimega_base::ValidationError> for ValidationError {
    fn from(base_error: minimega_base::ValidationError) -> Self {
        match base_error {
            minimega_base::ValidationError::InvalidPubkey(s) => ValidationError::InvalidPubkey(s),
            minimega_base::ValidationError::InvalidSignature(s) => {
                ValidationError::InvalidSignature(s)
            }
        }
    }
}

impl From<minimega_base::ValidationError> for ClientError {
    fn from(base_error: minimega_base::ValidationError) -> Self {
        ClientError::Validation(base_error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error =
            ClientError::Validation(ValidationError::InvalidPubkey("bad format".to_string()));
        assert_eq!(
            error.to_string(),
            "Validation error: Invalid public key: bad format"
        );

        let rejected = ClientError::TransactionRejected {
            signature: Some("5sig".to_string()),
            reason: "custom program error: 0x1771".to_string(),
        };
        assert_eq!(
            rejected.to_string(),
            "Transaction rejected (5sig): custom program error: 0x1771"
        );

        let rejected = ClientError::TransactionRejected {
            signature: None,
            reason: "insufficient funds".to_string(),
        };
        assert_eq!(rejected.to_string(), "Transaction rejected: insufficient funds");
    }

    #[test]
    fn test_categories_are_distinct() {
        let decode = ClientError::from(DecodeError::TrailingBytes { count: 1 });
        assert!(!decode.is_transport());
        assert!(!decode.is_rejection());

        let rejected = ClientError::TransactionRejected {
            signature: None,
            reason: "x".to_string(),
        };
        assert!(rejected.is_rejection());
        assert!(!rejected.is_transport());

        let failed = ClientError::Http(HttpError::RequestFailed {
            status: 503,
            message: "unavailable".to_string(),
        });
        assert!(failed.is_transport());
    }

    #[test]
    fn test_rpc_code() {
        let rpc_error = ClientError::Http(HttpError::RpcError {
            code: -32602,
            message: "Invalid params".to_string(),
            data: None,
        });
        assert_eq!(rpc_error.rpc_code(), Some(-32602));

        let other_error = ClientError::Configuration("x".to_string());
        assert_eq!(other_error.rpc_code(), None);
    }
}
