//! Error types for the Minimega CLI

use minimega_base::{DecodeError, EncodeError};
use minimega_rpc_client::ClientError;
use thiserror::Error;

/// Main error type for the Minimega CLI
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors from the RPC client, kept whole so the category survives
    #[error("{0}")]
    Client(#[from] ClientError),

    /// Bad user input or undecodable data
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{message}")]
    Generic { message: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid config format
    #[error("Invalid config format: {0}")]
    InvalidFormat(#[from] serde_yaml::Error),

    /// Invalid public key
    #[error("Invalid public key for {field}: {message}")]
    InvalidPublicKey { field: &'static str, message: String },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Home directory could not be located
    #[error("Could not find home directory")]
    NoHomeDirectory,

    /// Directory creation failed
    #[error("Failed to create config directory: {0}")]
    DirectoryCreation(std::io::Error),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Generic {
            message: err.to_string(),
        }
    }
}

impl From<DecodeError> for CliError {
    fn from(err: DecodeError) -> Self {
        CliError::Validation(err.to_string())
    }
}

impl From<EncodeError> for CliError {
    fn from(err: EncodeError) -> Self {
        CliError::Validation(err.to_string())
    }
}

impl From<minimega_base::ValidationError> for CliError {
    fn from(err: minimega_base::ValidationError) -> Self {
        CliError::Validation(err.to_string())
    }
}

impl CliError {
    /// Short machine-readable category for JSON error output
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::Config(_) => "config",
            CliError::Client(ClientError::AccountNotFound(_)) => "account_not_found",
            CliError::Client(ClientError::TransactionRejected { .. }) => "transaction_rejected",
            CliError::Client(ClientError::Timeout { .. }) => "timeout",
            CliError::Client(ClientError::Decode(_)) => "decode",
            CliError::Client(err) if err.is_transport() => "transport",
            CliError::Client(_) => "rpc",
            CliError::Validation(_) => "validation",
            CliError::Io(_) => "io",
            CliError::Generic { .. } => "generic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_decode_error_is_validation() {
        let err: CliError = DecodeError::Truncated {
            offset: 8,
            needed: 32,
            remaining: 3,
        }
        .into();
        assert_matches!(err, CliError::Validation(_));
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_client_error_kinds() {
        let missing: CliError = ClientError::AccountNotFound("abc".to_string()).into();
        assert_eq!(missing.kind(), "account_not_found");

        let rejected: CliError = ClientError::TransactionRejected {
            signature: None,
            reason: "insufficient funds".to_string(),
        }
        .into();
        assert_eq!(rejected.kind(), "transaction_rejected");
        assert!(rejected.to_string().contains("insufficient funds"));
    }
}
