//! Command implementations for the Minimega CLI

pub mod codec;
pub mod convert;
pub mod query;

use minimega_base::Pubkey;
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

/// Serialize a domain value for output
pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Value, CliError> {
    serde_json::to_value(value).map_err(|e| CliError::Generic {
        message: format!("failed to serialize output: {}", e),
    })
}

/// Parse a base58 key given on the command line
pub(crate) fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey, CliError> {
    Pubkey::from_base58(value.trim())
        .map_err(|e| CliError::Validation(format!("invalid {}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_pubkey_rejects_garbage() {
        assert_matches!(
            parse_pubkey("mint", "not-a-key"),
            Err(CliError::Validation(message)) if message.starts_with("invalid mint")
        );
        assert_eq!(
            parse_pubkey("owner", " 11111111111111111111111111111111 ").unwrap(),
            Pubkey::new([0u8; 32])
        );
    }
}
