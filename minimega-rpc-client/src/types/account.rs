//! Account-related types

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use minimega_base::{ProgramAccount, Pubkey};

use crate::error::SerializationError;
use crate::types::common::{CommitmentLevel, ResponseContext};

/// Encoding requested for account data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccountEncoding {
    /// Base64, the only encoding this client decodes
    #[default]
    #[serde(rename = "base64")]
    Base64,
    /// Base58, limited to small accounts by the node
    #[serde(rename = "base58")]
    Base58,
}

/// Account information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Balance in lamports
    pub lamports: u64,
    /// Encoded data and its encoding name
    pub data: (String, String),
    /// The owner program
    pub owner: Pubkey,
    /// Whether the account holds a program
    pub executable: bool,
    /// Allocated size in bytes
    #[serde(default)]
    pub space: Option<u64>,
}

impl Account {
    /// Raw account bytes
    pub fn decode_data(&self) -> Result<Vec<u8>, SerializationError> {
        let (encoded, encoding) = &self.data;
        if encoding != "base64" {
            return Err(SerializationError::UnsupportedEncoding(encoding.clone()));
        }
        general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| SerializationError::Base64Decode(e.to_string()))
    }
}

/// Configuration for account info requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfoConfig {
    /// Data encoding
    pub encoding: AccountEncoding,
    /// Commitment to read at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment: Option<CommitmentLevel>,
}

impl AccountInfoConfig {
    /// Base64 data at the given commitment
    pub fn base64(commitment: CommitmentLevel) -> Self {
        Self {
            encoding: AccountEncoding::Base64,
            commitment: Some(commitment),
        }
    }
}

/// Response wrapper for account info
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResponse {
    /// The context of the response
    pub context: ResponseContext,
    /// The account information
    pub value: Option<Account>,
}

/// One entry of a getProgramAccounts response
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct KeyedAccount {
    /// The account public key
    pub pubkey: Pubkey,
    /// The account information
    pub account: Account,
}

impl KeyedAccount {
    /// Address and raw bytes, ready for scanning
    pub fn into_program_account(self) -> Result<ProgramAccount, SerializationError> {
        let data = self.account.decode_data()?;
        Ok(ProgramAccount::new(self.pubkey, data))
    }
}
