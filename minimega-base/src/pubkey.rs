use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A 32-byte account identifier
///
/// Displayed and serialized as base58. Only the length is validated; whether
/// the key names a real account is the chain's business.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pubkey([u8; 32]);

impl Pubkey {
    pub const LEN: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a base58 string into a public key
    pub fn from_base58(s: &str) -> Result<Self, ValidationError> {
        decode_base58_to_fixed_array::<32>(s)
            .map(Self)
            .map_err(|e| ValidationError::InvalidPubkey(format!("{}: {}", s, e)))
    }

    /// Create a Pubkey from a slice that must be exactly 32 bytes
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        let array: [u8; 32] = bytes.try_into().map_err(|_| {
            ValidationError::InvalidPubkey(format!(
                "invalid pubkey length: expected 32, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl From<[u8; 32]> for Pubkey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Pubkey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self.to_base58())
    }
}

impl Serialize for Pubkey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}

/// A transaction signature
///
/// Signatures are 64 bytes, base58-encoded on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature(String);

impl Signature {
    /// Create a new signature from a base58 string
    pub fn new(sig: String) -> Result<Self, ValidationError> {
        if sig.is_empty() {
            return Err(ValidationError::InvalidSignature("empty signature".to_string()));
        }
        decode_base58_to_fixed_array::<64>(&sig)
            .map_err(|e| ValidationError::InvalidSignature(format!("{}: {}", sig, e)))?;
        Ok(Self(sig))
    }

    pub fn from_bytes(bytes: &[u8; 64]) -> Self {
        Self(bs58::encode(bytes).into_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Signature {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Signature> for String {
    fn from(sig: Signature) -> Self {
        sig.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decode base58 into exactly `N` bytes
pub fn decode_base58_to_fixed_array<const N: usize>(input: &str) -> Result<[u8; N], String> {
    let mut buffer = [0u8; N];
    let decoded_len = bs58::decode(input)
        .onto(&mut buffer)
        .map_err(|e| e.to_string())?;

    if decoded_len != N {
        return Err(format!("expected {} bytes, got {}", N, decoded_len));
    }

    Ok(buffer)
}

/// Validation errors for input data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid public key format
    #[error("Invalid public key: {0}")]
    InvalidPubkey(String),

    /// Invalid signature format
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}
