//! Common types used across the client

use serde::{Deserialize, Serialize};

/// Commitment level
///
/// Ordered from weakest to strongest, so a status at `Finalized` also
/// satisfies a `Confirmed` requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentLevel {
    /// Seen by the connected node
    Processed,
    /// Voted on by a supermajority
    #[default]
    Confirmed,
    /// Rooted; will not be rolled back
    Finalized,
}

impl CommitmentLevel {
    /// Whether reaching `self` meets the `required` level
    pub fn satisfies(&self, required: CommitmentLevel) -> bool {
        *self >= required
    }

    /// Lowercase name as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitmentLevel::Processed => "processed",
            CommitmentLevel::Confirmed => "confirmed",
            CommitmentLevel::Finalized => "finalized",
        }
    }
}

impl std::str::FromStr for CommitmentLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "processed" => Ok(CommitmentLevel::Processed),
            "confirmed" => Ok(CommitmentLevel::Confirmed),
            "finalized" => Ok(CommitmentLevel::Finalized),
            other => Err(format!("unknown commitment level: {other}")),
        }
    }
}

/// Response context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseContext {
    /// The slot number
    pub slot: u64,
}

/// A recent blockhash and the last block height it stays valid for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestBlockhash {
    /// Base58 blockhash
    pub blockhash: String,
    /// Transactions using this blockhash expire after this height
    pub last_valid_block_height: u64,
}

/// Response wrapper for getLatestBlockhash
#[derive(Debug, Clone, Deserialize)]
pub struct LatestBlockhashResponse {
    /// The context of the response
    pub context: ResponseContext,
    /// The blockhash
    pub value: LatestBlockhash,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commitment_ordering() {
        assert!(CommitmentLevel::Finalized.satisfies(CommitmentLevel::Confirmed));
        assert!(CommitmentLevel::Confirmed.satisfies(CommitmentLevel::Confirmed));
        assert!(!CommitmentLevel::Processed.satisfies(CommitmentLevel::Confirmed));
        assert_eq!(
            serde_json::to_string(&CommitmentLevel::Finalized).unwrap(),
            "\"finalized\""
        );
        assert_eq!("Confirmed".parse(), Ok(CommitmentLevel::Confirmed));
        assert!("eventual".parse::<CommitmentLevel>().is_err());
    }

    #[test]
    fn test_latest_blockhash_deserialization() {
        let json = r#"{
            "context": {"apiVersion": "2.0.15", "slot": 341197053},
            "value": {
                "blockhash": "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N",
                "lastValidBlockHeight": 3090
            }
        }"#;
        let response: LatestBlockhashResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.context.slot, 341197053);
        assert_eq!(response.value.last_valid_block_height, 3090);
    }
}
