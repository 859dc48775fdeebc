//! Wire types for the JSON-RPC methods the client uses

pub mod account;
pub mod common;
pub mod transaction;

// Re-export commonly used types
pub use account::{Account, AccountEncoding, AccountInfoConfig, AccountInfoResponse, KeyedAccount};
pub use common::{CommitmentLevel, LatestBlockhash, LatestBlockhashResponse, ResponseContext};
pub use transaction::{SendTransactionConfig, SignatureStatus, SignatureStatusesResponse};
