//! Async client for the Minimega marketplace programs
//!
//! This crate reads marketplace accounts over Solana JSON-RPC, decodes them
//! with `minimega-base`, and submits instructions signed by an external
//! wallet.
//!
//! # Example
//!
//! ```no_run
//! use minimega_rpc_client::{Client, ProgramLayout};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder()
//!         .http_endpoint(url::Url::parse("http://localhost:8899")?)
//!         .build()?;
//!
//!     let marketplace = client.marketplace(ProgramLayout::Collections);
//!     let report = marketplace.scan().await?;
//!     for collection in &report.collections {
//!         println!("{} ({})", collection.account.name, collection.address);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod client;
pub mod connection;
pub mod error;
pub mod http;
pub mod marketplace;
pub mod submit;
pub mod types;

// Re-export main types and traits
pub use client::{Client, ClientBuilder, ClientConfig};
pub use connection::{ChainConnection, TransactionRequest, WalletSigner};
pub use error::{ClientError, Result, SigningError};
pub use http::HttpClient;
pub use marketplace::MarketplaceClient;
pub use submit::{SubmitConfig, submit};

// Re-export base types for convenience
pub use minimega_base::{ProgramLayout, Pubkey, Signature};
pub use types::{
    Account, AccountInfoConfig, CommitmentLevel, KeyedAccount, LatestBlockhash,
    SendTransactionConfig, SignatureStatus,
};

// Version information
/// Get the version of this client library
pub fn client_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
