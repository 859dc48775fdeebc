//! Sign, send and confirm
//!
//! Submission is strictly sequential and never retried: resending a
//! transaction can double-mint or double-spend, so any failure is handed
//! back to the caller, who must rebuild with a fresh blockhash.

use std::time::Duration;
use tokio::time::{sleep, timeout};

use minimega_base::{Instruction, Signature};

use crate::connection::{ChainConnection, TransactionRequest, WalletSigner};
use crate::error::{ClientError, Result};
use crate::types::CommitmentLevel;

/// Confirmation settings for one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitConfig {
    /// Level the transaction must reach
    pub commitment: CommitmentLevel,
    /// Give up waiting after this long
    pub confirm_timeout: Duration,
    /// Delay between status polls
    pub poll_interval: Duration,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            commitment: CommitmentLevel::Confirmed,
            confirm_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Sign `instructions` with `signer`, send them, and wait for confirmation
///
/// Errors keep their category: a signer refusal is
/// [`ClientError::Signing`], a node or program refusal is
/// [`ClientError::TransactionRejected`], and a transaction that never
/// reaches the required commitment is [`ClientError::Timeout`].
pub async fn submit<C, S>(
    connection: &C,
    signer: &S,
    instructions: Vec<Instruction>,
    config: &SubmitConfig,
) -> Result<Signature>
where
    C: ChainConnection + ?Sized,
    S: WalletSigner + ?Sized,
{
    let blockhash = connection.get_latest_blockhash().await?;
    let request = TransactionRequest {
        fee_payer: signer.pubkey(),
        recent_blockhash: blockhash.blockhash,
        instructions,
    };
    tracing::debug!(
        fee_payer = %request.fee_payer,
        instructions = request.instructions.len(),
        blockhash = %request.recent_blockhash,
        "signing transaction"
    );

    let transaction = signer.sign_transaction(&request).await?;
    let signature = connection.send_raw_transaction(&transaction).await?;
    tracing::info!(signature = %signature, "transaction sent");

    confirm(connection, &signature, config).await?;
    Ok(signature)
}

/// Poll until `signature` reaches the configured commitment
pub async fn confirm<C>(connection: &C, signature: &Signature, config: &SubmitConfig) -> Result<()>
where
    C: ChainConnection + ?Sized,
{
    let poll = async {
        loop {
            match connection.get_signature_status(signature).await? {
                Some(status) if status.is_failed() => {
                    let reason = status
                        .err
                        .as_ref()
                        .map(|err| err.to_string())
                        .unwrap_or_default();
                    return Err(ClientError::TransactionRejected {
                        signature: Some(signature.to_string()),
                        reason,
                    });
                }
                Some(status) if status.satisfies(config.commitment) => {
                    tracing::info!(signature = %signature, slot = status.slot, "transaction confirmed");
                    return Ok(());
                }
                _ => sleep(config.poll_interval).await,
            }
        }
    };

    match timeout(config.confirm_timeout, poll).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(signature = %signature, "confirmation timed out");
            Err(ClientError::Timeout {
                signature: signature.to_string(),
                after: config.confirm_timeout,
            })
        }
    }
}
