//! Seams to the chain and to the wallet
//!
//! Everything that talks to the network goes through [`ChainConnection`],
//! and everything that needs a private key goes through [`WalletSigner`].
//! Both are passed in explicitly; nothing here holds global state.

use async_trait::async_trait;
use serde::Serialize;

use minimega_base::{Instruction, ProgramAccount, Pubkey, Signature};

use crate::error::{Result, SigningError};
use crate::types::{LatestBlockhash, SignatureStatus};

/// Read and submit access to a chain node
#[async_trait]
pub trait ChainConnection: Send + Sync {
    /// Raw data of one account, `None` if it does not exist
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// Every account owned by `program_id`
    async fn get_program_accounts(&self, program_id: &Pubkey) -> Result<Vec<ProgramAccount>>;

    /// A blockhash new transactions can reference
    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash>;

    /// Submit a fully signed, serialized transaction
    async fn send_raw_transaction(&self, transaction: &[u8]) -> Result<Signature>;

    /// Current status of a submitted transaction, `None` if unseen
    async fn get_signature_status(&self, signature: &Signature) -> Result<Option<SignatureStatus>>;
}

/// Everything a signer needs to assemble and sign a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRequest {
    /// Account paying fees, normally the signer itself
    pub fee_payer: Pubkey,
    /// Base58 blockhash the transaction is anchored to
    pub recent_blockhash: String,
    /// Instructions in execution order
    pub instructions: Vec<Instruction>,
}

impl TransactionRequest {
    /// Accounts that must sign, fee payer first, without duplicates
    pub fn required_signers(&self) -> Vec<Pubkey> {
        let mut signers = vec![self.fee_payer];
        for meta in self.instructions.iter().flat_map(|ix| ix.accounts.iter()) {
            if meta.is_signer && !signers.contains(&meta.pubkey) {
                signers.push(meta.pubkey);
            }
        }
        signers
    }
}

/// External wallet capable of signing transactions
///
/// Implementations compile the message, collect every required signature
/// and return wire-format transaction bytes.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Key paying for and authorizing transactions
    fn pubkey(&self) -> Pubkey;

    /// Produce a serialized signed transaction
    async fn sign_transaction(
        &self,
        request: &TransactionRequest,
    ) -> std::result::Result<Vec<u8>, SigningError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimega_base::AccountMeta;

    #[test]
    fn test_required_signers_deduplicated() {
        let payer = Pubkey::new([1u8; 32]);
        let mint = Pubkey::new([2u8; 32]);
        let request = TransactionRequest {
            fee_payer: payer,
            recent_blockhash: "11111111111111111111111111111111".to_string(),
            instructions: vec![Instruction {
                program_id: Pubkey::new([9u8; 32]),
                accounts: vec![
                    AccountMeta::writable(Pubkey::new([3u8; 32]), false),
                    AccountMeta::writable(mint, true),
                    AccountMeta::writable(payer, true),
                ],
                data: vec![],
            }],
        };
        assert_eq!(request.required_signers(), vec![payer, mint]);
    }
}
