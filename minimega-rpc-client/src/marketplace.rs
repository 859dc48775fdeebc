//! Typed marketplace reads over a [`ChainConnection`]

use minimega_base::accounts::AccountRecord;
use minimega_base::pda;
use minimega_base::scanner::Keyed;
use minimega_base::{
    AccountScanner, Collection, ContributorTotal, DonationConfig, InstructionBuilder, ItemType,
    Marketplace, PresaleConfig, ProgramLayout, Pubkey, ScanReport, Signature, TokenMetadata,
};

use crate::connection::{ChainConnection, WalletSigner};
use crate::error::{ClientError, Result};
use crate::submit::{SubmitConfig, submit};

/// Marketplace program bound to a connection
///
/// The connection is owned by the caller's composition root and handed in
/// here; this type holds no other state.
#[derive(Debug, Clone)]
pub struct MarketplaceClient<C> {
    connection: C,
    layout: ProgramLayout,
    program_id: Pubkey,
}

impl<C: ChainConnection> MarketplaceClient<C> {
    /// Client for the default deployment of `layout`
    pub fn new(connection: C, layout: ProgramLayout) -> Self {
        let program_id = layout.default_program_id();
        Self::with_program_id(connection, layout, program_id)
    }

    /// Client for a specific deployment
    pub fn with_program_id(connection: C, layout: ProgramLayout, program_id: Pubkey) -> Self {
        Self {
            connection,
            layout,
            program_id,
        }
    }

    /// The underlying connection
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Account schema in use
    pub fn layout(&self) -> ProgramLayout {
        self.layout
    }

    /// Program whose accounts are read
    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Instruction builder targeting this deployment
    pub fn instructions(&self) -> InstructionBuilder {
        InstructionBuilder::new(self.program_id)
    }

    async fn fetch_required(&self, address: &Pubkey) -> Result<Vec<u8>> {
        self.connection
            .get_account_data(address)
            .await?
            .ok_or_else(|| ClientError::AccountNotFound(address.to_string()))
    }

    async fn fetch_optional<T: AccountRecord>(&self, address: &Pubkey) -> Result<Option<T>> {
        match self.connection.get_account_data(address).await? {
            Some(data) => Ok(Some(T::from_bytes(&data)?)),
            None => Ok(None),
        }
    }

    /// The marketplace singleton
    ///
    /// Missing or undecodable data is a hard error; nothing is guessed.
    pub async fn fetch_marketplace(&self) -> Result<Keyed<Marketplace>> {
        let (address, _) = pda::marketplace_address(&self.program_id)?;
        let data = self.fetch_required(&address).await?;
        let account = Marketplace::from_bytes(self.layout, &data)?;
        Ok(Keyed { address, account })
    }

    /// A collection by name, via its derived address
    pub async fn fetch_collection(&self, name: &str) -> Result<Option<Keyed<Collection>>> {
        let (address, _) = pda::collection_address(&self.program_id, name)?;
        Ok(self
            .fetch_optional::<Collection>(&address)
            .await?
            .map(|account| Keyed { address, account }))
    }

    /// An item type by collection name and item name
    pub async fn fetch_item_type(
        &self,
        collection_name: &str,
        name: &str,
    ) -> Result<Option<Keyed<ItemType>>> {
        let (collection, _) = pda::collection_address(&self.program_id, collection_name)?;
        let (address, _) = pda::item_type_address(&self.program_id, &collection, name)?;
        Ok(self
            .fetch_optional::<ItemType>(&address)
            .await?
            .map(|account| Keyed { address, account }))
    }

    /// Classify every account the program owns
    pub async fn scan(&self) -> Result<ScanReport> {
        let accounts = self.connection.get_program_accounts(&self.program_id).await?;
        Ok(AccountScanner::new(self.layout).scan(&accounts))
    }

    /// The presale config, if initialized
    pub async fn fetch_presale_config(&self) -> Result<Option<PresaleConfig>> {
        let (address, _) = pda::presale_config_address(&self.program_id)?;
        self.fetch_optional(&address).await
    }

    /// The donation config, if initialized
    pub async fn fetch_donation_config(&self) -> Result<Option<DonationConfig>> {
        let (address, _) = pda::donation_config_address(&self.program_id)?;
        self.fetch_optional(&address).await
    }

    /// Contribution totals per contributor, from a full program scan
    pub async fn fetch_contributions(&self) -> Result<Vec<ContributorTotal>> {
        let report = self.scan().await?;
        Ok(report.contributor_totals()?)
    }

    /// Token metadata for an NFT mint
    pub async fn fetch_metadata(&self, mint: &Pubkey) -> Result<Option<TokenMetadata>> {
        let (address, _) = pda::metadata_address(mint)?;
        match self.connection.get_account_data(&address).await? {
            Some(data) => Ok(Some(TokenMetadata::from_bytes(&data)?)),
            None => Ok(None),
        }
    }

    /// Submit instructions signed by `signer`
    pub async fn submit<S: WalletSigner + ?Sized>(
        &self,
        signer: &S,
        instructions: Vec<minimega_base::Instruction>,
        config: &SubmitConfig,
    ) -> Result<Signature> {
        submit(&self.connection, signer, instructions, config).await
    }
}
