use crate::error::EncodeResult;
use crate::instructions::{AccountMeta, Instruction, MarketplaceInstruction};
use crate::pda;
use crate::programs::{
    ASSOCIATED_TOKEN_PROGRAM_ID, ProgramLayout, SYSTEM_PROGRAM_ID, SYSVAR_RENT_ID,
    TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
use crate::pubkey::Pubkey;

/// Assembles instructions with their account lists
///
/// Program-derived accounts are computed here from the builder's program id,
/// so callers only supply wallets, mints and names.
#[derive(Debug, Clone, Copy)]
pub struct InstructionBuilder {
    program_id: Pubkey,
}

impl InstructionBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    /// Builder targeting the default deployment of a layout
    pub fn for_layout(layout: ProgramLayout) -> Self {
        Self::new(layout.default_program_id())
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    fn instruction(
        &self,
        args: MarketplaceInstruction,
        accounts: Vec<AccountMeta>,
    ) -> EncodeResult<Instruction> {
        Ok(Instruction {
            program_id: self.program_id,
            accounts,
            data: args.encode()?,
        })
    }

    pub fn build_initialize_marketplace(
        &self,
        admin: Pubkey,
        fee_basis_points: u16,
    ) -> EncodeResult<Instruction> {
        let (marketplace, _) = pda::marketplace_address(&self.program_id)?;
        self.instruction(
            MarketplaceInstruction::InitializeMarketplace { fee_basis_points },
            vec![
                AccountMeta::writable(marketplace, false),
                AccountMeta::writable(admin, true),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            ],
        )
    }

    /// Create a collection whose NFT mint is the freshly generated `mint`
    ///
    /// `mint` must also sign the transaction.
    pub fn build_create_collection(
        &self,
        admin: Pubkey,
        mint: Pubkey,
        name: &str,
        symbol: &str,
        uri: &str,
        royalty: u16,
    ) -> EncodeResult<Instruction> {
        let (marketplace, _) = pda::marketplace_address(&self.program_id)?;
        let (collection, _) = pda::collection_address(&self.program_id, name)?;
        let admin_token_account = pda::associated_token_address(&admin, &mint)?;
        let (metadata, _) = pda::metadata_address(&mint)?;
        let (master_edition, _) = pda::master_edition_address(&mint)?;

        self.instruction(
            MarketplaceInstruction::CreateCollection {
                name: name.to_string(),
                symbol: symbol.to_string(),
                uri: uri.to_string(),
                royalty,
            },
            vec![
                AccountMeta::writable(marketplace, false),
                AccountMeta::writable(collection, false),
                AccountMeta::writable(mint, true),
                AccountMeta::writable(admin_token_account, false),
                AccountMeta::writable(metadata, false),
                AccountMeta::writable(master_edition, false),
                AccountMeta::writable(admin, true),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
                AccountMeta::readonly(TOKEN_METADATA_PROGRAM_ID, false),
                AccountMeta::readonly(SYSVAR_RENT_ID, false),
            ],
        )
    }

    pub fn build_create_nft_type(
        &self,
        admin: Pubkey,
        collection_name: &str,
        name: &str,
        uri: &str,
        price: u64,
        max_supply: u64,
    ) -> EncodeResult<Instruction> {
        let (collection, _) = pda::collection_address(&self.program_id, collection_name)?;
        let (item_type, _) = pda::item_type_address(&self.program_id, &collection, name)?;

        self.instruction(
            MarketplaceInstruction::CreateNftType {
                name: name.to_string(),
                uri: uri.to_string(),
                price,
                max_supply,
            },
            vec![
                AccountMeta::writable(collection, false),
                AccountMeta::writable(item_type, false),
                AccountMeta::writable(admin, true),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            ],
        )
    }

    /// Mint one NFT of an item type to `buyer`
    ///
    /// Both `nft_mint` and the collection admin co-sign alongside the buyer.
    pub fn build_mint_nft_from_collection(
        &self,
        buyer: Pubkey,
        nft_mint: Pubkey,
        collection_name: &str,
        collection_admin: Pubkey,
        collection_mint: Pubkey,
        item_type_name: &str,
    ) -> EncodeResult<Instruction> {
        let (collection, _) = pda::collection_address(&self.program_id, collection_name)?;
        let (item_type, _) = pda::item_type_address(&self.program_id, &collection, item_type_name)?;
        let buyer_token_account = pda::associated_token_address(&buyer, &nft_mint)?;
        let (nft_metadata, _) = pda::metadata_address(&nft_mint)?;
        let (collection_metadata, _) = pda::metadata_address(&collection_mint)?;
        let (collection_master_edition, _) = pda::master_edition_address(&collection_mint)?;

        self.instruction(
            MarketplaceInstruction::MintNftFromCollection {
                item_type_name: item_type_name.to_string(),
            },
            vec![
                AccountMeta::writable(collection, false),
                AccountMeta::writable(item_type, false),
                AccountMeta::writable(nft_mint, true),
                AccountMeta::writable(buyer_token_account, false),
                AccountMeta::writable(nft_metadata, false),
                AccountMeta::writable(collection_metadata, false),
                AccountMeta::writable(collection_master_edition, false),
                AccountMeta::readonly(collection_mint, false),
                AccountMeta::writable(collection_admin, true),
                AccountMeta::writable(buyer, true),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
                AccountMeta::readonly(TOKEN_METADATA_PROGRAM_ID, false),
                AccountMeta::readonly(SYSVAR_RENT_ID, false),
            ],
        )
    }

    pub fn build_initialize_donation(&self, admin: Pubkey) -> EncodeResult<Instruction> {
        let (marketplace, _) = pda::marketplace_address(&self.program_id)?;
        let (donation_config, _) = pda::donation_config_address(&self.program_id)?;
        self.instruction(
            MarketplaceInstruction::InitializeDonation,
            vec![
                AccountMeta::readonly(marketplace, false),
                AccountMeta::writable(donation_config, false),
                AccountMeta::writable(admin, true),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            ],
        )
    }

    /// Buy one presale NFT; proceeds go to `treasury_admin`
    pub fn build_mint_presale_nft(
        &self,
        buyer: Pubkey,
        nft_mint: Pubkey,
        treasury_admin: Pubkey,
    ) -> EncodeResult<Instruction> {
        let (marketplace, _) = pda::marketplace_address(&self.program_id)?;
        let (presale_config, _) = pda::presale_config_address(&self.program_id)?;
        let buyer_token_account = pda::associated_token_address(&buyer, &nft_mint)?;
        let (nft_metadata, _) = pda::metadata_address(&nft_mint)?;

        self.instruction(
            MarketplaceInstruction::MintPresaleNft,
            vec![
                AccountMeta::readonly(marketplace, false),
                AccountMeta::writable(presale_config, false),
                AccountMeta::writable(treasury_admin, false),
                AccountMeta::writable(buyer, true),
                AccountMeta::writable(nft_mint, true),
                AccountMeta::writable(buyer_token_account, false),
                AccountMeta::writable(nft_metadata, false),
                AccountMeta::readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
                AccountMeta::readonly(TOKEN_METADATA_PROGRAM_ID, false),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::readonly(SYSVAR_RENT_ID, false),
            ],
        )
    }

    pub fn build_donate(
        &self,
        donor: Pubkey,
        donation_admin: Pubkey,
        amount: u64,
    ) -> EncodeResult<Instruction> {
        let (donation_config, _) = pda::donation_config_address(&self.program_id)?;
        self.instruction(
            MarketplaceInstruction::Donate { amount },
            vec![
                AccountMeta::writable(donation_config, false),
                AccountMeta::writable(donation_admin, false),
                AccountMeta::writable(donor, true),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            ],
        )
    }

    pub fn build_restart_presale(&self, admin: Pubkey) -> EncodeResult<Instruction> {
        let (presale, _) = pda::presale_address(&self.program_id)?;
        self.instruction(
            MarketplaceInstruction::RestartPresale,
            vec![
                AccountMeta::writable(presale, false),
                AccountMeta::writable(admin, true),
                AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programs::{MARKETPLACE_PROGRAM_ID, PRESALE_PROGRAM_ID};

    fn signers(instruction: &Instruction) -> Vec<Pubkey> {
        instruction
            .accounts
            .iter()
            .filter(|meta| meta.is_signer)
            .map(|meta| meta.pubkey)
            .collect()
    }

    #[test]
    fn test_initialize_marketplace_accounts() {
        let admin = Pubkey::new([7u8; 32]);
        let builder = InstructionBuilder::new(MARKETPLACE_PROGRAM_ID);
        let ix = builder.build_initialize_marketplace(admin, 250).unwrap();

        assert_eq!(ix.program_id, MARKETPLACE_PROGRAM_ID);
        assert_eq!(ix.accounts.len(), 3);
        assert_eq!(
            ix.accounts[0].pubkey.to_base58(),
            "Qrj8xtmBGkwi3Z8n9ivPaSrWpRYL7VeH9cxgYe8GCDz"
        );
        assert!(ix.accounts[0].is_writable);
        assert_eq!(signers(&ix), vec![admin]);
        assert_eq!(&ix.data[8..], &250u16.to_le_bytes());
    }

    #[test]
    fn test_create_collection_derives_collection_address() {
        let admin = Pubkey::new([7u8; 32]);
        let mint = Pubkey::new([8u8; 32]);
        let builder = InstructionBuilder::for_layout(ProgramLayout::Collections);
        let ix = builder
            .build_create_collection(admin, mint, "Heroes", "HRO", "https://x/y.json", 500)
            .unwrap();

        assert_eq!(ix.accounts.len(), 12);
        assert_eq!(
            ix.accounts[1].pubkey.to_base58(),
            "D2kyGh4fgNtb8V7zPgyvGcJJS5HiE2e4oaoAcR9qHUAZ"
        );
        assert_eq!(signers(&ix), vec![mint, admin]);
        assert_eq!(ix.accounts[10].pubkey, TOKEN_METADATA_PROGRAM_ID);
    }

    #[test]
    fn test_create_collection_rejects_bad_royalty() {
        let builder = InstructionBuilder::new(MARKETPLACE_PROGRAM_ID);
        let result = builder.build_create_collection(
            Pubkey::new([7u8; 32]),
            Pubkey::new([8u8; 32]),
            "Heroes",
            "HRO",
            "u",
            10_001,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_mint_from_collection_signers_and_order() {
        let buyer = Pubkey::new([1u8; 32]);
        let nft_mint = Pubkey::new([2u8; 32]);
        let collection_admin = Pubkey::new([3u8; 32]);
        let collection_mint = Pubkey::new([4u8; 32]);
        let builder = InstructionBuilder::new(MARKETPLACE_PROGRAM_ID);
        let ix = builder
            .build_mint_nft_from_collection(
                buyer,
                nft_mint,
                "Heroes",
                collection_admin,
                collection_mint,
                "Sword",
            )
            .unwrap();

        assert_eq!(ix.accounts.len(), 15);
        assert_eq!(signers(&ix), vec![nft_mint, collection_admin, buyer]);
        assert_eq!(ix.accounts[7], AccountMeta::readonly(collection_mint, false));

        let (collection, _) = pda::collection_address(&MARKETPLACE_PROGRAM_ID, "Heroes").unwrap();
        let (item_type, _) =
            pda::item_type_address(&MARKETPLACE_PROGRAM_ID, &collection, "Sword").unwrap();
        assert_eq!(ix.accounts[0].pubkey, collection);
        assert_eq!(ix.accounts[1].pubkey, item_type);
    }

    #[test]
    fn test_presale_program_instructions() {
        let builder = InstructionBuilder::new(PRESALE_PROGRAM_ID);
        let donor = Pubkey::new([5u8; 32]);
        let admin = Pubkey::new([6u8; 32]);

        let donate = builder.build_donate(donor, admin, 1_000_000).unwrap();
        assert_eq!(donate.accounts.len(), 4);
        assert_eq!(signers(&donate), vec![donor]);
        assert_eq!(crate::instructions::donation_amount(&donate.data), Some(1_000_000));

        let restart = builder.build_restart_presale(admin).unwrap();
        assert_eq!(restart.accounts.len(), 3);
        assert_eq!(
            restart.accounts[0].pubkey.to_base58(),
            "5cDrWX8t4Kqhgj124d5HDd25iFRvMkeoBLFZoWg71xg6"
        );

        let mint = builder
            .build_mint_presale_nft(donor, Pubkey::new([9u8; 32]), admin)
            .unwrap();
        assert_eq!(mint.accounts.len(), 12);
        assert_eq!(
            mint.accounts[1].pubkey.to_base58(),
            "7kFkhgrvR4mNUh4x5N37Ru26jCDw1HkEehJ9GfDeDiCT"
        );

        let init = builder.build_initialize_donation(admin).unwrap();
        assert!(!init.accounts[0].is_writable);
        assert_eq!(init.data, vec![126, 69, 140, 217, 145, 65, 209, 132]);
    }
}
