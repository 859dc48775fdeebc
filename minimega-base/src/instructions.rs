//! Instruction payload encoding
//!
//! A payload is the instruction's 8-byte tag followed by its arguments in
//! declared order. Encoding checks layout constraints only (string bounds,
//! basis point ranges); whether the program accepts the call is decided
//! on chain.

use serde::Serialize;

use crate::accounts::{ITEM_URI_LIMIT, NAME_LIMIT, SYMBOL_LIMIT, read_basis_points};
use crate::codec::{Reader, StringLimit, Writer};
use crate::discriminator::{DISCRIMINATOR_LEN, Discriminator, InstructionKind};
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::pubkey::Pubkey;
use crate::units::check_basis_points;

/// URIs passed to create_collection feed token metadata and may not be empty
const CREATE_COLLECTION_URI_LIMIT: StringLimit = StringLimit::new("uri", 500);

/// Arguments of every supported instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "instruction", rename_all = "snake_case")]
pub enum MarketplaceInstruction {
    InitializeMarketplace {
        fee_basis_points: u16,
    },
    CreateCollection {
        name: String,
        symbol: String,
        uri: String,
        royalty: u16,
    },
    CreateNftType {
        name: String,
        uri: String,
        /// Lamports
        price: u64,
        max_supply: u64,
    },
    MintNftFromCollection {
        item_type_name: String,
    },
    InitializeDonation,
    MintPresaleNft,
    Donate {
        /// Lamports
        amount: u64,
    },
    RestartPresale,
}

impl MarketplaceInstruction {
    pub fn kind(&self) -> InstructionKind {
        match self {
            Self::InitializeMarketplace { .. } => InstructionKind::InitializeMarketplace,
            Self::CreateCollection { .. } => InstructionKind::CreateCollection,
            Self::CreateNftType { .. } => InstructionKind::CreateNftType,
            Self::MintNftFromCollection { .. } => InstructionKind::MintNftFromCollection,
            Self::InitializeDonation => InstructionKind::InitializeDonation,
            Self::MintPresaleNft => InstructionKind::MintPresaleNft,
            Self::Donate { .. } => InstructionKind::Donate,
            Self::RestartPresale => InstructionKind::RestartPresale,
        }
    }

    /// Serialize into the program's wire layout
    pub fn encode(&self) -> EncodeResult<Vec<u8>> {
        let mut writer = Writer::with_capacity(64);
        writer.write_bytes(self.kind().discriminator().as_bytes());

        match self {
            Self::InitializeMarketplace { fee_basis_points } => {
                writer.write_u16(check_basis_points("fee_basis_points", *fee_basis_points)?);
            }
            Self::CreateCollection {
                name,
                symbol,
                uri,
                royalty,
            } => {
                writer
                    .write_string(name, NAME_LIMIT)?
                    .write_string(symbol, SYMBOL_LIMIT)?
                    .write_string(uri, CREATE_COLLECTION_URI_LIMIT)?
                    .write_u16(check_basis_points("royalty", *royalty)?);
            }
            Self::CreateNftType {
                name,
                uri,
                price,
                max_supply,
            } => {
                writer
                    .write_string(name, NAME_LIMIT)?
                    .write_string(uri, ITEM_URI_LIMIT)?
                    .write_u64(*price)
                    .write_u64(*max_supply);
            }
            Self::MintNftFromCollection { item_type_name } => {
                writer.write_string(item_type_name, NAME_LIMIT)?;
            }
            Self::Donate { amount } => {
                writer.write_u64(*amount);
            }
            // tag only
            Self::InitializeDonation | Self::MintPresaleNft | Self::RestartPresale => {}
        }

        Ok(writer.into_bytes())
    }

    /// Parse a payload back into arguments
    ///
    /// Unlike account decoding, the payload must be consumed exactly.
    pub fn decode(data: &[u8]) -> DecodeResult<Self> {
        let kind = InstructionKind::identify(data).ok_or_else(|| match Discriminator::peek(data) {
            Some(found) => DecodeError::DiscriminatorMismatch {
                kind: "instruction",
                found: found.to_string(),
            },
            None => DecodeError::Truncated {
                offset: 0,
                needed: DISCRIMINATOR_LEN,
                remaining: data.len(),
            },
        })?;

        let mut reader = Reader::new(data);
        reader.read_bytes(DISCRIMINATOR_LEN)?;

        let instruction = match kind {
            InstructionKind::InitializeMarketplace => Self::InitializeMarketplace {
                fee_basis_points: read_basis_points(&mut reader, "fee_basis_points")?,
            },
            InstructionKind::CreateCollection => Self::CreateCollection {
                name: reader.read_string(NAME_LIMIT)?,
                symbol: reader.read_string(SYMBOL_LIMIT)?,
                uri: reader.read_string(CREATE_COLLECTION_URI_LIMIT)?,
                royalty: read_basis_points(&mut reader, "royalty")?,
            },
            InstructionKind::CreateNftType => Self::CreateNftType {
                name: reader.read_string(NAME_LIMIT)?,
                uri: reader.read_string(ITEM_URI_LIMIT)?,
                price: reader.read_u64()?,
                max_supply: reader.read_u64()?,
            },
            InstructionKind::MintNftFromCollection => Self::MintNftFromCollection {
                item_type_name: reader.read_string(NAME_LIMIT)?,
            },
            InstructionKind::InitializeDonation => Self::InitializeDonation,
            InstructionKind::MintPresaleNft => Self::MintPresaleNft,
            InstructionKind::Donate => Self::Donate {
                amount: reader.read_u64()?,
            },
            InstructionKind::RestartPresale => Self::RestartPresale,
        };

        reader.finish()?;
        Ok(instruction)
    }
}

/// Amount carried by a donate payload, if `data` is one
///
/// Lets callers pull donation amounts out of instructions recorded in
/// transaction history.
pub fn donation_amount(data: &[u8]) -> Option<u64> {
    match MarketplaceInstruction::decode(data) {
        Ok(MarketplaceInstruction::Donate { amount }) => Some(amount),
        _ => None,
    }
}

/// An account referenced by an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn writable(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// A fully specified instruction ready to be placed in a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}
