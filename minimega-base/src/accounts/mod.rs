//! Typed views over program-owned account bytes
//!
//! Every record is rebuilt from raw bytes on each fetch. Decoders verify the
//! leading tag, read fields in declared order through [`Reader`], and apply
//! the record's validation rules before returning, so a buffer of the wrong
//! kind surfaces as an error rather than a record full of garbage.

mod collection;
mod metadata;
mod presale;

pub use collection::{Collection, ItemType};
pub use metadata::{Creator, MetadataCollection, TokenMetadata, Uses};
pub use presale::{
    ContributorTotal, DonationConfig, PresaleConfig, PresaleContribution, aggregate_contributions,
};

use serde::Serialize;

use crate::codec::{Reader, StringLimit, Writer};
use crate::discriminator::{AccountKind, DISCRIMINATOR_LEN};
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::programs::ProgramLayout;
use crate::pubkey::Pubkey;
use crate::units::{MAX_BASIS_POINTS, check_basis_points};

pub const NAME_LIMIT: StringLimit = StringLimit::new("name", 100).printable();
pub const SYMBOL_LIMIT: StringLimit = StringLimit::new("symbol", 20).printable();
/// Collection URIs may be empty
pub const COLLECTION_URI_LIMIT: StringLimit = StringLimit::new("uri", 500).allow_empty();
pub const ITEM_URI_LIMIT: StringLimit = StringLimit::new("uri", 500).printable();

/// A fixed-schema account with an 8-byte tag
pub trait AccountRecord: Sized {
    const KIND: AccountKind;

    /// Read the fields that follow the tag
    fn decode_fields(reader: &mut Reader<'_>) -> DecodeResult<Self>;

    /// Write the fields that follow the tag
    fn encode_fields(&self, writer: &mut Writer) -> EncodeResult<()>;

    /// Decode a full account payload, tag included
    fn from_bytes(data: &[u8]) -> DecodeResult<Self> {
        Self::KIND.discriminator().verify(Self::KIND.name(), data)?;
        let mut reader = Reader::new(data);
        reader.read_bytes(DISCRIMINATOR_LEN)?;
        Self::decode_fields(&mut reader)
    }

    /// Decode skipping the tag check
    ///
    /// Used only for structural probing of accounts whose tag matched no
    /// known kind. Without a tag to vouch for the kind, anything after the
    /// fields must be zero padding.
    fn from_untagged(data: &[u8]) -> DecodeResult<Self> {
        let mut reader = Reader::new(data);
        reader.read_bytes(DISCRIMINATOR_LEN)?;
        let record = Self::decode_fields(&mut reader)?;
        reader.finish_padding()?;
        Ok(record)
    }

    fn to_bytes(&self) -> EncodeResult<Vec<u8>> {
        let mut writer = Writer::new();
        writer.write_bytes(Self::KIND.discriminator().as_bytes());
        self.encode_fields(&mut writer)?;
        Ok(writer.into_bytes())
    }
}

pub(crate) fn read_basis_points(reader: &mut Reader<'_>, field: &'static str) -> DecodeResult<u16> {
    let value = reader.read_u16()?;
    if value > MAX_BASIS_POINTS {
        return Err(DecodeError::FieldOutOfRange {
            field,
            value: value as u64,
        });
    }
    Ok(value)
}

/// Marketplace singleton as laid out by the collections program
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionsMarketplace {
    pub admin: Pubkey,
    pub fee_basis_points: u16,
    pub total_collections: u64,
    pub bump: u8,
}

impl CollectionsMarketplace {
    pub const LEN: usize = DISCRIMINATOR_LEN + 32 + 2 + 8 + 1;
}

impl AccountRecord for CollectionsMarketplace {
    const KIND: AccountKind = AccountKind::Marketplace;

    fn decode_fields(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            admin: reader.read_pubkey()?,
            fee_basis_points: read_basis_points(reader, "fee_basis_points")?,
            total_collections: reader.read_u64()?,
            bump: reader.read_u8()?,
        })
    }

    fn encode_fields(&self, writer: &mut Writer) -> EncodeResult<()> {
        writer
            .write_pubkey(&self.admin)
            .write_u16(check_basis_points("fee_basis_points", self.fee_basis_points)?)
            .write_u64(self.total_collections)
            .write_u8(self.bump);
        Ok(())
    }
}

/// Marketplace singleton as laid out by the presale program
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresaleMarketplace {
    pub admin: Pubkey,
    pub fee_basis_points: u16,
    pub bump: u8,
}

impl PresaleMarketplace {
    pub const LEN: usize = DISCRIMINATOR_LEN + 32 + 2 + 1;
}

impl AccountRecord for PresaleMarketplace {
    const KIND: AccountKind = AccountKind::Marketplace;

    fn decode_fields(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            admin: reader.read_pubkey()?,
            fee_basis_points: read_basis_points(reader, "fee_basis_points")?,
            bump: reader.read_u8()?,
        })
    }

    fn encode_fields(&self, writer: &mut Writer) -> EncodeResult<()> {
        writer
            .write_pubkey(&self.admin)
            .write_u16(check_basis_points("fee_basis_points", self.fee_basis_points)?)
            .write_u8(self.bump);
        Ok(())
    }
}

/// The marketplace singleton, one variant per program layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Marketplace {
    Collections(CollectionsMarketplace),
    Presale(PresaleMarketplace),
}

impl Marketplace {
    /// Decode using the schema of the given layout
    pub fn from_bytes(layout: ProgramLayout, data: &[u8]) -> DecodeResult<Self> {
        match layout {
            ProgramLayout::Collections => {
                CollectionsMarketplace::from_bytes(data).map(Marketplace::Collections)
            }
            ProgramLayout::Presale => PresaleMarketplace::from_bytes(data).map(Marketplace::Presale),
        }
    }

    pub fn to_bytes(&self) -> EncodeResult<Vec<u8>> {
        match self {
            Marketplace::Collections(inner) => inner.to_bytes(),
            Marketplace::Presale(inner) => inner.to_bytes(),
        }
    }

    pub fn layout(&self) -> ProgramLayout {
        match self {
            Marketplace::Collections(_) => ProgramLayout::Collections,
            Marketplace::Presale(_) => ProgramLayout::Presale,
        }
    }

    pub fn admin(&self) -> &Pubkey {
        match self {
            Marketplace::Collections(inner) => &inner.admin,
            Marketplace::Presale(inner) => &inner.admin,
        }
    }

    pub fn fee_basis_points(&self) -> u16 {
        match self {
            Marketplace::Collections(inner) => inner.fee_basis_points,
            Marketplace::Presale(inner) => inner.fee_basis_points,
        }
    }

    pub fn total_collections(&self) -> Option<u64> {
        match self {
            Marketplace::Collections(inner) => Some(inner.total_collections),
            Marketplace::Presale(_) => None,
        }
    }

    pub fn bump(&self) -> u8 {
        match self {
            Marketplace::Collections(inner) => inner.bump,
            Marketplace::Presale(inner) => inner.bump,
        }
    }
}
