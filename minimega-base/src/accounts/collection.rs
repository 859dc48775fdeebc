use serde::Serialize;

use super::{
    AccountRecord, COLLECTION_URI_LIMIT, ITEM_URI_LIMIT, NAME_LIMIT, SYMBOL_LIMIT,
    read_basis_points,
};
use crate::codec::{Reader, Writer};
use crate::discriminator::AccountKind;
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::pubkey::Pubkey;
use crate::units::{basis_points_to_percent, check_basis_points, lamports_to_sol};

/// An NFT collection
///
/// Pricing is not stored here; each collection owns any number of
/// [`ItemType`] records that carry price and supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    pub admin: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    /// Royalty in basis points
    pub royalty: u16,
    pub mint: Pubkey,
    pub is_active: bool,
    pub bump: u8,
}

impl Collection {
    /// Smallest possible encoding: empty uri, one-byte name and symbol
    pub const MIN_LEN: usize = 8 + 32 + (4 + 1) + (4 + 1) + 4 + 2 + 32 + 1 + 1;

    pub fn royalty_percent(&self) -> f64 {
        basis_points_to_percent(self.royalty)
    }
}

impl AccountRecord for Collection {
    const KIND: AccountKind = AccountKind::Collection;

    fn decode_fields(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            admin: reader.read_pubkey()?,
            name: reader.read_string(NAME_LIMIT)?,
            symbol: reader.read_string(SYMBOL_LIMIT)?,
            uri: reader.read_string(COLLECTION_URI_LIMIT)?,
            royalty: read_basis_points(reader, "royalty")?,
            mint: reader.read_pubkey()?,
            is_active: reader.read_bool()?,
            bump: reader.read_u8()?,
        })
    }

    fn encode_fields(&self, writer: &mut Writer) -> EncodeResult<()> {
        writer
            .write_pubkey(&self.admin)
            .write_string(&self.name, NAME_LIMIT)?
            .write_string(&self.symbol, SYMBOL_LIMIT)?
            .write_string(&self.uri, COLLECTION_URI_LIMIT)?
            .write_u16(check_basis_points("royalty", self.royalty)?)
            .write_pubkey(&self.mint)
            .write_bool(self.is_active)
            .write_u8(self.bump);
        Ok(())
    }
}

/// A purchasable item type within a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemType {
    /// Owning collection, by address
    pub collection: Pubkey,
    pub name: String,
    pub uri: String,
    /// Price in lamports
    pub price: u64,
    /// Zero means unlimited
    pub max_supply: u64,
    pub current_supply: u64,
    pub bump: u8,
}

impl ItemType {
    pub const MIN_LEN: usize = 8 + 32 + (4 + 1) + (4 + 1) + 8 + 8 + 8 + 1;

    pub fn price_sol(&self) -> f64 {
        lamports_to_sol(self.price)
    }

    pub fn is_sold_out(&self) -> bool {
        self.max_supply > 0 && self.current_supply >= self.max_supply
    }
}

impl AccountRecord for ItemType {
    const KIND: AccountKind = AccountKind::ItemType;

    fn decode_fields(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        let record = Self {
            collection: reader.read_pubkey()?,
            name: reader.read_string(NAME_LIMIT)?,
            uri: reader.read_string(ITEM_URI_LIMIT)?,
            price: reader.read_u64()?,
            max_supply: reader.read_u64()?,
            current_supply: reader.read_u64()?,
            bump: reader.read_u8()?,
        };
        if record.max_supply > 0 && record.current_supply > record.max_supply {
            return Err(DecodeError::FieldOutOfRange {
                field: "current_supply",
                value: record.current_supply,
            });
        }
        Ok(record)
    }

    fn encode_fields(&self, writer: &mut Writer) -> EncodeResult<()> {
        writer
            .write_pubkey(&self.collection)
            .write_string(&self.name, NAME_LIMIT)?
            .write_string(&self.uri, ITEM_URI_LIMIT)?
            .write_u64(self.price)
            .write_u64(self.max_supply)
            .write_u64(self.current_supply)
            .write_u8(self.bump);
        Ok(())
    }
}
