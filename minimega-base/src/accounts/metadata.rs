//! Token metadata accounts
//!
//! These belong to the token metadata program, not the marketplace, and
//! carry a one-byte key instead of an 8-byte discriminator. String fields
//! are stored NUL-padded to fixed widths; the padding is stripped on read.

use serde::Serialize;

use crate::codec::{Reader, StringLimit, Writer};
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::pubkey::Pubkey;
use crate::units::check_basis_points;

/// Key byte of a version 1 metadata account
pub const METADATA_V1_KEY: u8 = 4;
pub const MAX_CREATORS: usize = 5;

const NAME: StringLimit = StringLimit::new("name", 32).allow_empty();
const SYMBOL: StringLimit = StringLimit::new("symbol", 10).allow_empty();
const URI: StringLimit = StringLimit::new("uri", 200).allow_empty();

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Creator {
    pub address: Pubkey,
    pub verified: bool,
    /// Percentage of royalties, all creators summing to 100
    pub share: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataCollection {
    pub verified: bool,
    pub key: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Uses {
    pub use_method: u8,
    pub remaining: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenMetadata {
    pub update_authority: Pubkey,
    pub mint: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Option<Vec<Creator>>,
    pub primary_sale_happened: bool,
    pub is_mutable: bool,
    pub edition_nonce: Option<u8>,
    pub token_standard: Option<u8>,
    pub collection: Option<MetadataCollection>,
    pub uses: Option<Uses>,
}

fn read_padded(reader: &mut Reader<'_>, limit: StringLimit) -> DecodeResult<String> {
    let value = reader.read_string(limit)?;
    Ok(value.trim_end_matches('\0').to_string())
}

fn read_creator(reader: &mut Reader<'_>) -> DecodeResult<Creator> {
    Ok(Creator {
        address: reader.read_pubkey()?,
        verified: reader.read_bool()?,
        share: reader.read_u8()?,
    })
}

/// Trailing optional fields were appended by later program versions, so an
/// older account may simply end before them.
fn read_trailing<T, F>(reader: &mut Reader<'_>, read: F) -> DecodeResult<Option<T>>
where
    F: FnOnce(&mut Reader<'_>) -> DecodeResult<T>,
{
    if reader.is_empty() {
        return Ok(None);
    }
    reader.read_option(read)
}

impl TokenMetadata {
    pub fn from_bytes(data: &[u8]) -> DecodeResult<Self> {
        let mut reader = Reader::new(data);
        let key = reader.read_u8()?;
        if key != METADATA_V1_KEY {
            return Err(DecodeError::FieldOutOfRange {
                field: "key",
                value: key as u64,
            });
        }

        let update_authority = reader.read_pubkey()?;
        let mint = reader.read_pubkey()?;
        let name = read_padded(&mut reader, NAME)?;
        let symbol = read_padded(&mut reader, SYMBOL)?;
        let uri = read_padded(&mut reader, URI)?;
        let seller_fee_basis_points = super::read_basis_points(&mut reader, "seller_fee_basis_points")?;
        let creators =
            reader.read_option(|r| r.read_vec("creators", MAX_CREATORS, read_creator))?;
        let primary_sale_happened = reader.read_bool()?;
        let is_mutable = reader.read_bool()?;

        let edition_nonce = read_trailing(&mut reader, |r| r.read_u8())?;
        let token_standard = read_trailing(&mut reader, |r| r.read_u8())?;
        let collection = read_trailing(&mut reader, |r| {
            Ok(MetadataCollection {
                verified: r.read_bool()?,
                key: r.read_pubkey()?,
            })
        })?;
        let uses = read_trailing(&mut reader, |r| {
            Ok(Uses {
                use_method: r.read_u8()?,
                remaining: r.read_u64()?,
                total: r.read_u64()?,
            })
        })?;

        Ok(Self {
            update_authority,
            mint,
            name,
            symbol,
            uri,
            seller_fee_basis_points,
            creators,
            primary_sale_happened,
            is_mutable,
            edition_nonce,
            token_standard,
            collection,
            uses,
        })
    }

    pub fn to_bytes(&self) -> EncodeResult<Vec<u8>> {
        let mut writer = Writer::new();
        writer
            .write_u8(METADATA_V1_KEY)
            .write_pubkey(&self.update_authority)
            .write_pubkey(&self.mint)
            .write_string(&self.name, NAME)?
            .write_string(&self.symbol, SYMBOL)?
            .write_string(&self.uri, URI)?
            .write_u16(check_basis_points(
                "seller_fee_basis_points",
                self.seller_fee_basis_points,
            )?)
            .write_option(self.creators.as_ref(), |w, creators| {
                w.write_u32(creators.len() as u32);
                for creator in creators {
                    w.write_pubkey(&creator.address)
                        .write_bool(creator.verified)
                        .write_u8(creator.share);
                }
            })
            .write_bool(self.primary_sale_happened)
            .write_bool(self.is_mutable)
            .write_option(self.edition_nonce.as_ref(), |w, nonce| {
                w.write_u8(*nonce);
            })
            .write_option(self.token_standard.as_ref(), |w, standard| {
                w.write_u8(*standard);
            })
            .write_option(self.collection.as_ref(), |w, collection| {
                w.write_bool(collection.verified).write_pubkey(&collection.key);
            })
            .write_option(self.uses.as_ref(), |w, uses| {
                w.write_u8(uses.use_method)
                    .write_u64(uses.remaining)
                    .write_u64(uses.total);
            });
        Ok(writer.into_bytes())
    }
}
