use serde::Serialize;

use super::AccountRecord;
use crate::codec::{Reader, Writer};
use crate::discriminator::AccountKind;
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::pubkey::Pubkey;

/// One contribution towards a presale
///
/// A contributor may hold several of these; totals are summed at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresaleContribution {
    pub presale: Pubkey,
    pub contributor: Pubkey,
    /// Lamports
    pub amount: u64,
}

impl PresaleContribution {
    pub const LEN: usize = 8 + 32 + 32 + 8;
}

impl AccountRecord for PresaleContribution {
    const KIND: AccountKind = AccountKind::PresaleContribution;

    fn decode_fields(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            presale: reader.read_pubkey()?,
            contributor: reader.read_pubkey()?,
            amount: reader.read_u64()?,
        })
    }

    fn encode_fields(&self, writer: &mut Writer) -> EncodeResult<()> {
        writer
            .write_pubkey(&self.presale)
            .write_pubkey(&self.contributor)
            .write_u64(self.amount);
        Ok(())
    }
}

/// Presale mint settings and progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresaleConfig {
    pub presale_mint: Pubkey,
    /// Lamports per NFT
    pub price: u64,
    pub is_active: bool,
    pub total_minted: u64,
    pub max_supply: u64,
    pub bump: u8,
}

impl PresaleConfig {
    pub const LEN: usize = 8 + 32 + 8 + 1 + 8 + 8 + 1;

    pub fn remaining_supply(&self) -> u64 {
        self.max_supply.saturating_sub(self.total_minted)
    }
}

impl AccountRecord for PresaleConfig {
    const KIND: AccountKind = AccountKind::PresaleConfig;

    fn decode_fields(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            presale_mint: reader.read_pubkey()?,
            price: reader.read_u64()?,
            is_active: reader.read_bool()?,
            total_minted: reader.read_u64()?,
            max_supply: reader.read_u64()?,
            bump: reader.read_u8()?,
        })
    }

    fn encode_fields(&self, writer: &mut Writer) -> EncodeResult<()> {
        writer
            .write_pubkey(&self.presale_mint)
            .write_u64(self.price)
            .write_bool(self.is_active)
            .write_u64(self.total_minted)
            .write_u64(self.max_supply)
            .write_u8(self.bump);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonationConfig {
    pub admin: Pubkey,
    /// Lamports
    pub total_collected: u64,
    pub is_active: bool,
    pub bump: u8,
}

impl DonationConfig {
    pub const LEN: usize = 8 + 32 + 8 + 1 + 1;
}

impl AccountRecord for DonationConfig {
    const KIND: AccountKind = AccountKind::DonationConfig;

    fn decode_fields(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            admin: reader.read_pubkey()?,
            total_collected: reader.read_u64()?,
            is_active: reader.read_bool()?,
            bump: reader.read_u8()?,
        })
    }

    fn encode_fields(&self, writer: &mut Writer) -> EncodeResult<()> {
        writer
            .write_pubkey(&self.admin)
            .write_u64(self.total_collected)
            .write_bool(self.is_active)
            .write_u8(self.bump);
        Ok(())
    }
}

/// Summed contributions for one contributor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorTotal {
    pub contributor: Pubkey,
    /// Lamports
    pub total: u64,
    pub contributions: usize,
}

/// Sum amounts per contributor, in order of first appearance
///
/// Overflowing a contributor's u64 total is reported as an error rather
/// than wrapped or saturated.
pub fn aggregate_contributions<I>(contributions: I) -> DecodeResult<Vec<ContributorTotal>>
where
    I: IntoIterator<Item = (Pubkey, u64)>,
{
    let mut totals: Vec<ContributorTotal> = Vec::new();
    for (contributor, amount) in contributions {
        match totals.iter_mut().find(|t| t.contributor == contributor) {
            Some(entry) => {
                entry.total = entry.total.checked_add(amount).ok_or(
                    DecodeError::FieldOutOfRange {
                        field: "contribution total",
                        value: amount,
                    },
                )?;
                entry.contributions += 1;
            }
            None => totals.push(ContributorTotal {
                contributor,
                total: amount,
                contributions: 1,
            }),
        }
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presale_config_offsets() {
        let config = PresaleConfig {
            presale_mint: Pubkey::new([8u8; 32]),
            price: 500_000_000,
            is_active: true,
            total_minted: 12,
            max_supply: 1000,
            bump: 255,
        };
        let bytes = config.to_bytes().unwrap();
        assert_eq!(bytes.len(), PresaleConfig::LEN);
        assert_eq!(&bytes[8..40], &[8u8; 32]);
        assert_eq!(u64::from_le_bytes(bytes[40..48].try_into().unwrap()), 500_000_000);
        assert_eq!(bytes[48], 1);
        assert_eq!(u64::from_le_bytes(bytes[49..57].try_into().unwrap()), 12);
        assert_eq!(u64::from_le_bytes(bytes[57..65].try_into().unwrap()), 1000);
        assert_eq!(bytes[65], 255);

        let decoded = PresaleConfig::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, config);
        assert_eq!(decoded.remaining_supply(), 988);
    }

    #[test]
    fn test_donation_config_offsets() {
        let config = DonationConfig {
            admin: Pubkey::new([6u8; 32]),
            total_collected: 3_000_000_000,
            is_active: false,
            bump: 251,
        };
        let bytes = config.to_bytes().unwrap();
        assert_eq!(bytes.len(), DonationConfig::LEN);
        assert_eq!(u64::from_le_bytes(bytes[40..48].try_into().unwrap()), 3_000_000_000);
        assert_eq!(bytes[48], 0);
        assert_eq!(bytes[49], 251);
        assert_eq!(DonationConfig::from_bytes(&bytes).unwrap(), config);
    }

    #[test]
    fn test_aggregate_preserves_first_seen_order() {
        let alice = Pubkey::new([1u8; 32]);
        let bob = Pubkey::new([2u8; 32]);
        let totals =
            aggregate_contributions([(bob, 5), (alice, 10), (bob, 7), (alice, 1), (bob, 0)])
                .unwrap();
        assert_eq!(
            totals,
            vec![
                ContributorTotal {
                    contributor: bob,
                    total: 12,
                    contributions: 3
                },
                ContributorTotal {
                    contributor: alice,
                    total: 11,
                    contributions: 2
                },
            ]
        );
    }

    #[test]
    fn test_aggregate_overflow_is_error() {
        let alice = Pubkey::new([1u8; 32]);
        assert!(aggregate_contributions([(alice, u64::MAX), (alice, 1)]).is_err());
        assert!(aggregate_contributions(Vec::new()).unwrap().is_empty());
    }
}
