//! Well-known program identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::discriminator::AccountKind;
use crate::pubkey::Pubkey;

/// Collections marketplace program (12LJUQx5mfVfqACGgEac65Xe6PMGnYm5rdaRRcU4HE7V)
pub const MARKETPLACE_PROGRAM_ID: Pubkey = Pubkey::new([
    0, 87, 103, 161, 71, 185, 24, 67, 149, 138, 160, 7, 12, 216, 238, 230, 252, 241, 86, 90, 60,
    76, 31, 22, 55, 98, 192, 47, 8, 85, 190, 156,
]);

/// Presale program (8KzE3LCicxv13iJx2v2V4VQQNWt4QHuvfuH8jxYnkGQ1)
pub const PRESALE_PROGRAM_ID: Pubkey = Pubkey::new([
    108, 222, 247, 165, 149, 168, 88, 88, 24, 21, 108, 40, 95, 146, 29, 14, 99, 90, 206, 131, 15,
    89, 178, 4, 217, 71, 108, 40, 182, 141, 128, 250,
]);

/// metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey = Pubkey::new([
    11, 112, 101, 177, 227, 209, 124, 69, 56, 157, 82, 127, 107, 4, 195, 205, 88, 184, 108, 115,
    26, 160, 253, 181, 73, 182, 209, 188, 3, 248, 41, 70,
]);

/// TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    6, 221, 246, 225, 215, 101, 161, 147, 217, 203, 225, 70, 206, 235, 121, 172, 28, 180, 133,
    237, 95, 91, 55, 145, 58, 140, 245, 133, 126, 255, 0, 169,
]);

/// ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    140, 151, 37, 143, 78, 36, 137, 241, 187, 61, 16, 41, 20, 142, 13, 131, 11, 90, 19, 153, 218,
    255, 16, 132, 4, 142, 123, 216, 219, 233, 248, 89,
]);

/// SysvarRent111111111111111111111111111111111
pub const SYSVAR_RENT_ID: Pubkey = Pubkey::new([
    6, 167, 213, 23, 25, 44, 92, 81, 33, 140, 201, 76, 61, 74, 241, 127, 88, 218, 238, 8, 155,
    161, 253, 68, 227, 219, 217, 138, 0, 0, 0, 0,
]);

pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0u8; 32]);

/// Which deployed program, and therefore which account schema, to target
///
/// The two programs share account names but not layouts, so the caller
/// selects one explicitly instead of having it guessed from the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgramLayout {
    /// Collections with per-item-type pricing
    #[default]
    Collections,
    /// Single-mint presale with donations
    Presale,
}

impl ProgramLayout {
    pub fn default_program_id(&self) -> Pubkey {
        match self {
            ProgramLayout::Collections => MARKETPLACE_PROGRAM_ID,
            ProgramLayout::Presale => PRESALE_PROGRAM_ID,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramLayout::Collections => "collections",
            ProgramLayout::Presale => "presale",
        }
    }

    /// Account kinds the program under this layout actually creates
    pub fn account_kinds(&self) -> &'static [AccountKind] {
        match self {
            ProgramLayout::Collections => &[
                AccountKind::Marketplace,
                AccountKind::Collection,
                AccountKind::ItemType,
                AccountKind::PresaleContribution,
            ],
            ProgramLayout::Presale => &[
                AccountKind::Marketplace,
                AccountKind::PresaleConfig,
                AccountKind::DonationConfig,
                AccountKind::PresaleContribution,
            ],
        }
    }

    pub fn owns(&self, kind: AccountKind) -> bool {
        self.account_kinds().contains(&kind)
    }
}

impl fmt::Display for ProgramLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgramLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collections" => Ok(ProgramLayout::Collections),
            "presale" => Ok(ProgramLayout::Presale),
            other => Err(format!(
                "unknown layout '{}': expected 'collections' or 'presale'",
                other
            )),
        }
    }
}
