//! 8-byte type tags for accounts and instructions
//!
//! Two derivation strategies coexist. Some tags are hardcoded byte sequences
//! taken from the deployed program's interface; the rest are computed as the
//! first 8 bytes of `sha256("<namespace>:<name>")`. A hardcoded tag is never
//! recomputed, even where the two would disagree.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{DecodeError, DecodeResult};

pub const DISCRIMINATOR_LEN: usize = 8;

/// An 8-byte type tag
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Discriminator(pub [u8; DISCRIMINATOR_LEN]);

impl Discriminator {
    pub const fn new(bytes: [u8; DISCRIMINATOR_LEN]) -> Self {
        Self(bytes)
    }

    /// First 8 bytes of `sha256("<namespace>:<name>")`
    pub fn computed(namespace: &str, name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(namespace.as_bytes());
        hasher.update(b":");
        hasher.update(name.as_bytes());
        let digest = hasher.finalize();
        let mut tag = [0u8; DISCRIMINATOR_LEN];
        tag.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
        Self(tag)
    }

    /// Tag for an instruction handler
    pub fn global(instruction: &str) -> Self {
        Self::computed("global", instruction)
    }

    /// Tag for an account struct
    pub fn account(name: &str) -> Self {
        Self::computed("account", name)
    }

    pub fn as_bytes(&self) -> &[u8; DISCRIMINATOR_LEN] {
        &self.0
    }

    /// Read the leading tag of a buffer
    pub fn peek(data: &[u8]) -> Option<Self> {
        let head = data.get(..DISCRIMINATOR_LEN)?;
        let mut tag = [0u8; DISCRIMINATOR_LEN];
        tag.copy_from_slice(head);
        Some(Self(tag))
    }

    /// Check the buffer starts with this tag
    pub fn verify(&self, kind: &'static str, data: &[u8]) -> DecodeResult<()> {
        match Self::peek(data) {
            Some(found) if found == *self => Ok(()),
            Some(found) => Err(DecodeError::DiscriminatorMismatch {
                kind,
                found: found.to_string(),
            }),
            None => Err(DecodeError::Truncated {
                offset: 0,
                needed: DISCRIMINATOR_LEN,
                remaining: data.len(),
            }),
        }
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Discriminator({:?})", self.0)
    }
}

/// How a tag is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSource {
    /// Hardcoded bytes
    Static([u8; DISCRIMINATOR_LEN]),
    /// Hash of `<namespace>:<name>`
    Computed {
        namespace: &'static str,
        name: &'static str,
    },
}

impl TagSource {
    pub fn resolve(&self) -> Discriminator {
        match self {
            TagSource::Static(bytes) => Discriminator(*bytes),
            TagSource::Computed { namespace, name } => Discriminator::computed(namespace, name),
        }
    }
}

/// Account kinds owned by the marketplace programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Marketplace,
    Collection,
    ItemType,
    PresaleContribution,
    PresaleConfig,
    DonationConfig,
}

impl AccountKind {
    pub const ALL: [AccountKind; 6] = [
        AccountKind::Marketplace,
        AccountKind::Collection,
        AccountKind::ItemType,
        AccountKind::PresaleContribution,
        AccountKind::PresaleConfig,
        AccountKind::DonationConfig,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            AccountKind::Marketplace => "Marketplace",
            AccountKind::Collection => "NFTCollection",
            AccountKind::ItemType => "NftType",
            AccountKind::PresaleContribution => "PresaleContribution",
            AccountKind::PresaleConfig => "PresaleConfig",
            AccountKind::DonationConfig => "DonationConfig",
        }
    }

    pub const fn tag_source(&self) -> TagSource {
        match self {
            AccountKind::Marketplace => TagSource::Static([70, 222, 41, 62, 78, 3, 32, 174]),
            AccountKind::Collection => {
                TagSource::Static([243, 209, 195, 150, 192, 176, 151, 165])
            }
            kind => TagSource::Computed {
                namespace: "account",
                name: kind.name(),
            },
        }
    }

    pub fn discriminator(&self) -> Discriminator {
        self.tag_source().resolve()
    }

    /// Find the kind whose tag leads `data`
    pub fn identify(data: &[u8]) -> Option<AccountKind> {
        let tag = Discriminator::peek(data)?;
        Self::ALL.into_iter().find(|kind| kind.discriminator() == tag)
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Instructions accepted by the marketplace programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    InitializeMarketplace,
    CreateCollection,
    CreateNftType,
    MintNftFromCollection,
    InitializeDonation,
    MintPresaleNft,
    Donate,
    RestartPresale,
}

impl InstructionKind {
    pub const ALL: [InstructionKind; 8] = [
        InstructionKind::InitializeMarketplace,
        InstructionKind::CreateCollection,
        InstructionKind::CreateNftType,
        InstructionKind::MintNftFromCollection,
        InstructionKind::InitializeDonation,
        InstructionKind::MintPresaleNft,
        InstructionKind::Donate,
        InstructionKind::RestartPresale,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            InstructionKind::InitializeMarketplace => "initialize_marketplace",
            InstructionKind::CreateCollection => "create_collection",
            InstructionKind::CreateNftType => "create_nft_type",
            InstructionKind::MintNftFromCollection => "mint_nft_from_collection",
            InstructionKind::InitializeDonation => "initialize_donation",
            InstructionKind::MintPresaleNft => "mint_presale_nft",
            InstructionKind::Donate => "donate",
            InstructionKind::RestartPresale => "restart_presale",
        }
    }

    pub const fn tag_source(&self) -> TagSource {
        match self {
            InstructionKind::CreateCollection => {
                TagSource::Static([39, 179, 4, 147, 128, 226, 252, 134])
            }
            InstructionKind::InitializeDonation => {
                TagSource::Static([126, 69, 140, 217, 145, 65, 209, 132])
            }
            InstructionKind::MintPresaleNft => {
                TagSource::Static([201, 197, 156, 166, 208, 236, 41, 144])
            }
            InstructionKind::Donate => TagSource::Static([121, 186, 218, 211, 73, 70, 196, 180]),
            InstructionKind::RestartPresale => {
                TagSource::Static([137, 20, 194, 15, 240, 82, 236, 229])
            }
            kind => TagSource::Computed {
                namespace: "global",
                name: kind.name(),
            },
        }
    }

    pub fn discriminator(&self) -> Discriminator {
        self.tag_source().resolve()
    }

    pub fn identify(data: &[u8]) -> Option<InstructionKind> {
        let tag = Discriminator::peek(data)?;
        Self::ALL.into_iter().find(|kind| kind.discriminator() == tag)
    }

    pub fn from_name(name: &str) -> Option<InstructionKind> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_computed_tags() {
        assert_eq!(
            Discriminator::global("initialize_marketplace").0,
            [47, 81, 64, 0, 96, 56, 105, 7]
        );
        assert_eq!(
            Discriminator::global("create_nft_type").0,
            [213, 255, 55, 57, 94, 49, 146, 192]
        );
        assert_eq!(
            Discriminator::global("mint_nft_from_collection").0,
            [157, 81, 72, 124, 57, 0, 110, 9]
        );
        assert_eq!(
            Discriminator::account("NftType").0,
            [243, 24, 2, 128, 204, 145, 35, 223]
        );
    }

    #[test]
    fn test_static_account_tags_match_hash_convention() {
        assert_eq!(
            AccountKind::Marketplace.discriminator(),
            Discriminator::account("Marketplace")
        );
        assert_eq!(
            AccountKind::Collection.discriminator(),
            Discriminator::account("NFTCollection")
        );
    }

    #[test]
    fn test_static_instruction_tags() {
        // these agree with the hash convention
        for kind in [
            InstructionKind::Donate,
            InstructionKind::InitializeDonation,
            InstructionKind::MintPresaleNft,
        ] {
            assert_eq!(kind.discriminator(), Discriminator::global(kind.name()));
        }
        // these do not; the hardcoded bytes win
        for kind in [InstructionKind::CreateCollection, InstructionKind::RestartPresale] {
            assert_ne!(kind.discriminator(), Discriminator::global(kind.name()));
            assert!(matches!(kind.tag_source(), TagSource::Static(_)));
        }
        assert_eq!(
            InstructionKind::CreateCollection.discriminator().0,
            [39, 179, 4, 147, 128, 226, 252, 134]
        );
    }

    #[test]
    fn test_tags_are_unique() {
        let accounts: HashSet<_> = AccountKind::ALL.iter().map(|k| k.discriminator()).collect();
        assert_eq!(accounts.len(), AccountKind::ALL.len());
        let instructions: HashSet<_> =
            InstructionKind::ALL.iter().map(|k| k.discriminator()).collect();
        assert_eq!(instructions.len(), InstructionKind::ALL.len());
    }

    #[test]
    fn test_identify() {
        let mut data = AccountKind::ItemType.discriminator().0.to_vec();
        data.extend_from_slice(&[0u8; 40]);
        assert_eq!(AccountKind::identify(&data), Some(AccountKind::ItemType));
        assert_eq!(AccountKind::identify(&[0u8; 7]), None);
        assert_eq!(AccountKind::identify(&[0u8; 16]), None);

        let donate = [121, 186, 218, 211, 73, 70, 196, 180, 1, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(InstructionKind::identify(&donate), Some(InstructionKind::Donate));
        assert_eq!(
            InstructionKind::from_name("restart_presale"),
            Some(InstructionKind::RestartPresale)
        );
    }

    #[test]
    fn test_verify() {
        let tag = AccountKind::Marketplace.discriminator();
        assert!(tag.verify("Marketplace", &[70, 222, 41, 62, 78, 3, 32, 174, 0]).is_ok());
        assert!(matches!(
            tag.verify("Marketplace", &[0u8; 8]),
            Err(DecodeError::DiscriminatorMismatch { .. })
        ));
        assert!(tag.verify("Marketplace", &[70, 222]).unwrap_err().is_truncation());
        assert_eq!(tag.to_string(), "46de293e4e0320ae");
    }
}
