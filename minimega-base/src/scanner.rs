//! Bulk classification of program-owned accounts
//!
//! Each account is identified by its leading tag and decoded strictly as
//! that kind. A tag naming a kind the layout's program never creates is
//! treated as unrecognized. Accounts whose tag matches no known kind are
//! probed structurally against an ordered list of candidate kinds, and the
//! first decode whose validation passes wins. Anything else is recorded as a
//! skip; one bad account never aborts the scan.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::accounts::{
    AccountRecord, Collection, CollectionsMarketplace, ContributorTotal, DonationConfig, ItemType,
    Marketplace, PresaleConfig, PresaleContribution, PresaleMarketplace, aggregate_contributions,
};
use crate::discriminator::{AccountKind, Discriminator};
use crate::error::{DecodeError, DecodeResult};
use crate::programs::ProgramLayout;
use crate::pubkey::Pubkey;

/// Raw account as returned by a bulk program query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramAccount {
    pub address: Pubkey,
    pub data: Vec<u8>,
}

impl ProgramAccount {
    pub fn new(address: Pubkey, data: Vec<u8>) -> Self {
        Self { address, data }
    }
}

/// A decoded account of any known kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "account", rename_all = "snake_case")]
pub enum DecodedAccount {
    Marketplace(Marketplace),
    Collection(Collection),
    ItemType(ItemType),
    PresaleContribution(PresaleContribution),
    PresaleConfig(PresaleConfig),
    DonationConfig(DonationConfig),
}

impl DecodedAccount {
    pub fn kind(&self) -> AccountKind {
        match self {
            DecodedAccount::Marketplace(_) => AccountKind::Marketplace,
            DecodedAccount::Collection(_) => AccountKind::Collection,
            DecodedAccount::ItemType(_) => AccountKind::ItemType,
            DecodedAccount::PresaleContribution(_) => AccountKind::PresaleContribution,
            DecodedAccount::PresaleConfig(_) => AccountKind::PresaleConfig,
            DecodedAccount::DonationConfig(_) => AccountKind::DonationConfig,
        }
    }

    /// Decode `data` as `kind`, checking the tag unless `untagged` is set
    pub fn decode(
        layout: ProgramLayout,
        kind: AccountKind,
        data: &[u8],
        untagged: bool,
    ) -> DecodeResult<Self> {
        fn record<T: AccountRecord>(data: &[u8], untagged: bool) -> DecodeResult<T> {
            if untagged {
                T::from_untagged(data)
            } else {
                T::from_bytes(data)
            }
        }

        Ok(match kind {
            AccountKind::Marketplace => DecodedAccount::Marketplace(match layout {
                ProgramLayout::Collections => {
                    Marketplace::Collections(record::<CollectionsMarketplace>(data, untagged)?)
                }
                ProgramLayout::Presale => {
                    Marketplace::Presale(record::<PresaleMarketplace>(data, untagged)?)
                }
            }),
            AccountKind::Collection => DecodedAccount::Collection(record(data, untagged)?),
            AccountKind::ItemType => DecodedAccount::ItemType(record(data, untagged)?),
            AccountKind::PresaleContribution => {
                DecodedAccount::PresaleContribution(record(data, untagged)?)
            }
            AccountKind::PresaleConfig => DecodedAccount::PresaleConfig(record(data, untagged)?),
            AccountKind::DonationConfig => DecodedAccount::DonationConfig(record(data, untagged)?),
        })
    }
}

/// How an account was recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recognition {
    /// Leading tag matched a known kind
    Tagged,
    /// Tag unknown, structure matched a candidate kind
    Heuristic,
}

/// Why an account was left out of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    TooShort { len: usize, min: usize },
    /// Tag matched but the body failed to decode or validate
    Invalid { kind: AccountKind, error: String },
    /// No tag of this layout matched and no candidate decoded
    Unrecognized { tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub address: Pubkey,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// A decoded record together with its address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyed<T> {
    pub address: Pubkey,
    #[serde(flatten)]
    pub account: T,
}

/// Scan output partitioned by kind
///
/// Every bucket keeps the order accounts were given in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub marketplaces: Vec<Keyed<Marketplace>>,
    pub collections: Vec<Keyed<Collection>>,
    pub item_types: Vec<Keyed<ItemType>>,
    pub contributions: Vec<Keyed<PresaleContribution>>,
    pub presale_configs: Vec<Keyed<PresaleConfig>>,
    pub donation_configs: Vec<Keyed<DonationConfig>>,
    pub skipped: Vec<Skipped>,
    /// Accounts accepted through the structural fallback
    pub heuristic_matches: usize,
}

impl ScanReport {
    fn insert(&mut self, address: Pubkey, account: DecodedAccount) {
        match account {
            DecodedAccount::Marketplace(account) => {
                self.marketplaces.push(Keyed { address, account })
            }
            DecodedAccount::Collection(account) => self.collections.push(Keyed { address, account }),
            DecodedAccount::ItemType(account) => self.item_types.push(Keyed { address, account }),
            DecodedAccount::PresaleContribution(account) => {
                self.contributions.push(Keyed { address, account })
            }
            DecodedAccount::PresaleConfig(account) => {
                self.presale_configs.push(Keyed { address, account })
            }
            DecodedAccount::DonationConfig(account) => {
                self.donation_configs.push(Keyed { address, account })
            }
        }
    }

    pub fn classified_count(&self) -> usize {
        self.marketplaces.len()
            + self.collections.len()
            + self.item_types.len()
            + self.contributions.len()
            + self.presale_configs.len()
            + self.donation_configs.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// The marketplace singleton, if one was found
    pub fn marketplace(&self) -> Option<&Keyed<Marketplace>> {
        self.marketplaces.first()
    }

    pub fn presale_config(&self) -> Option<&Keyed<PresaleConfig>> {
        self.presale_configs.first()
    }

    pub fn donation_config(&self) -> Option<&Keyed<DonationConfig>> {
        self.donation_configs.first()
    }

    /// Item types grouped under their owning collection address
    ///
    /// Groups appear in order of first reference. Item types whose collection
    /// was not itself in the scan are still grouped.
    pub fn item_types_by_collection(&self) -> Vec<(Pubkey, Vec<&Keyed<ItemType>>)> {
        let mut groups: Vec<(Pubkey, Vec<&Keyed<ItemType>>)> = Vec::new();
        for item in &self.item_types {
            match groups.iter_mut().find(|(key, _)| *key == item.account.collection) {
                Some((_, members)) => members.push(item),
                None => groups.push((item.account.collection, vec![item])),
            }
        }
        groups
    }

    /// Item types belonging to one collection
    pub fn item_types_for<'a>(
        &'a self,
        collection: &'a Pubkey,
    ) -> impl Iterator<Item = &'a Keyed<ItemType>> + 'a {
        self.item_types
            .iter()
            .filter(move |item| item.account.collection == *collection)
    }

    /// Contribution totals per contributor
    pub fn contributor_totals(&self) -> DecodeResult<Vec<ContributorTotal>> {
        aggregate_contributions(
            self.contributions
                .iter()
                .map(|c| (c.account.contributor, c.account.amount)),
        )
    }
}

/// Classifies raw accounts for one program layout
#[derive(Debug, Clone)]
pub struct AccountScanner {
    layout: ProgramLayout,
    /// Candidate kinds tried, in order, when no tag matches
    heuristics: Vec<AccountKind>,
}

impl AccountScanner {
    /// Scanner with the default fallback order for `layout`
    ///
    /// Only kinds with content validation are probed structurally. Records
    /// made purely of keys and integers would accept almost any buffer of
    /// the right length.
    pub fn new(layout: ProgramLayout) -> Self {
        let heuristics = match layout {
            ProgramLayout::Collections => vec![AccountKind::Collection, AccountKind::ItemType],
            ProgramLayout::Presale => Vec::new(),
        };
        Self { layout, heuristics }
    }

    /// Replace the structural fallback order
    pub fn with_heuristics(mut self, heuristics: Vec<AccountKind>) -> Self {
        self.heuristics = heuristics;
        self
    }

    pub fn layout(&self) -> ProgramLayout {
        self.layout
    }

    /// Candidate kinds tried when no tag matches
    pub fn heuristics(&self) -> &[AccountKind] {
        &self.heuristics
    }

    /// Smallest buffer any kind owned by this layout could occupy
    pub fn min_account_len(&self) -> usize {
        self.layout
            .account_kinds()
            .iter()
            .map(|kind| min_len(self.layout, *kind))
            .min()
            .unwrap_or(0)
    }

    /// Identify and decode a single buffer
    pub fn classify(&self, data: &[u8]) -> Result<(DecodedAccount, Recognition), SkipReason> {
        let min = self.min_account_len();
        if data.len() < min {
            return Err(SkipReason::TooShort {
                len: data.len(),
                min,
            });
        }

        if let Some(kind) = AccountKind::identify(data) {
            if !self.layout.owns(kind) {
                debug!(kind = kind.name(), layout = %self.layout, "tag belongs to another layout");
                return Err(unrecognized(data));
            }
            return DecodedAccount::decode(self.layout, kind, data, false)
                .map(|account| (account, Recognition::Tagged))
                .map_err(|error| SkipReason::Invalid {
                    kind,
                    error: error.to_string(),
                });
        }

        for kind in &self.heuristics {
            match DecodedAccount::decode(self.layout, *kind, data, true) {
                Ok(account) => return Ok((account, Recognition::Heuristic)),
                Err(error) => debug!(kind = kind.name(), %error, "structural probe rejected"),
            }
        }

        Err(unrecognized(data))
    }

    /// Partition `accounts` into typed buckets
    pub fn scan<'a, I>(&self, accounts: I) -> ScanReport
    where
        I: IntoIterator<Item = &'a ProgramAccount>,
    {
        let mut report = ScanReport::default();
        for account in accounts {
            match self.classify(&account.data) {
                Ok((decoded, recognition)) => {
                    if recognition == Recognition::Heuristic {
                        report.heuristic_matches += 1;
                    }
                    report.insert(account.address, decoded);
                }
                Err(reason) => {
                    warn!(address = %account.address, ?reason, "skipping account");
                    report.skipped.push(Skipped {
                        address: account.address,
                        reason,
                    });
                }
            }
        }

        info!(
            layout = %self.layout,
            classified = report.classified_count(),
            skipped = report.skipped_count(),
            heuristic = report.heuristic_matches,
            "account scan complete"
        );
        report
    }
}

/// Decode a single account that is expected to be of `kind`
///
/// Unlike a scan, failure here is a hard error for the caller.
fn unrecognized(data: &[u8]) -> SkipReason {
    SkipReason::Unrecognized {
        tag: Discriminator::peek(data)
            .map(|tag| tag.to_string())
            .unwrap_or_default(),
    }
}

/// Smallest encoding of `kind` under `layout`
fn min_len(layout: ProgramLayout, kind: AccountKind) -> usize {
    match kind {
        AccountKind::Marketplace => match layout {
            ProgramLayout::Collections => CollectionsMarketplace::LEN,
            ProgramLayout::Presale => PresaleMarketplace::LEN,
        },
        AccountKind::Collection => Collection::MIN_LEN,
        AccountKind::ItemType => ItemType::MIN_LEN,
        AccountKind::PresaleContribution => PresaleContribution::LEN,
        AccountKind::PresaleConfig => PresaleConfig::LEN,
        AccountKind::DonationConfig => DonationConfig::LEN,
    }
}

pub fn decode_expected(
    layout: ProgramLayout,
    kind: AccountKind,
    data: &[u8],
) -> Result<DecodedAccount, DecodeError> {
    DecodedAccount::decode(layout, kind, data, false)
}
