//! CLI argument parsing and command definitions

use clap::{Parser, Subcommand, ValueEnum};
use minimega_base::{AccountKind, ProgramLayout, parse_sol};

/// Parse a SOL amount such as `1.5` into lamports
fn parse_lamports(s: &str) -> Result<u64, String> {
    parse_sol(s).map_err(|e| e.to_string())
}

/// Parse royalty or fee basis points (0-10000)
fn parse_basis_points(s: &str) -> Result<u16, String> {
    let value: u16 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value > 10_000 {
        return Err(format!("{} exceeds 10000 basis points", value));
    }
    Ok(value)
}

/// Minimega CLI - inspect and build transactions for the Minimega marketplace programs
#[derive(Parser)]
#[command(name = "minimega")]
#[command(about = "Command-line interface for the Minimega marketplace programs")]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Override RPC URL for this invocation
    #[arg(long = "url", global = true)]
    pub url: Option<String>,

    /// Account schema of the target program
    #[arg(long = "layout", global = true)]
    pub layout: Option<ProgramLayout>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the marketplace singleton
    Marketplace,

    /// List collections and their item types
    Collections {
        /// Only show the collection with this name
        #[arg(long)]
        name: Option<String>,
    },

    /// Show the presale configuration
    Presale,

    /// Show the donation configuration
    Donation,

    /// Show presale contribution totals per contributor
    Contributions,

    /// Show token metadata for an NFT mint
    Metadata {
        /// Mint address (base58)
        mint: String,
    },

    /// Decode raw account or instruction bytes
    Decode {
        /// What the bytes hold
        kind: DecodeKind,

        /// Data as hex (default) or base64
        data: String,

        /// Interpret data as base64 instead of hex
        #[arg(long)]
        base64: bool,
    },

    /// Derive a program address
    Pda {
        #[command(subcommand)]
        subcommand: PdaCommands,
    },

    /// Encode an instruction payload and print it as hex
    Encode {
        #[command(subcommand)]
        subcommand: EncodeCommands,
    },

    /// Convert between SOL and lamports
    Convert {
        #[command(subcommand)]
        subcommand: ConvertCommands,
    },
}

/// Byte formats understood by `decode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecodeKind {
    /// Identify the account by its tag
    Auto,
    Marketplace,
    Collection,
    ItemType,
    PresaleContribution,
    PresaleConfig,
    DonationConfig,
    /// Token metadata account
    Metadata,
    /// Instruction data
    Instruction,
}

impl DecodeKind {
    /// The program account kind, for kinds that are one
    pub fn account_kind(&self) -> Option<AccountKind> {
        match self {
            DecodeKind::Marketplace => Some(AccountKind::Marketplace),
            DecodeKind::Collection => Some(AccountKind::Collection),
            DecodeKind::ItemType => Some(AccountKind::ItemType),
            DecodeKind::PresaleContribution => Some(AccountKind::PresaleContribution),
            DecodeKind::PresaleConfig => Some(AccountKind::PresaleConfig),
            DecodeKind::DonationConfig => Some(AccountKind::DonationConfig),
            DecodeKind::Auto | DecodeKind::Metadata | DecodeKind::Instruction => None,
        }
    }
}

#[derive(Subcommand)]
pub enum PdaCommands {
    /// Marketplace singleton
    Marketplace,

    /// Collection by name
    Collection {
        /// Collection name
        name: String,
    },

    /// Item type by collection name and item name
    ItemType {
        /// Collection name
        collection: String,
        /// Item type name
        name: String,
    },

    /// Presale configuration
    PresaleConfig,

    /// Donation configuration
    DonationConfig,

    /// Presale account
    Presale,

    /// Token metadata account of a mint
    Metadata {
        /// Mint address (base58)
        mint: String,
    },

    /// Master edition account of a mint
    MasterEdition {
        /// Mint address (base58)
        mint: String,
    },

    /// Associated token account
    AssociatedToken {
        /// Wallet address (base58)
        owner: String,
        /// Mint address (base58)
        mint: String,
    },
}

#[derive(Subcommand)]
pub enum EncodeCommands {
    /// Create the marketplace singleton
    InitializeMarketplace {
        /// Marketplace fee in basis points
        #[arg(value_parser = parse_basis_points)]
        fee_basis_points: u16,
    },

    /// Create a collection
    CreateCollection {
        name: String,
        symbol: String,
        uri: String,
        /// Royalty in basis points
        #[arg(value_parser = parse_basis_points)]
        royalty: u16,
    },

    /// Create an item type within a collection
    CreateNftType {
        name: String,
        uri: String,
        /// Price in SOL
        #[arg(value_parser = parse_lamports)]
        price: u64,
        /// Maximum supply, 0 for unlimited
        max_supply: u64,
    },

    /// Mint an NFT of an item type
    MintNftFromCollection {
        /// Item type name
        item_type_name: String,
    },

    /// Create the donation config
    InitializeDonation,

    /// Mint a presale NFT
    MintPresaleNft,

    /// Donate to the presale
    Donate {
        /// Amount in SOL
        #[arg(value_parser = parse_lamports)]
        amount: u64,
    },

    /// Reset the presale counters
    RestartPresale,
}

#[derive(Subcommand)]
pub enum ConvertCommands {
    /// SOL amount to lamports
    SolToLamports {
        /// Amount in SOL, e.g. 0.25
        value: String,
    },

    /// Lamports to SOL
    LamportsToSol {
        /// Amount in lamports
        value: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "minimega",
            "marketplace",
            "--json",
            "--layout",
            "presale",
            "--url",
            "http://localhost:8899",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.layout, Some(ProgramLayout::Presale));
        assert_eq!(cli.url.as_deref(), Some("http://localhost:8899"));
    }

    #[test]
    fn test_unknown_layout_rejected() {
        assert!(Cli::try_parse_from(["minimega", "--layout", "auction", "marketplace"]).is_err());
    }

    #[test]
    fn test_price_parsed_as_sol() {
        let cli = Cli::try_parse_from([
            "minimega",
            "encode",
            "create-nft-type",
            "Sword",
            "https://x/sword.json",
            "1.5",
            "100",
        ])
        .unwrap();
        match cli.command {
            Commands::Encode {
                subcommand: EncodeCommands::CreateNftType { price, .. },
            } => assert_eq!(price, 1_500_000_000),
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_basis_points_bounds() {
        assert_eq!(parse_basis_points("10000"), Ok(10_000));
        assert!(parse_basis_points("10001").is_err());
        assert!(parse_basis_points("-1").is_err());
    }

    #[test]
    fn test_decode_kind_mapping() {
        assert_eq!(
            DecodeKind::ItemType.account_kind(),
            Some(AccountKind::ItemType)
        );
        assert_eq!(DecodeKind::Metadata.account_kind(), None);
    }
}
