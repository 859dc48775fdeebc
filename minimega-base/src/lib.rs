pub mod accounts;
pub mod builder;
pub mod codec;
pub mod discriminator;
pub mod error;
pub mod instructions;
pub mod pda;
pub mod programs;
pub mod pubkey;
pub mod scanner;
pub mod units;


// re-export types
pub use accounts::{
    AccountRecord, Collection, ContributorTotal, DonationConfig, ItemType, Marketplace,
    PresaleConfig, PresaleContribution, TokenMetadata,
};
pub use builder::InstructionBuilder;
pub use discriminator::{AccountKind, Discriminator, InstructionKind};
pub use error::{DecodeError, EncodeError};
pub use instructions::{AccountMeta, Instruction, MarketplaceInstruction};
pub use programs::ProgramLayout;
pub use pubkey::{Pubkey, Signature, ValidationError};
pub use scanner::{AccountScanner, DecodedAccount, ProgramAccount, ScanReport};

// re-export unit helpers
pub use units::{LAMPORTS_PER_SOL, format_sol, lamports_to_sol, parse_sol, sol_to_lamports};

/// Checks that every byte is printable ASCII (0x20..=0x7E).
pub fn is_printable_ascii(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| (0x20..=0x7E).contains(&b))
}
