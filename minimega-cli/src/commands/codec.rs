//! Offline commands: decode bytes, derive addresses, encode instructions

use base64::{Engine as _, engine::general_purpose};
use minimega_base::{
    AccountScanner, DecodedAccount, MarketplaceInstruction, Pubkey, TokenMetadata, pda,
};
use serde_json::{Value, json};

use crate::cli::{DecodeKind, EncodeCommands, PdaCommands};
use crate::commands::{parse_pubkey, to_json};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

/// Parse hex (optionally `0x`-prefixed) or base64 input
fn parse_data(data: &str, base64: bool) -> Result<Vec<u8>, CliError> {
    let trimmed = data.trim();
    if base64 {
        return general_purpose::STANDARD
            .decode(trimmed)
            .map_err(|e| CliError::Validation(format!("invalid base64 data: {}", e)));
    }
    let hex_digits: String = trimmed
        .strip_prefix("0x")
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    hex::decode(hex_digits).map_err(|e| CliError::Validation(format!("invalid hex data: {}", e)))
}

/// Decode `data` as `kind` under the configured layout
pub fn decode_value(config: &Config, kind: DecodeKind, data: &[u8]) -> Result<Value, CliError> {
    if let Some(account_kind) = kind.account_kind() {
        let decoded = DecodedAccount::decode(config.layout, account_kind, data, false)?;
        return to_json(&decoded);
    }

    match kind {
        DecodeKind::Auto => {
            let (decoded, recognition) = AccountScanner::new(config.layout)
                .classify(data)
                .map_err(|reason| {
                    let detail = serde_json::to_string(&reason).unwrap_or_default();
                    CliError::Validation(format!("unrecognized account: {}", detail))
                })?;
            let mut value = to_json(&decoded)?;
            if let Value::Object(map) = &mut value {
                map.insert("recognition".to_string(), to_json(&recognition)?);
            }
            Ok(value)
        }
        DecodeKind::Metadata => Ok(json!({
            "kind": "token_metadata",
            "account": to_json(&TokenMetadata::from_bytes(data)?)?,
        })),
        DecodeKind::Instruction => to_json(&MarketplaceInstruction::decode(data)?),
        _ => Err(CliError::Validation(format!(
            "unsupported decode kind {:?}",
            kind
        ))),
    }
}

/// Decode raw bytes and print the result
pub fn handle_decode(
    config: &Config,
    kind: DecodeKind,
    data: &str,
    base64: bool,
    json_format: bool,
) -> Result<(), CliError> {
    let bytes = parse_data(data, base64)?;
    tracing::debug!(len = bytes.len(), layout = %config.layout, "decoding input");
    let decoded = decode_value(config, kind, &bytes)?;
    output::print_output(json!({ "decoded": decoded }), json_format);
    Ok(())
}

/// Derive the requested address, returning its kind, address and bump
pub fn derive(
    config: &Config,
    subcommand: &PdaCommands,
) -> Result<(&'static str, Pubkey, Option<u8>), CliError> {
    let program_id = config.program_id()?;
    let (kind, (address, bump)) = match subcommand {
        PdaCommands::Marketplace => ("marketplace", pda::marketplace_address(&program_id)?),
        PdaCommands::Collection { name } => {
            ("collection", pda::collection_address(&program_id, name)?)
        }
        PdaCommands::ItemType { collection, name } => {
            let (collection, _) = pda::collection_address(&program_id, collection)?;
            (
                "item_type",
                pda::item_type_address(&program_id, &collection, name)?,
            )
        }
        PdaCommands::PresaleConfig => (
            "presale_config",
            pda::presale_config_address(&program_id)?,
        ),
        PdaCommands::DonationConfig => (
            "donation_config",
            pda::donation_config_address(&program_id)?,
        ),
        PdaCommands::Presale => ("presale", pda::presale_address(&program_id)?),
        PdaCommands::Metadata { mint } => (
            "metadata",
            pda::metadata_address(&parse_pubkey("mint", mint)?)?,
        ),
        PdaCommands::MasterEdition { mint } => (
            "master_edition",
            pda::master_edition_address(&parse_pubkey("mint", mint)?)?,
        ),
        PdaCommands::AssociatedToken { owner, mint } => {
            let address = pda::associated_token_address(
                &parse_pubkey("owner", owner)?,
                &parse_pubkey("mint", mint)?,
            )?;
            return Ok(("associated_token", address, None));
        }
    };
    Ok((kind, address, Some(bump)))
}

/// Derive an address and print it
pub fn handle_pda(
    config: &Config,
    subcommand: PdaCommands,
    json_format: bool,
) -> Result<(), CliError> {
    let (kind, address, bump) = derive(config, &subcommand)?;
    output::print_output(
        output::create_pda_response(kind, &address.to_base58(), bump),
        json_format,
    );
    Ok(())
}

impl From<EncodeCommands> for MarketplaceInstruction {
    fn from(command: EncodeCommands) -> Self {
        match command {
            EncodeCommands::InitializeMarketplace { fee_basis_points } => {
                MarketplaceInstruction::InitializeMarketplace { fee_basis_points }
            }
            EncodeCommands::CreateCollection {
                name,
                symbol,
                uri,
                royalty,
            } => MarketplaceInstruction::CreateCollection {
                name,
                symbol,
                uri,
                royalty,
            },
            EncodeCommands::CreateNftType {
                name,
                uri,
                price,
                max_supply,
            } => MarketplaceInstruction::CreateNftType {
                name,
                uri,
                price,
                max_supply,
            },
            EncodeCommands::MintNftFromCollection { item_type_name } => {
                MarketplaceInstruction::MintNftFromCollection { item_type_name }
            }
            EncodeCommands::InitializeDonation => MarketplaceInstruction::InitializeDonation,
            EncodeCommands::MintPresaleNft => MarketplaceInstruction::MintPresaleNft,
            EncodeCommands::Donate { amount } => MarketplaceInstruction::Donate { amount },
            EncodeCommands::RestartPresale => MarketplaceInstruction::RestartPresale,
        }
    }
}

/// Encode an instruction payload and print it as hex
pub fn handle_encode(subcommand: EncodeCommands, json_format: bool) -> Result<(), CliError> {
    let instruction = MarketplaceInstruction::from(subcommand);
    let data = instruction.encode()?;
    output::print_output(
        json!({
            "instruction": {
                "name": instruction.kind().name(),
                "discriminator": hex::encode(instruction.kind().discriminator().as_bytes()),
                "length": data.len(),
                "data": hex::encode(&data),
            }
        }),
        json_format,
    );
    Ok(())
}
