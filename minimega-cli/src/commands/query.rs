//! Read-only commands that query marketplace accounts over RPC

use minimega_base::pda;
use minimega_base::scanner::Keyed;
use minimega_base::ScanReport;
use minimega_rpc_client::{ClientError, HttpClient, MarketplaceClient};
use serde_json::{Value, json};

use crate::commands::{parse_pubkey, to_json};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

fn marketplace_client(config: &Config) -> Result<MarketplaceClient<HttpClient>, CliError> {
    let client = config.client()?;
    Ok(client.marketplace_at(config.layout, config.program_id()?))
}

/// Mention undecodable accounts without failing the command
fn report_skipped(report: &ScanReport, json_format: bool) {
    let skipped = report.skipped_count();
    if skipped > 0 && !json_format {
        output::print_warning(&format!(
            "{} program account(s) could not be decoded and were skipped (RUST_LOG=warn for details)",
            skipped
        ));
    }
}

/// Show the marketplace singleton
pub async fn show_marketplace(config: &Config, json_format: bool) -> Result<(), CliError> {
    let marketplace = marketplace_client(config)?.fetch_marketplace().await?;
    output::print_output(json!({ "marketplace": to_json(&marketplace)? }), json_format);
    Ok(())
}

/// List collections with their item types nested underneath
pub async fn list_collections(
    config: &Config,
    name: Option<&str>,
    json_format: bool,
) -> Result<(), CliError> {
    let report = marketplace_client(config)?.scan().await?;
    report_skipped(&report, json_format);

    let mut collections = Vec::new();
    for collection in &report.collections {
        if name.is_some_and(|name| name != collection.account.name) {
            continue;
        }
        let items: Vec<_> = report.item_types_for(&collection.address).collect();
        let mut value = to_json(collection)?;
        if let Value::Object(map) = &mut value {
            map.insert("item_types".to_string(), to_json(&items)?);
        }
        collections.push(value);
    }

    if let (Some(name), true) = (name, collections.is_empty()) {
        return Err(CliError::Validation(format!(
            "no collection named '{}' found",
            name
        )));
    }

    output::print_output(json!({ "collections": collections }), json_format);
    Ok(())
}

/// Show the presale config, or `null` when it was never initialized
pub async fn show_presale(config: &Config, json_format: bool) -> Result<(), CliError> {
    let marketplace = marketplace_client(config)?;
    let (address, _) = pda::presale_config_address(marketplace.program_id())?;
    let presale = marketplace
        .fetch_presale_config()
        .await?
        .map(|account| Keyed { address, account });
    output::print_output(json!({ "presale": to_json(&presale)? }), json_format);
    Ok(())
}

/// Show the donation config, or `null` when it was never initialized
pub async fn show_donation(config: &Config, json_format: bool) -> Result<(), CliError> {
    let marketplace = marketplace_client(config)?;
    let (address, _) = pda::donation_config_address(marketplace.program_id())?;
    let donation = marketplace
        .fetch_donation_config()
        .await?
        .map(|account| Keyed { address, account });
    output::print_output(json!({ "donation": to_json(&donation)? }), json_format);
    Ok(())
}

/// Show contribution totals per contributor
pub async fn show_contributions(config: &Config, json_format: bool) -> Result<(), CliError> {
    let totals = marketplace_client(config)?.fetch_contributions().await?;
    output::print_output(json!({ "contributions": to_json(&totals)? }), json_format);
    Ok(())
}

/// Show token metadata for `mint`
pub async fn show_metadata(config: &Config, mint: &str, json_format: bool) -> Result<(), CliError> {
    let mint = parse_pubkey("mint", mint)?;
    let metadata = marketplace_client(config)?
        .fetch_metadata(&mint)
        .await?
        .ok_or_else(|| ClientError::AccountNotFound(format!("metadata for mint {}", mint)))?;
    output::print_output(json!({ "metadata": to_json(&metadata)? }), json_format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_follows_layout_program() {
        let mut config = Config::default();
        config.layout = minimega_base::ProgramLayout::Presale;
        let client = marketplace_client(&config).unwrap();
        assert_eq!(
            *client.program_id(),
            minimega_base::programs::PRESALE_PROGRAM_ID
        );
    }
}
