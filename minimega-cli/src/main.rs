//! Minimega CLI - Command-line interface for the Minimega marketplace programs
//!
//! Queries marketplace accounts over JSON-RPC and works with account and
//! instruction bytes offline.

use anyhow::Result;

use clap::Parser;
use serde_json::{Value, json};
use std::process;

mod cli;
mod commands;
mod config;
mod error;
mod output;

use cli::{Cli, Commands};
use config::Config;
use error::CliError;
use minimega_rpc_client::ClientError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = run(cli.command, cli.url, cli.layout, cli.json).await;

    if let Err(err) = result {
        if cli.json {
            output::print_output(format_error_json(&err), true);
        } else {
            eprintln!("Error: {}", err);
        }
        process::exit(1);
    }

    Ok(())
}

async fn run(
    command: Commands,
    url: Option<String>,
    layout: Option<minimega_base::ProgramLayout>,
    json: bool,
) -> Result<(), CliError> {
    let mut config = Config::load().await?;
    config.apply_overrides(url, layout)?;
    tracing::debug!(rpc_url = %config.rpc_url, layout = %config.layout, "configuration loaded");

    match command {
        Commands::Marketplace => commands::query::show_marketplace(&config, json).await,
        Commands::Collections { name } => {
            commands::query::list_collections(&config, name.as_deref(), json).await
        }
        Commands::Presale => commands::query::show_presale(&config, json).await,
        Commands::Donation => commands::query::show_donation(&config, json).await,
        Commands::Contributions => commands::query::show_contributions(&config, json).await,
        Commands::Metadata { mint } => commands::query::show_metadata(&config, &mint, json).await,
        Commands::Decode { kind, data, base64 } => {
            commands::codec::handle_decode(&config, kind, &data, base64, json)
        }
        Commands::Pda { subcommand } => commands::codec::handle_pda(&config, subcommand, json),
        Commands::Encode { subcommand } => commands::codec::handle_encode(subcommand, json),
        Commands::Convert { subcommand } => commands::convert::handle_convert(subcommand, json),
    }
}

fn format_error_json(err: &CliError) -> Value {
    let mut error_obj = json!({
        "type": err.kind(),
        "message": err.to_string(),
    });

    if let Some(obj) = error_obj.as_object_mut() {
        match err {
            CliError::Client(ClientError::TransactionRejected {
                signature: Some(signature),
                ..
            })
            | CliError::Client(ClientError::Timeout { signature, .. }) => {
                obj.insert("signature".to_string(), json!(signature));
            }
            CliError::Client(client_err) => {
                if let Some(code) = client_err.rpc_code() {
                    obj.insert("code".to_string(), json!(code));
                }
            }
            CliError::Io(io_error) => {
                obj.insert("kind".to_string(), json!(format!("{:?}", io_error.kind())));
            }
            _ => {}
        }
    }

    json!({ "error": error_obj })
}
