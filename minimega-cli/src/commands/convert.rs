//! SOL and lamport conversions

use minimega_base::parse_sol;

use crate::cli::ConvertCommands;
use crate::error::CliError;
use crate::output;

/// Lamports for a conversion request
///
/// SOL input is parsed as an exact decimal; digits past nine decimal places
/// are dropped.
pub fn to_lamports(subcommand: &ConvertCommands) -> Result<u64, CliError> {
    match subcommand {
        ConvertCommands::SolToLamports { value } => Ok(parse_sol(value)?),
        ConvertCommands::LamportsToSol { value } => Ok(*value),
    }
}

pub fn handle_convert(subcommand: ConvertCommands, json_format: bool) -> Result<(), CliError> {
    let lamports = to_lamports(&subcommand)?;
    output::print_output(output::create_conversion_response(lamports), json_format);
    Ok(())
}
