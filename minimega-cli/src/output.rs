//! Output formatting utilities for the Minimega CLI

use colored::*;
use minimega_base::format_sol;
use serde_json::{Map, Value, json};

/// Fields holding lamport amounts, shown with their SOL value in text mode
const LAMPORT_FIELDS: &[&str] = &["price", "amount", "total", "total_collected", "lamports"];

/// Format and print output based on the JSON flag
pub fn print_output(data: Value, json_format: bool) {
    if json_format {
        println!(
            "{}",
            serde_json::to_string_pretty(&data).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        print_human_readable(&data);
    }
}

/// Print data in human-readable format
fn print_human_readable(data: &Value) {
    match data {
        Value::Object(map) => {
            for (key, value) in map {
                match key.as_str() {
                    "marketplace" => print_record("Marketplace", value),
                    "presale" => print_optional_record("Presale Config", value),
                    "donation" => print_optional_record("Donation Config", value),
                    "metadata" => print_record("Token Metadata", value),
                    "decoded" => print_record("Decoded", value),
                    "pda" => print_record("Program Address", value),
                    "instruction" => print_record("Instruction", value),
                    "conversion" => print_record("Conversion", value),
                    "collections" => print_collections(value),
                    "contributions" => print_contributions(value),
                    _ => println!("{}: {}", key.cyan(), format_value(value)),
                }
            }
        }
        _ => println!("{}", format_value(data)),
    }
}

/// Format large numbers in a compact way, with underscores as thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::new();
    let chars = s.chars().rev().collect::<Vec<_>>();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(*c);
    }
    out.chars().rev().collect()
}

/// Lamports with their exact SOL value
fn format_lamports(lamports: u64) -> String {
    format!("{} ({} SOL)", format_number(lamports), format_sol(lamports))
}

/// Format a JSON value for human-readable output
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "none".to_string(),
        Value::Array(arr) => format!(
            "[{}]",
            arr.iter().map(format_value).collect::<Vec<_>>().join(", ")
        ),
        Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Format one named field, rendering lamport amounts in SOL as well
fn format_field(key: &str, value: &Value) -> String {
    match value.as_u64() {
        Some(lamports) if LAMPORT_FIELDS.contains(&key) => format_lamports(lamports),
        _ => format_value(value),
    }
}

/// Turn `snake_case` into `Snake Case`
fn label(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn print_fields(map: &Map<String, Value>, indent: usize) {
    let pad = " ".repeat(indent);
    for (key, value) in map {
        match value {
            Value::Object(inner) => {
                println!("{}{}:", pad, label(key).cyan());
                print_fields(inner, indent + 2);
            }
            Value::Array(items) if items.iter().any(Value::is_object) => {
                println!("{}{}:", pad, label(key).cyan());
                for (idx, item) in items.iter().enumerate() {
                    match item {
                        Value::Object(inner) => {
                            println!("{}  {:>2}.", pad, idx + 1);
                            print_fields(inner, indent + 6);
                        }
                        other => println!("{}  {:>2}. {}", pad, idx + 1, format_value(other)),
                    }
                }
            }
            _ => println!("{}{}: {}", pad, label(key).cyan(), format_field(key, value)),
        }
    }
}

fn print_record(title: &str, data: &Value) {
    println!("{}", title.bold().green());
    match data {
        Value::Object(map) => print_fields(map, 2),
        other => println!("  {}", format_value(other)),
    }
}

fn print_optional_record(title: &str, data: &Value) {
    if data.is_null() {
        println!("{}", format!("{} not initialized", title).yellow());
    } else {
        print_record(title, data);
    }
}

/// Print collections with their item types nested underneath
fn print_collections(data: &Value) {
    let collections = match data.as_array() {
        Some(collections) => collections,
        None => return,
    };
    println!("{}", "Collections".bold().green());
    if collections.is_empty() {
        println!("  {}", "No collections found.".italic());
        return;
    }

    for collection in collections {
        let name = collection.get("name").map(format_value).unwrap_or_default();
        let symbol = collection.get("symbol").map(format_value).unwrap_or_default();
        let active = collection
            .get("is_active")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        println!(
            "  {} ({}) {}",
            name.bold(),
            symbol,
            if active { "active".green() } else { "inactive".red() }
        );
        if let Some(address) = collection.get("address") {
            println!("    {}: {}", "Address".cyan(), format_value(address));
        }
        if let Some(royalty) = collection.get("royalty").and_then(Value::as_u64) {
            println!("    {}: {} bps", "Royalty".cyan(), royalty);
        }

        let item_types = collection
            .get("item_types")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for item in item_types {
            let item_name = item.get("name").map(format_value).unwrap_or_default();
            let price = item.get("price").and_then(Value::as_u64).unwrap_or(0);
            let current = item.get("current_supply").and_then(Value::as_u64).unwrap_or(0);
            let supply = match item.get("max_supply").and_then(Value::as_u64) {
                Some(0) | None => format!("{} minted, unlimited", current),
                Some(max) => format!("{}/{} minted", current, max),
            };
            println!(
                "    - {}: {} SOL, {}",
                item_name,
                format_sol(price),
                supply
            );
        }
    }
}

/// Print contributor totals as a table
fn print_contributions(data: &Value) {
    let totals = match data.as_array() {
        Some(totals) => totals,
        None => return,
    };
    println!("{}", "Presale Contributions".bold().green());
    if totals.is_empty() {
        println!("  {}", "No contributions found.".italic());
        return;
    }

    let mut sum: u64 = 0;
    for (idx, total) in totals.iter().enumerate() {
        let contributor = total.get("contributor").map(format_value).unwrap_or_default();
        let lamports = total.get("total").and_then(Value::as_u64).unwrap_or(0);
        let count = total.get("contributions").and_then(Value::as_u64).unwrap_or(0);
        sum = sum.saturating_add(lamports);
        println!(
            "  {:>3}. {} {} SOL ({} contributions)",
            idx + 1,
            contributor,
            format_sol(lamports),
            count
        );
    }
    println!("  {}: {} SOL", "Total".cyan(), format_sol(sum));
}

/// Print warning message
pub fn print_warning(warning: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), warning);
}

/// Build an SOL/lamports conversion response
pub fn create_conversion_response(lamports: u64) -> Value {
    json!({
        "conversion": {
            "lamports": lamports,
            "sol": format_sol(lamports),
        }
    })
}

/// Build a derived address response
pub fn create_pda_response(kind: &str, address: &str, bump: Option<u8>) -> Value {
    json!({
        "pda": {
            "kind": kind,
            "address": address,
            "bump": bump,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1_000");
        assert_eq!(format_number(1_500_000_000), "1_500_000_000");
    }

    #[test]
    fn test_lamport_fields_show_sol() {
        assert_eq!(format_field("price", &json!(1_500_000_000u64)), "1_500_000_000 (1.5 SOL)");
        assert_eq!(format_field("bump", &json!(254)), "254");
        assert_eq!(format_field("max_supply", &json!(100)), "100");
    }

    #[test]
    fn test_label() {
        assert_eq!(label("fee_basis_points"), "Fee Basis Points");
        assert_eq!(label("admin"), "Admin");
    }

    #[test]
    fn test_conversion_response() {
        let value = create_conversion_response(250_000_000);
        assert_eq!(value["conversion"]["lamports"], 250_000_000);
        assert_eq!(value["conversion"]["sol"], "0.25");
    }

    #[test]
    fn test_pda_response_without_bump() {
        let value = create_pda_response("associated_token", "addr", None);
        assert!(value["pda"]["bump"].is_null());
    }
}
