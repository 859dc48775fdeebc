//! Conversions between human-facing amounts and on-chain integer units
//!
//! On-chain amounts are always `u64` lamports. Conversions into lamports
//! floor any fraction below one lamport.

use crate::error::{EncodeError, EncodeResult};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
const SOL_DECIMALS: usize = 9;

pub const MAX_BASIS_POINTS: u16 = 10_000;

/// Convert a floating SOL amount to lamports, flooring sub-lamport fractions
pub fn sol_to_lamports(sol: f64) -> EncodeResult<u64> {
    if !sol.is_finite() || sol < 0.0 {
        return Err(EncodeError::InvalidAmount(sol.to_string()));
    }
    let lamports = (sol * LAMPORTS_PER_SOL as f64).floor();
    // u64::MAX is not representable; 2^64 is the first value past it
    if lamports >= 18_446_744_073_709_551_616.0 {
        return Err(EncodeError::InvalidAmount(sol.to_string()));
    }
    Ok(lamports as u64)
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Parse a decimal SOL string exactly, without going through floating point
///
/// Digits past the ninth decimal place are dropped, matching the floor used
/// by [`sol_to_lamports`].
pub fn parse_sol(input: &str) -> EncodeResult<u64> {
    let invalid = || EncodeError::InvalidAmount(input.to_string());
    let trimmed = input.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let mut fraction_digits: String = fraction.chars().take(SOL_DECIMALS).collect();
    while fraction_digits.len() < SOL_DECIMALS {
        fraction_digits.push('0');
    }
    let fraction: u64 = fraction_digits.parse().map_err(|_| invalid())?;

    whole
        .checked_mul(LAMPORTS_PER_SOL)
        .and_then(|lamports| lamports.checked_add(fraction))
        .ok_or_else(invalid)
}

/// Render lamports as an exact decimal SOL string
pub fn format_sol(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let fraction = lamports % LAMPORTS_PER_SOL;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:09}", fraction);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// 500 basis points is 5.00%
pub fn basis_points_to_percent(bps: u16) -> f64 {
    bps as f64 / 100.0
}

pub fn check_basis_points(field: &'static str, value: u16) -> EncodeResult<u16> {
    if value > MAX_BASIS_POINTS {
        return Err(EncodeError::FeeOutOfRange { field, value });
    }
    Ok(value)
}
