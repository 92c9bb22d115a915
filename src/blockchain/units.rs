// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Native-unit decimal rendering.
//!
//! Amounts are compared as canonical decimal strings: no leading zeros in
//! the integer part, no trailing zeros in the fraction, no exponent.

use alloy::primitives::U256;

/// Largest exponent accepted in a claimed amount such as `1e-2`.
const MAX_EXPONENT: i64 = 100;

/// Render a smallest-unit integer as a canonical native-unit decimal.
///
/// Unlike a display formatter this never truncates the fraction.
pub fn format_native(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / divisor;
    let remainder = value % divisor;

    if remainder.is_zero() {
        return whole.to_string();
    }

    let digits = remainder.to_string();
    let padded = format!(
        "{}{}",
        "0".repeat(usize::from(decimals).saturating_sub(digits.len())),
        digits
    );
    format!("{}.{}", whole, padded.trim_end_matches('0'))
}

/// Canonicalize a decimal string (optionally in exponent notation).
///
/// Returns `None` for anything that is not a non-negative decimal number.
pub fn canonical_decimal(input: &str) -> Option<String> {
    let input = input.trim();
    let (mantissa, exponent) = match input.find(['e', 'E']) {
        Some(idx) => {
            let exponent: i64 = input[idx + 1..].parse().ok()?;
            (&input[..idx], exponent)
        }
        None => (input, 0),
    };
    if exponent.abs() > MAX_EXPONENT {
        return None;
    }

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    let digits = format!("{int_part}{frac_part}");
    let point = int_part.len() as i64 + exponent;

    let (whole, fraction) = if point <= 0 {
        (
            String::from("0"),
            format!("{}{}", "0".repeat(point.unsigned_abs() as usize), digits),
        )
    } else if point as usize >= digits.len() {
        (
            format!("{}{}", digits, "0".repeat(point as usize - digits.len())),
            String::new(),
        )
    } else {
        let (w, f) = digits.split_at(point as usize);
        (w.to_string(), f.to_string())
    };

    let whole = whole.trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        Some(whole.to_string())
    } else {
        Some(format!("{whole}.{fraction}"))
    }
}
