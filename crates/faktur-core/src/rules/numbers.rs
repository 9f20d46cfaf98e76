//! Indonesian number parsing and formatting.
//!
//! Exports mix grouping conventions: `Rp 18.767,50`, `18767,00`, `18767.5`
//! and plain integers all occur in the same column. Amounts go through
//! [`parse_amount`]; percentages use the simpler [`parse_percent`], which
//! does not share the separator disambiguation.

use std::str::FromStr;

/// Currency marker stripped from amounts.
pub const CURRENCY_MARKER: &str = "Rp";

/// Zero fraction suffix dropped from comma-only amounts.
pub const ZERO_FRACTION: &str = ",00";

/// Parse a locale-formatted amount (e.g. "Rp 18.767,50", "18767,00", "18767.5").
///
/// Returns `None` for empty input and anything that does not parse, so that an
/// unknown amount is never confused with zero.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned = s
        .trim()
        .replace(CURRENCY_MARKER, "")
        .replace(' ', "")
        .replace('%', "");

    let normalized = if cleaned.contains('.') && cleaned.contains(',') {
        // '.' groups thousands, ',' is the decimal point
        cleaned.replace('.', "").replace(',', ".")
    } else if cleaned.contains(',') {
        match cleaned.strip_suffix(ZERO_FRACTION) {
            Some(integer) => integer.to_string(),
            None => cleaned.replace(',', "."),
        }
    } else {
        cleaned
    };

    let normalized = normalized.trim();
    if normalized.is_empty() {
        return None;
    }

    f64::from_str(normalized).ok().filter(|v| v.is_finite())
}

/// Convert a parsed amount into a quantity: absent becomes 0, fractions are truncated.
pub fn to_quantity(amount: Option<f64>) -> i64 {
    match amount {
        Some(v) if v.is_finite() => v.trunc() as i64,
        _ => 0,
    }
}

/// Parse a quantity cell ("12", "1.000,00", "").
pub fn parse_quantity(s: &str) -> i64 {
    to_quantity(parse_amount(s))
}

/// Parse a percentage (e.g. "12,5%", "30").
///
/// Every '.' is dropped as a thousands separator before ',' becomes the
/// decimal point, so "12.5" reads as 125. Returns `None` when the remainder
/// is not a number; callers treat that as fatal.
pub fn parse_percent(s: &str) -> Option<f64> {
    let normalized = s.replace('%', "").replace('.', "").replace(',', ".");
    f64::from_str(normalized.trim()).ok()
}

/// Format an amount in rupiah display style (Rp 1.234.567), rounded to whole rupiah.
pub fn format_rupiah(amount: f64) -> String {
    let rounded = format!("{:.0}", amount);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) if rest.chars().any(|c| c != '0') => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", rounded.as_str()),
    };

    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("Rp {}{}", sign, formatted)
}
