// Utilities for amounts sent to providers

use rust_decimal::Decimal;

/// Strips trailing zero decimals, and the point itself when nothing is left
/// behind it: "10.0" becomes "10", "10.01" stays as is.
pub fn format_amount(value: &str) -> String {
    if !value.contains('.') {
        return value.to_string();
    }

    let trimmed = value.trim_end_matches('0');
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
}

pub fn format_decimal(amount: Decimal) -> String {
    format_amount(&amount.to_string())
}
