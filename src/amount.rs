//! Decimal token amounts <-> smallest on-chain units

use alloy_primitives::U256;

use crate::error::BountyError;

/// Parse a decimal string such as `"12.5"` into smallest units with `decimals` places.
pub fn parse_units(text: &str, decimals: u8) -> Result<U256, BountyError> {
    let text = text.trim();
    let invalid = |reason: &str| BountyError::InvalidAmount(format!("'{}' {}", text, reason));

    if text.is_empty() {
        return Err(invalid("is empty"));
    }

    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("has no digits"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid("is not a plain decimal number"));
    }
    if fraction.len() > decimals as usize {
        return Err(invalid(&format!(
            "has more than {} decimal places",
            decimals
        )));
    }

    // Right-pad the fraction so the concatenation is already in smallest units
    let digits = format!(
        "{}{}{}",
        whole,
        fraction,
        "0".repeat(decimals as usize - fraction.len())
    );
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(digits, 10).map_err(|_| invalid("is too large"))
}

/// Render smallest units back into a decimal string, trimming trailing zeros.
pub fn format_units(value: U256, decimals: u8) -> String {
    let raw = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return raw;
    }

    let padded = format!("{:0>width$}", raw, width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}
