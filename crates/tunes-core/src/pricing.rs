//! Price Handling
//!
//! Package prices arrive as display strings (`"₹1,999"`) and leave as gateway
//! minor units (paise). All arithmetic stays in `Decimal`.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CoreError, Result};

/// Currency markers stripped from the front of a price label
const CURRENCY_PREFIXES: [&str; 4] = ["₹", "INR", "Rs.", "Rs"];

/// Parse a display price such as `"₹1,999"` or `"999"` into a positive amount
pub fn parse_price(raw: &str) -> Result<Decimal> {
    let mut s = raw.trim();
    for prefix in CURRENCY_PREFIXES {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start();
            break;
        }
    }

    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    let price = Decimal::from_str(&cleaned).map_err(|_| CoreError::InvalidPrice)?;
    if price <= Decimal::ZERO {
        return Err(CoreError::InvalidPrice);
    }
    Ok(price.normalize())
}

/// Convert a major-unit price to gateway minor units: `round(price × 100)`
pub fn to_minor_units(price: Decimal) -> Result<i64> {
    let minor = price
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(CoreError::InvalidPrice)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(CoreError::InvalidPrice)?;

    if minor <= 0 {
        return Err(CoreError::InvalidPrice);
    }
    Ok(minor)
}

/// Convert gateway minor units back to a major-unit amount
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// Display symbol for an ISO currency code, if one is commonly used
fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_ascii_uppercase().as_str() {
        "INR" => Some("₹"),
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

/// Format an amount in the given currency: `₹1,999.00` for INR, `AED 1,999.00`
/// for codes without a symbol
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{grouped}.{fraction}"),
        None => format!("{sign}{} {grouped}.{fraction}", currency.to_ascii_uppercase()),
    }
}
