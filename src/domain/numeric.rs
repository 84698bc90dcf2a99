//! Numeric parsing for upstream money fields
//!
//! The market aggregator reports some values as plain numbers and others as
//! display strings such as `"$1,234.56"`. Both are normalised here; anything
//! that does not parse is treated as missing.

use serde::{Deserialize, Serialize};

/// A money-like value that may arrive as a number or a currency-formatted string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurrencyValue {
    Number(f64),
    Text(String),
}

impl CurrencyValue {
    /// Numeric value, or `None` when the text form does not parse
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            CurrencyValue::Number(n) if n.is_finite() => Some(*n),
            CurrencyValue::Number(_) => None,
            CurrencyValue::Text(s) => parse_currency(s),
        }
    }

    /// True for empty strings and zero, mirroring how the feeds signal "no value"
    pub fn is_blank(&self) -> bool {
        match self {
            CurrencyValue::Number(n) => *n == 0.0 || n.is_nan(),
            CurrencyValue::Text(s) => s.trim().is_empty(),
        }
    }
}

impl From<f64> for CurrencyValue {
    fn from(value: f64) -> Self {
        CurrencyValue::Number(value)
    }
}

impl From<&str> for CurrencyValue {
    fn from(value: &str) -> Self {
        CurrencyValue::Text(value.to_string())
    }
}

/// Parse a currency string, stripping `$` and `,` separators
///
/// Returns `None` for empty, unparsable or non-finite input.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Treat zero and NaN as "no value"
pub fn non_zero(value: f64) -> Option<f64> {
    if value == 0.0 || !value.is_finite() {
        None
    } else {
        Some(value)
    }
}
