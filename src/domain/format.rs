//! Display Formatting
//!
//! Human-readable renderings of prices, market caps, volumes and supplies,
//! used by the CLI views.

use super::numeric::CurrencyValue;

/// A signed percentage with its direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Percentage {
    pub text: String,
    pub is_positive: bool,
}

/// `$0.00` for zero/NaN, 8 decimals below one cent, 4 decimals otherwise
pub fn format_price(price: f64) -> String {
    if price == 0.0 || price.is_nan() {
        return "$0.00".to_string();
    }
    if price < 0.01 {
        return format!("${:.8}", price);
    }
    format!("${:.4}", price)
}

/// Market cap with K/M/B units; accepts numbers or currency strings
pub fn format_market_cap(market_cap: &CurrencyValue) -> String {
    format_usd_compact(market_cap)
}

/// 24h volume with K/M/B units; accepts numbers or currency strings
pub fn format_volume(volume: &CurrencyValue) -> String {
    format_usd_compact(volume)
}

/// Token supply with K/M/B units, no currency sign
pub fn format_supply(supply: f64) -> String {
    if supply == 0.0 || supply.is_nan() {
        return "0".to_string();
    }
    with_units(supply)
}

/// Sign-prefixed percent change, `0.00%` for zero/NaN
pub fn format_price_change(change: f64) -> String {
    if change == 0.0 || change.is_nan() {
        return "0.00%".to_string();
    }
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, change)
}

/// en-US digit grouping with at most three fraction digits
pub fn format_number_with_commas(num: f64) -> String {
    if num.is_nan() {
        return "NaN".to_string();
    }
    if num.is_infinite() {
        return if num > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let rounded = format!("{:.3}", num.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = num < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// Sign-prefixed percentage with direction flag
pub fn format_percentage(value: f64) -> Percentage {
    let is_positive = value >= 0.0;
    let sign = if is_positive { "+" } else { "" };
    Percentage {
        text: format!("{}{:.2}%", sign, value),
        is_positive,
    }
}

fn format_usd_compact(value: &CurrencyValue) -> String {
    if value.is_blank() {
        return "$0.00".to_string();
    }
    match value.to_f64() {
        Some(v) => format!("${}", with_units(v)),
        None => "$0.00".to_string(),
    }
}

fn with_units(value: f64) -> String {
    if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(f64::NAN), "$0.00");
        assert_eq!(format_price(0.00001234), "$0.00001234");
        assert_eq!(format_price(150.0), "$150.0000");
    }

    #[test]
    fn test_format_market_cap_units() {
        assert_eq!(format_market_cap(&1_500_000_000.0.into()), "$1.50B");
        assert_eq!(format_market_cap(&2_340_000.0.into()), "$2.34M");
        assert_eq!(format_market_cap(&"$1,234.56".into()), "$1.23K");
        assert_eq!(format_market_cap(&12.5.into()), "$12.50");
    }

    #[test]
    fn test_format_market_cap_fallbacks() {
        assert_eq!(format_market_cap(&"not-a-number".into()), "$0.00");
        assert_eq!(format_market_cap(&"".into()), "$0.00");
        assert_eq!(format_volume(&0.0.into()), "$0.00");
    }

    #[test]
    fn test_format_supply() {
        assert_eq!(format_supply(0.0), "0");
        assert_eq!(format_supply(999.0), "999.00");
        assert_eq!(format_supply(555_000_000_000.0), "555.00B");
    }

    #[test]
    fn test_format_price_change() {
        assert_eq!(format_price_change(5.234), "+5.23%");
        assert_eq!(format_price_change(-1.5), "-1.50%");
        assert_eq!(format_price_change(0.0), "0.00%");
    }

    #[test]
    fn test_format_number_with_commas() {
        assert_eq!(format_number_with_commas(1234567.0), "1,234,567");
        assert_eq!(format_number_with_commas(1234.5678), "1,234.568");
        assert_eq!(format_number_with_commas(-9876.5), "-9,876.5");
        assert_eq!(format_number_with_commas(12.0), "12");
        assert_eq!(format_number_with_commas(0.0), "0");
    }

    #[test]
    fn test_format_percentage() {
        let up = format_percentage(2.0);
        assert_eq!(up.text, "+2.00%");
        assert!(up.is_positive);

        let down = format_percentage(-0.456);
        assert_eq!(down.text, "-0.46%");
        assert!(!down.is_positive);
    }
}
