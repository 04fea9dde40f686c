//! Display formatting for cards and chart labels.
//!
//! Formatting produces strings only; raw values stay on the entries untouched.

use crate::domain::Currency;

const NOT_AVAILABLE: &str = "n/a";

/// `$67,123.45`; negative amounts render as `-$12.00`.
pub fn format_price(value: f64, currency: Currency) -> String {
    with_symbol(value, currency, 2, "")
}

/// Volume in billions: `$28.51B`.
pub fn format_volume_billions(value: f64, currency: Currency) -> String {
    with_symbol(value / 1e9, currency, 2, "B")
}

/// Whole-unit volume with separators: `$28,512,339,871`.
pub fn format_volume_full(value: f64, currency: Currency) -> String {
    with_symbol(value, currency, 0, "")
}

/// Signed 24h change: `+1.83%`, `-0.91%`, or `n/a` when the provider sent none.
pub fn format_change_pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:+.2}%"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Share of total as a percentage: `0.4213` → `42.1%`.
pub fn format_share(fraction: f64) -> String {
    if fraction.is_finite() {
        format!("{:.1}%", fraction * 100.0)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// Insert `,` every three digits of an unsigned integer string.
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn with_symbol(value: f64, currency: Currency, decimals: usize, suffix: &str) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let grouped = group_thousands(int_part);
    match frac_part {
        Some(frac) => format!("{sign}{}{grouped}.{frac}{suffix}", currency.symbol()),
        None => format!("{sign}{}{grouped}{suffix}", currency.symbol()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn prices() {
        assert_eq!(format_price(67123.45, Currency::Usd), "$67,123.45");
        assert_eq!(format_price(0.5, Currency::Eur), "€0.50");
        assert_eq!(format_price(1234.5, Currency::Try), "₺1,234.50");
        assert_eq!(format_price(1000.0, Currency::Toman), "IRT 1,000.00");
        assert_eq!(format_price(-12.0, Currency::Usd), "-$12.00");
        assert_eq!(format_price(999.999, Currency::Usd), "$1,000.00");
    }

    #[test]
    fn volumes() {
        assert_eq!(format_volume_billions(28_512_339_871.0, Currency::Usd), "$28.51B");
        assert_eq!(format_volume_billions(345_678_901.0, Currency::Usd), "$0.35B");
        assert_eq!(format_volume_full(28_512_339_871.4, Currency::Usd), "$28,512,339,871");
    }

    #[test]
    fn change_and_share() {
        assert_eq!(format_change_pct(Some(1.83412)), "+1.83%");
        assert_eq!(format_change_pct(Some(-0.91234)), "-0.91%");
        assert_eq!(format_change_pct(None), "n/a");
        assert_eq!(format_share(0.4213), "42.1%");
        assert_eq!(format_share(f64::NAN), "n/a");
    }

    #[test]
    fn non_finite_amounts() {
        assert_eq!(format_price(f64::INFINITY, Currency::Usd), "n/a");
    }
}
