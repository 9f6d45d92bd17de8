//! US-dollar and percentage formatting for the tax summary.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;

/// Formats an amount as US dollars with thousands separators and exactly
/// two decimal places.
///
/// Rounding is half-up, away from zero. A value that rounds to zero is
/// rendered without a sign.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use optimizer_core::calculations::format_currency;
///
/// assert_eq!(format_currency(dec!(25000)), "$25,000.00");
/// assert_eq!(format_currency(dec!(0)), "$0.00");
/// assert_eq!(format_currency(dec!(-1234.5)), "-$1,234.50");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Float entry point for [`format_currency`]. Returns `None` for NaN,
/// infinities and magnitudes a [`Decimal`] cannot hold.
pub fn format_currency_f64(amount: f64) -> Option<String> {
    if !amount.is_finite() {
        return None;
    }
    Decimal::try_from(amount).ok().map(format_currency)
}

/// Renders a fraction as a percentage with two decimals (`0.25` → `"25.00%"`).
pub fn format_percent(fraction: Decimal) -> String {
    format!("{:.2}%", round_half_up(fraction * Decimal::ONE_HUNDRED))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}
