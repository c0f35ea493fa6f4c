//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use rust_decimal::Decimal;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Format a kroner amount with Danish separators, e.g. `1.234,50 kr`.
///
/// Usage in templates: `{{ amount|kr }}`
#[askama::filter_fn]
pub fn kr(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let amount = value
        .to_string()
        .parse::<Decimal>()
        .unwrap_or(Decimal::ZERO);
    Ok(format_kroner(amount))
}

/// Danish number formatting: `.` groups thousands, `,` starts decimals.
pub fn format_kroner(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let raw = format!("{rounded:.2}");
    let (whole, decimals) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

    let (sign, digits) = whole
        .strip_prefix('-')
        .map_or(("", whole), |rest| ("-", rest));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{sign}{grouped},{decimals} kr")
}
