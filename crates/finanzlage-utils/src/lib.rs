//! German locale number helpers
//!
//! Accounting exports write amounts as `1.234,56`: `.` groups thousands and
//! `,` separates the decimals. Parsing is lenient on purpose: a cell that
//! cannot be read as a number counts as zero instead of aborting the run.

use once_cell::sync::OnceCell;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Decimal separator used in German formatting
pub const DECIMAL_SEPARATOR: char = ',';

/// Thousands separator used in German formatting
pub const THOUSANDS_SEPARATOR: char = '.';

/// Currency suffix appended to formatted amounts
pub const CURRENCY_SUFFIX: &str = "€";

// ==================== Parsing ====================

/// Parse a German formatted number (`"1.234,56"` -> `1234.56`).
///
/// Quotes are stripped, every `.` is removed and the first `,` becomes the
/// decimal point. The longest numeric prefix is used, so `"12,5 EUR"` reads
/// as `12.5`. Blank or unparseable text yields zero.
pub fn parse_locale_number(text: &str) -> Decimal {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    let cleaned = trimmed
        .replace('"', "")
        .replace(THOUSANDS_SEPARATOR, "")
        .replacen(DECIMAL_SEPARATOR, ".", 1);

    leading_number(cleaned.trim()).unwrap_or(Decimal::ZERO)
}

/// Parse an optional cell, absent cells count as zero
pub fn parse_locale_opt(text: Option<&str>) -> Decimal {
    text.map(parse_locale_number).unwrap_or(Decimal::ZERO)
}

/// Read the numeric prefix of an already normalized string (`.` as decimal point)
fn leading_number(text: &str) -> Option<Decimal> {
    static NUMBER_PREFIX: OnceCell<Regex> = OnceCell::new();
    let number_regex = NUMBER_PREFIX.get_or_init(|| {
        Regex::new(r"^([+-]?)(\d*)(?:\.(\d*))?(?:[eE]([+-]?\d+))?").unwrap()
    });

    let caps = number_regex.captures(text)?;
    let sign = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    let int_part = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let frac_part = caps.get(3).map(|m| m.as_str()).unwrap_or("");

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mantissa = format!(
        "{}{}.{}",
        if sign == "-" { "-" } else { "" },
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part },
    );

    match caps.get(4) {
        Some(exponent) => Decimal::from_scientific(&format!("{}e{}", mantissa, exponent.as_str())).ok(),
        None => Decimal::from_str(&mantissa).ok(),
    }
}

/// Sum that clamps at `Decimal::MAX` / `Decimal::MIN` instead of overflowing.
///
/// Exponent notation in a cell (`5e28`) parses close to the representable limit.
pub fn saturating_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, value| acc.saturating_add(value))
}

// ==================== Formatting ====================

/// Format with two decimals and thousands grouping (`1234.5` -> `"1.234,50"`)
pub fn format_locale_number(value: Decimal) -> String {
    let (sign, int_part, frac_part) = split_fixed(value, 2);
    format!(
        "{}{}{}{}",
        sign,
        group_thousands(&int_part, THOUSANDS_SEPARATOR),
        DECIMAL_SEPARATOR,
        frac_part
    )
}

/// Format with two decimals and no grouping (`1234.5` -> `"1234,50"`).
///
/// This is the cell format of the persisted development table.
pub fn format_locale_plain(value: Decimal) -> String {
    let (sign, int_part, frac_part) = split_fixed(value, 2);
    format!("{}{}{}{}", sign, int_part, DECIMAL_SEPARATOR, frac_part)
}

/// Round to a whole number and group thousands (`12345.6` -> `"12.346"`)
pub fn format_locale_integer(value: Decimal) -> String {
    // Half rounds up towards positive infinity, like chart label rounding.
    let rounded = value
        .checked_add(Decimal::new(5, 1))
        .unwrap_or(value)
        .floor()
        .normalize();
    if rounded.is_zero() {
        return "0".to_string();
    }

    let text = rounded.to_string();
    match text.strip_prefix('-') {
        Some(digits) => format!("-{}", group_thousands(digits, THOUSANDS_SEPARATOR)),
        None => group_thousands(&text, THOUSANDS_SEPARATOR),
    }
}

/// Format a percentage with one decimal (`12.345` -> `"12,3"`)
pub fn format_locale_percent(value: Decimal) -> String {
    let (sign, int_part, frac_part) = split_fixed(value, 1);
    format!("{}{}{}{}", sign, int_part, DECIMAL_SEPARATOR, frac_part)
}

/// Format an amount in euros (`1234.5` -> `"1.234,50 €"`)
pub fn format_euro(value: Decimal) -> String {
    format!("{} {}", format_locale_number(value), CURRENCY_SUFFIX)
}

/// Round to `dp` decimals and split into sign, integer digits and fraction digits
fn split_fixed(value: Decimal, dp: u32) -> (&'static str, String, String) {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(dp);

    let text = rounded.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    (sign, int_part.to_string(), frac_part.to_string())
}

/// Insert a separator every three digits from the right
pub fn group_thousands(digits: &str, separator: char) -> String {
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push(separator);
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

// ==================== Tests ====================
