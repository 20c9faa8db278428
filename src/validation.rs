//! Field format rules shared by the employee and transaction endpoints.
//!
//! Numeric fields are validated on their raw JSON representation, before they
//! are converted to numbers, so that input such as `-5` or `"12a"` is rejected
//! instead of being silently coerced.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

fn digits_regex() -> &'static Regex {
    static DIGITS_REGEX: OnceLock<Regex> = OnceLock::new();
    DIGITS_REGEX.get_or_init(|| Regex::new(r"^[0-9]+$").unwrap())
}

fn decimal_regex() -> &'static Regex {
    static DECIMAL_REGEX: OnceLock<Regex> = OnceLock::new();
    DECIMAL_REGEX.get_or_init(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").unwrap())
}

fn arabic_name_regex() -> &'static Regex {
    static ARABIC_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    ARABIC_NAME_REGEX.get_or_init(|| Regex::new(r"^[أ-ي\s]+$").unwrap())
}

/// Whether `text` is one or more of the ASCII digits 0-9.
pub fn is_digits(text: &str) -> bool {
    digits_regex().is_match(text)
}

/// Whether `text` is a non-negative decimal number such as `12` or `12.50`.
pub fn is_decimal(text: &str) -> bool {
    decimal_regex().is_match(text)
}

/// Whether `text` only contains Arabic letters and whitespace.
pub fn is_arabic_name(text: &str) -> bool {
    arabic_name_regex().is_match(text)
}

/// Whether `text` is empty or only whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// A number as it was written in the request body.
///
/// Clients send numbers either as JSON numbers or as strings, e.g. from a
/// text input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(serde_json::Number),
    Text(String),
}

impl RawNumber {
    /// The text to validate, with surrounding whitespace removed from strings.
    pub fn as_text(&self) -> String {
        match self {
            RawNumber::Number(number) => number.to_string(),
            RawNumber::Text(text) => text.trim().to_owned(),
        }
    }

    /// Whether the client sent an empty string.
    pub fn is_empty(&self) -> bool {
        matches!(self, RawNumber::Text(text) if is_blank(text))
    }
}

impl From<i64> for RawNumber {
    fn from(value: i64) -> Self {
        RawNumber::Number(value.into())
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(RawNumber::Number)
            .unwrap_or_else(|| RawNumber::Text(value.to_string()))
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_owned())
    }
}

/// Parse an age, which must be a non-negative whole number.
///
/// A missing or empty age is zero. Returns `None` if the age is not made of
/// digits only, or does not fit in an `i64`.
pub fn parse_age(raw: Option<&RawNumber>) -> Option<i64> {
    match raw {
        None => Some(0),
        Some(raw) if raw.is_empty() => Some(0),
        Some(raw) => {
            let text = raw.as_text();
            if is_digits(&text) {
                text.parse().ok()
            } else {
                None
            }
        }
    }
}

/// Parse an amount, which must be a non-negative decimal number.
///
/// Returns `None` if the amount does not match the decimal pattern.
pub fn parse_amount(raw: &RawNumber) -> Option<f64> {
    let text = raw.as_text();

    if is_decimal(&text) {
        text.parse().ok()
    } else {
        None
    }
}

/// Whether `box_number` is absent, blank or digits only.
pub fn is_valid_box_number(box_number: Option<&str>) -> bool {
    match box_number {
        Some(box_number) if !is_blank(box_number) => is_digits(box_number),
        _ => true,
    }
}
