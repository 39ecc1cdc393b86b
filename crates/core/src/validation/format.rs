//! Keystroke formatters.
//!
//! Each formatter strips what the field does not accept and truncates to the
//! field's maximum length. Lengths are counted in characters. Running a
//! formatter on its own output returns the same value.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Default maximum length for name fields.
pub const DEFAULT_LETTERS_MAX_LENGTH: usize = 25;

/// Default maximum length for integer fields (stock, quantities).
pub const DEFAULT_INTEGER_MAX_LENGTH: usize = 6;

/// Maximum digits before the decimal point.
pub const DECIMAL_INTEGER_DIGITS: usize = 6;

/// Maximum digits after the decimal point.
pub const DECIMAL_FRACTION_DIGITS: usize = 2;

/// Maximum postal code length.
pub const POSTAL_CODE_MAX_LENGTH: usize = 10;

/// Maximum fax length, formatting included.
pub const FAX_MAX_LENGTH: usize = 15;

/// Accented letters accepted in name fields besides `a-z` and `A-Z`.
const ACCENTED_LETTERS: &str = "ñÑáéíóúÁÉÍÓÚ";

/// Punctuation accepted in fax numbers.
const FAX_PUNCTUATION: &str = "()-. ";

/// A formatter bound to its field parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// Names: letters and spaces.
    Letters { max_length: usize },
    /// Whole numbers.
    Integer { max_length: usize },
    /// Amounts with up to two decimals.
    Decimal,
    /// Alphanumeric postal codes.
    PostalCode,
    /// Fax numbers with formatting punctuation.
    Fax,
}

impl FieldFormat {
    /// Clean `value` for this field.
    #[must_use]
    pub fn apply(self, value: &str) -> String {
        match self {
            Self::Letters { max_length } => format_letters(value, max_length),
            Self::Integer { max_length } => format_integer(value, max_length),
            Self::Decimal => format_decimal(value),
            Self::PostalCode => format_postal_code(value),
            Self::Fax => format_fax(value),
        }
    }
}

fn keep_truncated(value: &str, max_length: usize, keep: impl Fn(char) -> bool) -> String {
    value.chars().filter(|c| keep(*c)).take(max_length).collect()
}

/// Keep letters (including `ñ` and accented vowels) and whitespace.
#[must_use]
pub fn format_letters(value: &str, max_length: usize) -> String {
    keep_truncated(value, max_length, |c| {
        c.is_ascii_alphabetic() || c.is_whitespace() || ACCENTED_LETTERS.contains(c)
    })
}

/// Keep ASCII digits.
#[must_use]
pub fn format_integer(value: &str, max_length: usize) -> String {
    keep_truncated(value, max_length, |c| c.is_ascii_digit())
}

/// Keep digits and a single decimal point, limiting both sides of the point.
///
/// ```
/// use pos_console_core::validation::format_decimal;
///
/// assert_eq!(format_decimal("12.345.6"), "12.34");
/// assert_eq!(format_decimal("1234567.89"), "123456.89");
/// ```
#[must_use]
pub fn format_decimal(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match cleaned.split_once('.') {
        None => cleaned.chars().take(DECIMAL_INTEGER_DIGITS).collect(),
        Some((integer, rest)) => {
            let integer: String = integer.chars().take(DECIMAL_INTEGER_DIGITS).collect();
            let fraction: String = rest
                .chars()
                .filter(|c| *c != '.')
                .take(DECIMAL_FRACTION_DIGITS)
                .collect();
            format!("{integer}.{fraction}")
        }
    }
}

/// Keep ASCII letters and digits.
#[must_use]
pub fn format_postal_code(value: &str) -> String {
    keep_truncated(value, POSTAL_CODE_MAX_LENGTH, |c| c.is_ascii_alphanumeric())
}

/// Keep digits and `( ) - .` and spaces.
#[must_use]
pub fn format_fax(value: &str) -> String {
    keep_truncated(value, FAX_MAX_LENGTH, |c| {
        c.is_ascii_digit() || FAX_PUNCTUATION.contains(c)
    })
}

/// Parse an amount produced by [`format_decimal`].
///
/// Returns `None` when no digits were entered. A leading or trailing point
/// left over from typing is tolerated.
///
/// ```
/// use pos_console_core::validation::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("12.5"), Some(Decimal::new(125, 1)));
/// assert_eq!(parse_amount("."), None);
/// ```
#[must_use]
pub fn parse_amount(formatted: &str) -> Option<Decimal> {
    let formatted = format_decimal(formatted);
    let (integer, fraction) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), ""));

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let integer = if integer.is_empty() { "0" } else { integer };
    let normalized = if fraction.is_empty() {
        integer.to_owned()
    } else {
        format!("{integer}.{fraction}")
    };

    Decimal::from_str(&normalized).ok()
}
