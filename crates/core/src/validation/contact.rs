//! Contact field validators: email, phone, and website.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Number of digits a phone number must contain.
pub const PHONE_DIGITS: usize = 10;

/// Whether `value` looks like `local@domain.tld`.
///
/// Empty input is invalid.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    !value.is_empty() && EMAIL_RE.is_match(value)
}

/// Whether `value` is an acceptable phone number.
///
/// The field is optional, so empty input is valid. Otherwise any formatting
/// is allowed as long as exactly ten digits are present.
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    value.is_empty() || value.chars().filter(char::is_ascii_digit).count() == PHONE_DIGITS
}

/// Whether `value` is an acceptable website.
///
/// The field is optional, so empty input is valid. Otherwise it must parse as
/// an absolute URL.
#[must_use]
pub fn is_valid_url(value: &str) -> bool {
    value.is_empty() || url::Url::parse(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("cajero@tienda.ec"));
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("cajero@tienda"));
        assert!(!is_valid_email("cajero tienda@x.ec"));
        assert!(!is_valid_email("cajero@tienda.ec "));
        assert!(!is_valid_email("@tienda.ec"));
    }

    #[test]
    fn test_phone_optional() {
        assert!(is_valid_phone(""));
    }

    #[test]
    fn test_phone_counts_digits_only() {
        assert!(is_valid_phone("0991234567"));
        assert!(is_valid_phone("(099) 123-4567"));
        assert!(!is_valid_phone("099123456"));
        assert!(!is_valid_phone("09912345678"));
        assert!(!is_valid_phone("   "));
    }

    #[test]
    fn test_url() {
        assert!(is_valid_url(""));
        assert!(is_valid_url("https://proveedor.ec"));
        assert!(is_valid_url("http://localhost:8080/catalogo?x=1"));
        assert!(!is_valid_url("proveedor.ec"));
        assert!(!is_valid_url("/relative/path"));
        assert!(!is_valid_url("http://"));
    }
}
