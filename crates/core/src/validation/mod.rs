//! Field validators and keystroke formatters.
//!
//! Everything here is a pure function of the raw field value. Validators
//! return a verdict and never panic, even on input that slipped past a
//! formatter. Formatters return the cleaned value; the caller writes it back
//! into the field being edited.
//!
//! # Validators
//!
//! - [`is_valid_email`] - `local@domain.tld` shape
//! - [`is_valid_national_id`] - 10-digit Ecuadorian cédula checksum
//! - [`password_strength`] - strength score, label, and storage verdict
//! - [`is_valid_phone`] - optional, exactly 10 digits
//! - [`is_valid_url`] - optional, absolute URL
//!
//! # Formatters
//!
//! - [`format_letters`], [`format_integer`], [`format_decimal`],
//!   [`format_postal_code`], [`format_fax`]

pub mod contact;
pub mod format;
pub mod national_id;
pub mod password;

pub use contact::{is_valid_email, is_valid_phone, is_valid_url};
pub use format::{
    DEFAULT_INTEGER_MAX_LENGTH, DEFAULT_LETTERS_MAX_LENGTH, FieldFormat, format_decimal,
    format_fax, format_integer, format_letters, format_postal_code, parse_amount,
};
pub use national_id::is_valid_national_id;
pub use password::{PasswordStrength, Severity, StrengthLabel, password_strength};
