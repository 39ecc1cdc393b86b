//! Field validation and formatting commands.
//!
//! # Usage
//!
//! ```bash
//! pos-cli validate national-id 1710034065
//! pos-cli validate password 'Abc123!!'
//! pos-cli format decimal '12.345.6'
//! pos-cli format letters 'José 123' --max-length 10
//! ```

use clap::ValueEnum;
use thiserror::Error;

use pos_console_core::validation::{
    self, DEFAULT_INTEGER_MAX_LENGTH, DEFAULT_LETTERS_MAX_LENGTH, FieldFormat,
};

/// A value failed its check.
#[derive(Debug, Error)]
#[error("Not a valid {0}")]
pub struct InvalidField(&'static str);

/// Fields that can be checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Check {
    /// Email address
    Email,
    /// Ecuadorian cédula (10 digits with check digit)
    NationalId,
    /// Password strength and storage rules
    Password,
    /// Phone number (optional, 10 digits)
    Phone,
    /// Absolute URL (optional)
    Url,
}

impl Check {
    const fn label(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::NationalId => "national ID",
            Self::Password => "password",
            Self::Phone => "phone number",
            Self::Url => "URL",
        }
    }
}

/// Formatters that can be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Keep letters and spaces
    Letters,
    /// Keep digits
    Integer,
    /// Amount with up to 6 integer and 2 fraction digits
    Decimal,
    /// Alphanumeric postal code
    PostalCode,
    /// Fax number with punctuation
    Fax,
}

impl Format {
    /// The formatter, with `max_length` overriding the default where the
    /// field has one.
    #[must_use]
    pub fn field_format(self, max_length: Option<usize>) -> FieldFormat {
        match self {
            Self::Letters => FieldFormat::Letters {
                max_length: max_length.unwrap_or(DEFAULT_LETTERS_MAX_LENGTH),
            },
            Self::Integer => FieldFormat::Integer {
                max_length: max_length.unwrap_or(DEFAULT_INTEGER_MAX_LENGTH),
            },
            Self::Decimal => FieldFormat::Decimal,
            Self::PostalCode => FieldFormat::PostalCode,
            Self::Fax => FieldFormat::Fax,
        }
    }
}

/// Check `value` and report the verdict.
///
/// # Errors
///
/// Returns `InvalidField` if the value fails the check.
pub fn validate(check: Check, value: &str) -> Result<(), InvalidField> {
    let valid = match check {
        Check::Email => validation::is_valid_email(value),
        Check::NationalId => validation::is_valid_national_id(value),
        Check::Phone => validation::is_valid_phone(value),
        Check::Url => validation::is_valid_url(value),
        Check::Password => {
            let strength = validation::password_strength(value);
            tracing::info!(
                "Strength: {} ({}), score {}/5, length {}",
                strength.label.as_str(),
                strength.severity().as_str(),
                strength.score,
                strength.length
            );
            strength.acceptable
        }
    };

    if valid {
        tracing::info!("Valid {}", check.label());
        Ok(())
    } else {
        Err(InvalidField(check.label()))
    }
}

/// Apply `format` to `value` and report the cleaned value.
pub fn format(format: Format, max_length: Option<usize>, value: &str) -> String {
    let cleaned = format.field_format(max_length).apply(value);
    match format {
        Format::Decimal => match validation::parse_amount(&cleaned) {
            Some(amount) => tracing::info!("{cleaned} (amount {amount})"),
            None => tracing::info!("{cleaned:?} (no amount)"),
        },
        _ => tracing::info!("{cleaned}"),
    }
    cleaned
}
