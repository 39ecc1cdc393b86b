//! Password strength scoring.
//!
//! The score counts how many of five criteria a password meets:
//!
//! 1. at least [`MIN_PASSWORD_LENGTH`] characters
//! 2. a lowercase letter (`a-z`)
//! 3. an uppercase letter (`A-Z`)
//! 4. a digit (`0-9`)
//! 5. a character outside `a-z`, `A-Z`, `0-9`
//!
//! Passwords shorter than the minimum never score above 2.
//!
//! A password may be stored only when it scores at least
//! [`ACCEPTABLE_SCORE`] and its length is between [`MIN_PASSWORD_LENGTH`] and
//! [`MAX_PASSWORD_LENGTH`]. The upper bound is a business rule of the POS
//! back office and is kept as-is.

use serde::Serialize;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length accepted for storage.
pub const MAX_PASSWORD_LENGTH: usize = 8;

/// Minimum score accepted for storage.
pub const ACCEPTABLE_SCORE: u8 = 3;

/// Highest score a password shorter than the minimum can reach.
const SHORT_PASSWORD_SCORE_CAP: u8 = 2;

/// Human-facing strength label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLabel {
    VeryWeak,
    Weak,
    Medium,
    Strong,
}

impl StrengthLabel {
    /// Label for a score in `0..=5`.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            0 => Self::VeryWeak,
            1 | 2 => Self::Weak,
            3 => Self::Medium,
            _ => Self::Strong,
        }
    }

    /// Display text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryWeak => "Very Weak",
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        }
    }

    /// Severity used to color the strength meter.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::VeryWeak => Severity::Danger,
            Self::Weak => Severity::Warning,
            Self::Medium => Severity::Info,
            Self::Strong => Severity::Success,
        }
    }
}

impl std::fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meter severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Danger,
    Warning,
    Info,
    Success,
}

impl Severity {
    /// Display text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scoring a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    /// Number of criteria met, `0..=5`.
    pub score: u8,
    /// Length in characters.
    pub length: usize,
    /// Strength label derived from the score.
    pub label: StrengthLabel,
    /// Whether the password may be stored.
    pub acceptable: bool,
}

impl PasswordStrength {
    /// Meter severity for this result.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.label.severity()
    }
}

/// Score `password`.
///
/// ```
/// use pos_console_core::validation::{StrengthLabel, password_strength};
///
/// let strength = password_strength("Abc123");
/// assert_eq!(strength.score, 4);
/// assert_eq!(strength.label, StrengthLabel::Strong);
/// assert!(strength.acceptable);
/// ```
#[must_use]
pub fn password_strength(password: &str) -> PasswordStrength {
    let length = password.chars().count();

    let criteria = [
        length >= MIN_PASSWORD_LENGTH,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];

    // At most five criteria, always fits.
    let mut score = u8::try_from(criteria.iter().filter(|met| **met).count()).unwrap_or(u8::MAX);
    if length < MIN_PASSWORD_LENGTH {
        score = score.min(SHORT_PASSWORD_SCORE_CAP);
    }

    let acceptable = score >= ACCEPTABLE_SCORE
        && (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length);

    PasswordStrength {
        score,
        length,
        label: StrengthLabel::from_score(score),
        acceptable,
    }
}
