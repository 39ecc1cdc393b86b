//! Ecuadorian national ID (cédula) checksum.

/// Length of a cédula.
pub const NATIONAL_ID_LENGTH: usize = 10;

/// Highest valid province code.
const MAX_PROVINCE: u32 = 24;

/// Highest third digit for natural persons.
const MAX_THIRD_DIGIT: u32 = 5;

const COEFFICIENTS: [u32; 9] = [2, 1, 2, 1, 2, 1, 2, 1, 2];

/// Whether `value` is a valid 10-digit cédula for a natural person.
///
/// Rules, all of which must hold:
/// - exactly ten ASCII digits
/// - province code (first two digits) between 01 and 24
/// - third digit between 0 and 5
/// - the tenth digit matches the mod-10 check digit of the first nine
///
/// ```
/// use pos_console_core::validation::is_valid_national_id;
///
/// assert!(is_valid_national_id("1710034065"));
/// assert!(!is_valid_national_id("1710034066"));
/// ```
#[must_use]
pub fn is_valid_national_id(value: &str) -> bool {
    let Some(digits) = parse_digits(value) else {
        return false;
    };

    let province = digits[0] * 10 + digits[1];
    if !(1..=MAX_PROVINCE).contains(&province) {
        return false;
    }

    if digits[2] > MAX_THIRD_DIGIT {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .zip(COEFFICIENTS)
        .map(|(digit, coefficient)| {
            let product = digit * coefficient;
            if product >= 10 { product - 9 } else { product }
        })
        .sum();

    let remainder = sum % 10;
    let expected = if remainder == 0 { 0 } else { 10 - remainder };

    expected == digits[9]
}

fn parse_digits(value: &str) -> Option<[u32; NATIONAL_ID_LENGTH]> {
    let mut digits = [0; NATIONAL_ID_LENGTH];
    let mut chars = value.chars();
    for slot in &mut digits {
        *slot = chars.next()?.to_digit(10)?;
    }
    if chars.next().is_some() {
        return None;
    }
    Some(digits)
}
