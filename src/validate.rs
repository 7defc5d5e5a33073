//! Completed-value validators for the card number, CVC and postal code.
//!
//! The expiry check lives in [`crate::expiry`] because it needs the current
//! month. Every validator here is total: malformed input is simply invalid.

use crate::card::{MAX_CARD_DIGITS, MIN_CARD_DIGITS};
use crate::detect::detect_brand;
use crate::luhn;
use crate::table::CardTypeTable;
use crate::CardBrand;

/// Shortest acceptable postal code, after trimming.
pub const ZIP_MIN_LENGTH: usize = 3;

/// Longest acceptable postal code, after trimming.
pub const ZIP_MAX_LENGTH: usize = 10;

/// Characters typed before the zip field starts validating on change.
pub const ZIP_VALIDATE_THRESHOLD: usize = 5;

/// Extracts the digits of a card number, skipping spaces and hyphens.
///
/// Returns `None` for any other character or more than
/// [`MAX_CARD_DIGITS`] digits.
fn parse_digits(input: &str) -> Option<([u8; MAX_CARD_DIGITS], usize)> {
    let mut digits = [0u8; MAX_CARD_DIGITS];
    let mut count = 0usize;

    for c in input.chars() {
        match c {
            '0'..='9' => {
                if count >= MAX_CARD_DIGITS {
                    return None;
                }
                digits[count] = (c as u8) - b'0';
                count += 1;
            }
            ' ' | '-' => {}
            _ => return None,
        }
    }

    Some((digits, count))
}

/// Validates a card number against the built-in brand table.
///
/// # Example
///
/// ```
/// use card_field::validate::validate_card_number;
///
/// assert!(validate_card_number("4242 4242 4242 4242"));
/// assert!(!validate_card_number("4242 4242 4242 4241"));
/// assert!(!validate_card_number("4242.4242.4242.4242"));
/// ```
pub fn validate_card_number(input: &str) -> bool {
    validate_card_number_with(input, &CardTypeTable::default())
}

/// Validates a card number: at least [`MIN_CARD_DIGITS`] digits, a detected
/// brand whose lengths in `table` include the digit count, and a passing
/// Luhn checksum.
pub fn validate_card_number_with(input: &str, table: &CardTypeTable) -> bool {
    let Some((digits, count)) = parse_digits(input) else {
        return false;
    };

    if count < MIN_CARD_DIGITS {
        return false;
    }

    let digits = &digits[..count];
    match detect_brand(digits).and_then(|b| table.rule(b)) {
        Some(rule) => rule.accepts_length(count) && luhn::validate(digits),
        None => false,
    }
}

/// Validates a CVC against the built-in brand table.
///
/// ```
/// use card_field::validate::validate_cvc;
/// use card_field::CardBrand;
///
/// assert!(validate_cvc("123", Some(CardBrand::Visa)));
/// assert!(!validate_cvc("123", Some(CardBrand::Amex)));
/// assert!(validate_cvc("1234", None));
/// ```
pub fn validate_cvc(input: &str, brand: Option<CardBrand>) -> bool {
    validate_cvc_with(input, brand, &CardTypeTable::default())
}

/// Validates a CVC: digits only, exactly the brand's CVC length when the
/// brand is known, otherwise 3 or 4 digits.
pub fn validate_cvc_with(input: &str, brand: Option<CardBrand>, table: &CardTypeTable) -> bool {
    let cvc = input.trim();
    if cvc.is_empty() || !cvc.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    match table.rule_for(brand) {
        Some(rule) => cvc.len() == rule.cvc_length,
        None => (3..=4).contains(&cvc.len()),
    }
}

/// Validates a postal code: [`ZIP_MIN_LENGTH`] to [`ZIP_MAX_LENGTH`]
/// characters of ASCII letters, digits, spaces or hyphens once trimmed.
///
/// ```
/// use card_field::validate::is_zip_valid;
///
/// assert!(is_zip_valid("90210"));
/// assert!(is_zip_valid("SW1A 1AA"));
/// assert!(!is_zip_valid("12"));
/// assert!(!is_zip_valid("123$5"));
/// ```
pub fn is_zip_valid(input: &str) -> bool {
    let zip = input.trim();
    (ZIP_MIN_LENGTH..=ZIP_MAX_LENGTH).contains(&zip.len())
        && zip
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b' ' || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RuleOverride;
    use std::collections::BTreeMap;

    #[test]
    fn test_valid_numbers() {
        assert!(validate_card_number("4242424242424242"));
        assert!(validate_card_number("4242-4242-4242-4242"));
        assert!(validate_card_number("5555 5555 5555 4444"));
        assert!(validate_card_number("3782 822463 10005"));
        assert!(validate_card_number("6011111111111117"));
    }

    #[test]
    fn test_checksum_failure() {
        assert!(!validate_card_number("4242424242424241"));
    }

    #[test]
    fn test_rejects_other_separators() {
        assert!(!validate_card_number("4242.4242.4242.4242"));
        assert!(!validate_card_number("4242/4242/4242/4242"));
        assert!(!validate_card_number("4242a4242424242"));
    }

    #[test]
    fn test_too_short_or_long() {
        assert!(!validate_card_number(""));
        assert!(!validate_card_number("42424242424"));
        assert!(!validate_card_number("42424242424242424242"));
    }

    #[test]
    fn test_unknown_brand() {
        // Luhn-valid but no brand starts with 1
        assert!(!validate_card_number("1234567812345670"));
    }

    #[test]
    fn test_wrong_length_for_brand() {
        // Amex prefix with 16 digits, Luhn-valid
        assert!(luhn::validate_str("3782822463100052"));
        assert!(!validate_card_number("3782822463100052"));
    }

    #[test]
    fn test_table_overrides_apply() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            CardBrand::Visa,
            RuleOverride {
                lengths: Some(vec![13]),
                ..Default::default()
            },
        );
        let table = CardTypeTable::new(&overrides).unwrap();
        assert!(!validate_card_number_with("4242424242424242", &table));
        assert!(validate_card_number_with("4222222222222", &table));
    }

    #[test]
    fn test_cvc() {
        assert!(validate_cvc("123", Some(CardBrand::Visa)));
        assert!(!validate_cvc("1234", Some(CardBrand::Visa)));
        assert!(validate_cvc("1234", Some(CardBrand::Amex)));
        assert!(validate_cvc(" 123 ", None));
        assert!(!validate_cvc("12", None));
        assert!(!validate_cvc("12345", None));
        assert!(!validate_cvc("12a", None));
        assert!(!validate_cvc("", None));
    }

    #[test]
    fn test_zip_bounds() {
        assert!(!is_zip_valid("12"));
        assert!(is_zip_valid("123"));
        assert!(is_zip_valid("1234567890"));
        assert!(!is_zip_valid("12345678901"));
        assert!(is_zip_valid("  12345  "));
    }

    #[test]
    fn test_zip_characters() {
        assert!(is_zip_valid("12345-6789"));
        assert!(is_zip_valid("K1A 0B1"));
        assert!(!is_zip_valid("123_45"));
        assert!(!is_zip_valid("1234é"));
        assert!(!is_zip_valid(""));
    }
}
