//! Brand detection from the leading digits of a card number.
//!
//! The number field calls this on every change, so it has to cope with
//! partial input: one or two digits are often enough to pick a brand
//! (`4` is Visa, `34` is American Express) and the answer can change as more
//! digits arrive (`22` is undecided, `2200` is Mir, `2221` is Mastercard).

use crate::CardBrand;

/// Detects the card brand from a sequence of digits (0-9 values, not ASCII).
///
/// Examines at most the first four digits. Returns `None` while the prefix
/// is empty, ambiguous or unknown.
///
/// # Example
///
/// ```
/// use card_field::detect::detect_brand;
/// use card_field::CardBrand;
///
/// assert_eq!(detect_brand(&[4]), Some(CardBrand::Visa));
/// assert_eq!(detect_brand(&[3, 7, 8, 2]), Some(CardBrand::Amex));
/// assert_eq!(detect_brand(&[1, 2]), None);
/// ```
#[inline]
pub fn detect_brand(digits: &[u8]) -> Option<CardBrand> {
    // Order matters for overlapping ranges: specific patterns first.
    match digits {
        [] => None,

        // Mir: 2200-2204 (before Mastercard 2221-2720)
        [2, 2, 0, 0..=4, ..] => Some(CardBrand::Mir),

        // Mastercard: 51-55 or 2221-2720
        [5, 1..=5, ..] => Some(CardBrand::Mastercard),
        [2, 2, 2, 1..=9, ..] => Some(CardBrand::Mastercard),
        [2, 2, 3..=9, _, ..] => Some(CardBrand::Mastercard),
        [2, 3..=6, _, _, ..] => Some(CardBrand::Mastercard),
        [2, 7, 0..=1, _, ..] => Some(CardBrand::Mastercard),
        [2, 7, 2, 0, ..] => Some(CardBrand::Mastercard),

        // American Express: 34 or 37
        [3, 4, ..] | [3, 7, ..] => Some(CardBrand::Amex),

        // Diners Club: 36, 38, 300-305, 309
        [3, 6, ..] | [3, 8, ..] => Some(CardBrand::DinersClub),
        [3, 0, 0..=5, ..] | [3, 0, 9, ..] => Some(CardBrand::DinersClub),

        // JCB: 3528-3589
        [3, 5, 2, 8..=9, ..] => Some(CardBrand::Jcb),
        [3, 5, 3..=8, _, ..] => Some(CardBrand::Jcb),

        [4, ..] => Some(CardBrand::Visa),

        // Verve 506/507 and Elo 509 before Maestro 50x
        [5, 0, 6..=7, ..] => Some(CardBrand::Verve),
        [5, 0, 9, ..] => Some(CardBrand::Elo),
        [5, 0, ..] | [5, 6..=8, ..] => Some(CardBrand::Maestro),

        // Discover: 6011, 644-649, 65
        [6, 0, 1, 1, ..] => Some(CardBrand::Discover),
        [6, 4, 4..=9, ..] => Some(CardBrand::Discover),
        [6, 5, ..] => Some(CardBrand::Discover),

        [6, 3, 6, 2..=3, ..] => Some(CardBrand::Elo),
        [6, 2, ..] => Some(CardBrand::UnionPay),
        [6, 0..=1, ..] | [6, 3, ..] | [6, 6..=9, ..] => Some(CardBrand::Maestro),

        [8, 1..=2, ..] => Some(CardBrand::RuPay),
        [9, 4, ..] => Some(CardBrand::BcCard),
        [9, 7, 9, 2, ..] => Some(CardBrand::Troy),

        _ => None,
    }
}

/// Detects the card brand from display text, ignoring anything that is not
/// an ASCII digit.
///
/// ```
/// use card_field::detect::detect_brand_str;
/// use card_field::CardBrand;
///
/// assert_eq!(detect_brand_str("5555 55"), Some(CardBrand::Mastercard));
/// assert_eq!(detect_brand_str(""), None);
/// ```
pub fn detect_brand_str(input: &str) -> Option<CardBrand> {
    // Four digits decide every prefix in the table.
    let mut prefix = [0u8; 4];
    let mut count = 0;
    for c in input.chars().filter(|c| c.is_ascii_digit()).take(4) {
        prefix[count] = (c as u8) - b'0';
        count += 1;
    }
    detect_brand(&prefix[..count])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_digit_prefixes() {
        assert_eq!(detect_brand(&[4]), Some(CardBrand::Visa));
        assert_eq!(detect_brand(&[5]), None);
        assert_eq!(detect_brand(&[3]), None);
        assert_eq!(detect_brand(&[0]), None);
    }

    #[test]
    fn test_mastercard_ranges() {
        assert_eq!(detect_brand(&[5, 1]), Some(CardBrand::Mastercard));
        assert_eq!(detect_brand(&[5, 5]), Some(CardBrand::Mastercard));
        assert_eq!(detect_brand(&[2, 2, 2, 1]), Some(CardBrand::Mastercard));
        assert_eq!(detect_brand(&[2, 7, 2, 0]), Some(CardBrand::Mastercard));
        assert_eq!(detect_brand(&[2, 7, 2, 1]), None);
    }

    #[test]
    fn test_mir_wins_over_mastercard() {
        assert_eq!(detect_brand(&[2, 2, 0, 0]), Some(CardBrand::Mir));
        assert_eq!(detect_brand(&[2, 2, 0, 4]), Some(CardBrand::Mir));
    }

    #[test]
    fn test_amex_and_diners() {
        assert_eq!(detect_brand(&[3, 4]), Some(CardBrand::Amex));
        assert_eq!(detect_brand(&[3, 7]), Some(CardBrand::Amex));
        assert_eq!(detect_brand(&[3, 6]), Some(CardBrand::DinersClub));
        assert_eq!(detect_brand(&[3, 0, 5]), Some(CardBrand::DinersClub));
    }

    #[test]
    fn test_partial_prefix_resolves_later() {
        assert_eq!(detect_brand(&[3, 5]), None);
        assert_eq!(detect_brand(&[3, 5, 2, 8]), Some(CardBrand::Jcb));
        assert_eq!(detect_brand(&[6, 0, 1]), Some(CardBrand::Maestro));
        assert_eq!(detect_brand(&[6, 0, 1, 1]), Some(CardBrand::Discover));
    }

    #[test]
    fn test_regional_brands() {
        assert_eq!(detect_brand(&[5, 0, 6]), Some(CardBrand::Verve));
        assert_eq!(detect_brand(&[5, 0, 9]), Some(CardBrand::Elo));
        assert_eq!(detect_brand(&[6, 3, 6, 2]), Some(CardBrand::Elo));
        assert_eq!(detect_brand(&[6, 2]), Some(CardBrand::UnionPay));
        assert_eq!(detect_brand(&[8, 1]), Some(CardBrand::RuPay));
        assert_eq!(detect_brand(&[9, 4]), Some(CardBrand::BcCard));
        assert_eq!(detect_brand(&[9, 7, 9, 2]), Some(CardBrand::Troy));
    }

    #[test]
    fn test_detect_brand_str_ignores_formatting() {
        assert_eq!(detect_brand_str("4242 4242"), Some(CardBrand::Visa));
        assert_eq!(detect_brand_str("3782 822463 10005"), Some(CardBrand::Amex));
        assert_eq!(detect_brand_str("abc"), None);
        assert_eq!(detect_brand_str("1234 5678"), None);
    }
}
