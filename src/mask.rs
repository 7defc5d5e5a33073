//! Masking for logs and `Debug` output.
//!
//! Field values pass through [`mask_digits`] before they reach a `tracing`
//! event or a `{:?}` formatter, so a full card number never appears in
//! clear. Only the last four digits of a number long enough to be a card
//! are kept, which is what PCI-DSS allows for display.

use crate::card::MIN_CARD_DIGITS;

/// Replaces digits with `*`, keeping separators and the layout.
///
/// The last four digits stay visible once the value holds at least
/// [`MIN_CARD_DIGITS`] digits; shorter values are masked entirely.
///
/// # Example
///
/// ```
/// use card_field::mask::mask_digits;
///
/// assert_eq!(mask_digits("4242 4242 4242 4242"), "**** **** **** 4242");
/// assert_eq!(mask_digits("4242 42"), "**** **");
/// assert_eq!(mask_digits("12 / 25"), "** / **");
/// ```
pub fn mask_digits(input: &str) -> String {
    let total = input.chars().filter(|c| c.is_ascii_digit()).count();
    let visible_from = if total >= MIN_CARD_DIGITS {
        total - 4
    } else {
        total
    };

    let mut seen = 0;
    input
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen > visible_from {
                    c
                } else {
                    '*'
                }
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_full_number() {
        assert_eq!(mask_digits("4242424242424242"), "************4242");
        assert_eq!(mask_digits("3782 822463 10005"), "**** ****** *0005");
    }

    #[test]
    fn test_mask_partial_number() {
        assert_eq!(mask_digits("42424242424"), "***********");
        assert_eq!(mask_digits(""), "");
    }

    #[test]
    fn test_mask_keeps_non_digits() {
        assert_eq!(mask_digits("K1A 0B1"), "K*A *B*");
    }
}
