//! Luhn (mod 10) checksum.
//!
//! The card-number validator calls this with the stripped digit string once
//! a brand length is reached, so a single transposed or mistyped digit is
//! caught before the field auto-advances.

/// Doubled digit with 9 subtracted when the result exceeds 9, indexed by digit.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Validates a sequence of digits (0-9 values) with the Luhn algorithm.
///
/// An empty slice is never valid.
///
/// # Example
///
/// ```
/// use card_field::luhn::validate;
///
/// assert!(validate(&[4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2]));
/// assert!(!validate(&[4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 1]));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    !digits.is_empty() && compute_checksum(digits) % 10 == 0
}

/// Validates the ASCII digits of `input`, skipping every other character.
///
/// ```
/// use card_field::luhn::validate_str;
///
/// assert!(validate_str("4242 4242 4242 4242"));
/// assert!(!validate_str(""));
/// ```
pub fn validate_str(input: &str) -> bool {
    let digits: Vec<u8> = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .map(|c| (c as u8) - b'0')
        .collect();
    validate(&digits)
}

/// Computes the Luhn sum (not reduced modulo 10).
///
/// The rightmost digit is the check digit and is not doubled; every second
/// digit moving left is.
#[inline]
pub fn compute_checksum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum()
}

/// Computes the check digit that makes `digits` followed by it pass
/// [`validate`].
///
/// ```
/// use card_field::luhn::generate_check_digit;
///
/// assert_eq!(generate_check_digit(&[4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4]), 2);
/// ```
#[inline]
pub fn generate_check_digit(digits: &[u8]) -> u8 {
    // Every digit shifts one place left once the check digit is appended,
    // so the doubling parity flips.
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum();

    ((10 - (sum % 10)) % 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cards() {
        assert!(validate(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]));
        assert!(validate(&[5, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4]));
        assert!(validate(&[3, 7, 8, 2, 8, 2, 2, 4, 6, 3, 1, 0, 0, 0, 5]));
        assert!(validate(&[3, 0, 5, 6, 9, 3, 0, 9, 0, 2, 5, 9, 0, 4]));
    }

    #[test]
    fn test_invalid_cards() {
        assert!(!validate(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2]));
        assert!(!validate(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn test_empty_input() {
        assert!(!validate(&[]));
        assert!(!validate_str("  -- "));
    }

    #[test]
    fn test_single_digit() {
        assert!(validate(&[0]));
        assert!(!validate(&[1]));
    }

    #[test]
    fn test_validate_str() {
        assert!(validate_str("4242424242424242"));
        assert!(validate_str("3782-822463-10005"));
        assert!(!validate_str("4242424242424241"));
    }

    #[test]
    fn test_generate_check_digit() {
        let partial = [5, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(generate_check_digit(&partial), 4);

        let partial = [3, 7, 8, 2, 8, 2, 2, 4, 6, 3, 1, 0, 0, 0];
        assert_eq!(generate_check_digit(&partial), 5);
    }

    #[test]
    fn test_double_table_values() {
        for i in 0..10 {
            let doubled = i * 2;
            let expected = if doubled > 9 { doubled - 9 } else { doubled };
            assert_eq!(DOUBLE_TABLE[i], expected as u8);
        }
    }
}
