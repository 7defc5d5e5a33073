//! Format-as-you-type helpers.
//!
//! Each formatter takes whatever is currently in the input (possibly already
//! formatted, possibly with junk pasted in) and rebuilds the display text
//! from scratch, so formatting the output again changes nothing.
//!
//! # Example
//!
//! ```
//! use card_field::format::{format_card_number, format_cvc, format_expiry, format_expiry_on_delete};
//!
//! assert_eq!(format_card_number("4242424242424242"), "4242 4242 4242 4242");
//! assert_eq!(format_expiry("4"), "04 / ");
//! assert_eq!(format_expiry("1225"), "12 / 25");
//! assert_eq!(format_expiry_on_delete("12 /"), "12");
//! assert_eq!(format_cvc("12a34", 4), "1234");
//! ```

use crate::card::MAX_CARD_DIGITS;
use crate::table::{CardBrandRule, FALLBACK_CVC_LENGTH, FALLBACK_LENGTHS};

/// Zip field capacity.
pub const DEFAULT_ZIP_LENGTH: usize = 6;

/// Most digits the CVC field keeps, whatever the brand.
pub const CVC_MAX_LENGTH: usize = 4;

const EXPIRY_SEPARATOR: &str = " / ";

/// Strips everything but ASCII digits.
///
/// ```
/// use card_field::format::strip_formatting;
///
/// assert_eq!(strip_formatting("4242 4242-42"), "4242424242");
/// ```
pub fn strip_formatting(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Groups digits in blocks of four, keeping at most [`MAX_CARD_DIGITS`].
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(MAX_CARD_DIGITS)
        .collect();
    group_digits(&digits, None)
}

/// Groups digits with the brand's grouping and truncates to the brand's
/// longest valid length. Without a rule this is [`format_card_number`].
///
/// ```
/// use card_field::format::format_card_number_for;
/// use card_field::table::CardBrandRule;
/// use card_field::CardBrand;
///
/// let amex = CardBrandRule::default_for(CardBrand::Amex);
/// assert_eq!(format_card_number_for("3782822463100059", Some(&amex)), "3782 822463 10005");
/// ```
pub fn format_card_number_for(input: &str, rule: Option<&CardBrandRule>) -> String {
    let Some(rule) = rule else {
        return format_card_number(input);
    };

    let digits: Vec<char> = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(rule.max_length())
        .collect();
    group_digits(&digits, rule.grouping.as_deref())
}

fn group_digits(digits: &[char], groups: Option<&[usize]>) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 4);

    match groups {
        Some(groups) => {
            let mut pos = 0;
            for &size in groups {
                if pos >= digits.len() {
                    break;
                }
                if pos > 0 {
                    result.push(' ');
                }
                let end = pos.saturating_add(size).min(digits.len());
                result.extend(&digits[pos..end]);
                pos = end;
            }
            // Digits beyond the configured groups form one trailing block
            if pos < digits.len() {
                result.push(' ');
                result.extend(&digits[pos..]);
            }
        }
        None => {
            for (i, c) in digits.iter().enumerate() {
                if i > 0 && i % 4 == 0 {
                    result.push(' ');
                }
                result.push(*c);
            }
        }
    }

    result
}

/// Formats expiry input as `MM / YY` while the user types forward.
///
/// - a lone `2`-`9` becomes `0N / `
/// - two digits above 12 split into `0M / Y`
/// - `1/` or `1-` becomes `01 / `
/// - the separator appears as soon as two month digits exist
pub fn format_expiry(input: &str) -> String {
    format_expiry_impl(input, false)
}

/// Like [`format_expiry`], but when the user deletes back into the separator
/// the bare month is returned instead of the separator being re-inserted.
pub fn format_expiry_on_delete(input: &str) -> String {
    format_expiry_impl(input, true)
}

fn format_expiry_impl(input: &str, deleting: bool) -> String {
    let prev = input.replace(EXPIRY_SEPARATOR, "/");
    if prev.is_empty() {
        return String::new();
    }

    let mut expiry = prev.clone();
    let bytes = prev.as_bytes();

    if bytes.len() == 1 && (b'2'..=b'9').contains(&bytes[0]) {
        expiry = format!("0{}", prev);
    }

    if bytes.len() == 2 && bytes.iter().all(u8::is_ascii_digit) && prev.as_str() > "12" {
        expiry = format!("0{}/{}", &prev[..1], &prev[1..]);
    }

    if expiry == "1/" || expiry == "1-" {
        return format!("01{}", EXPIRY_SEPARATOR);
    }

    let groups = digit_pairs(&expiry);

    match groups.len() {
        0 => String::new(),
        1 => {
            if deleting && prev.contains('/') {
                groups[0].clone()
            } else if groups[0].len() == 2 {
                format!("{}{}", groups[0], EXPIRY_SEPARATOR)
            } else {
                groups[0].clone()
            }
        }
        2 => groups.join(EXPIRY_SEPARATOR),
        _ => {
            // More than MM and YY: keep the month and the last two digits.
            let joined = groups.concat();
            let month = &joined[..2];
            let year = &joined[joined.len() - 2..];
            format!("{}{}{}", month, EXPIRY_SEPARATOR, year)
        }
    }
}

/// Splits the digits of `input` into runs, each run chopped into chunks of
/// at most two digits.
fn digit_pairs(input: &str) -> Vec<String> {
    let mut groups = Vec::new();
    let mut current = String::with_capacity(2);

    for c in input.chars() {
        if c.is_ascii_digit() {
            current.push(c);
            if current.len() == 2 {
                groups.push(std::mem::take(&mut current));
            }
        } else if !current.is_empty() {
            groups.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

/// Keeps at most `max` digits.
pub fn format_cvc(input: &str, max: usize) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(max)
        .collect()
}

/// Keeps at most [`DEFAULT_ZIP_LENGTH`] characters; digits only when
/// `numeric_only`.
pub fn format_zip(input: &str, numeric_only: bool) -> String {
    input
        .chars()
        .filter(|c| !numeric_only || c.is_ascii_digit())
        .take(DEFAULT_ZIP_LENGTH)
        .collect()
}

/// True once `len` digits fill the brand's longest length (16 without a
/// brand).
#[inline]
pub fn has_card_number_reached_max_length(len: usize, rule: Option<&CardBrandRule>) -> bool {
    let max = match rule {
        Some(rule) => rule.max_length(),
        None => FALLBACK_LENGTHS[0] as usize,
    };
    len >= max
}

/// True once `len` digits fill the brand's CVC (3 without a brand).
#[inline]
pub fn has_cvc_reached_max_length(len: usize, rule: Option<&CardBrandRule>) -> bool {
    let max = rule.map(|r| r.cvc_length).unwrap_or(FALLBACK_CVC_LENGTH);
    len >= max
}

/// True once `len` characters fill the zip field.
#[inline]
pub fn has_zip_reached_max_length(len: usize) -> bool {
    len >= DEFAULT_ZIP_LENGTH
}
