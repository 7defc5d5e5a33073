//! Expiry date validation against the current month.
//!
//! The expiry field displays `MM / YY`; validators receive the value with the
//! spaced separator collapsed (`MM/YY`). Accepted shapes:
//!
//! - `MM/YY`, `MM/YYYY`
//! - `MM-YY`, `MM-YYYY`
//! - `MMYY`, `MMYYYY`
//!
//! Two-digit years are read as `20YY`. A card stays valid through the end of
//! its expiry month.
//!
//! # Example
//!
//! ```
//! use card_field::expiry::{is_expiry_invalid, validate_expiry, ExpiryError, ExpiryMessages, YearMonth};
//!
//! let today = YearMonth::new(2024, 6);
//! let messages = ExpiryMessages::default();
//!
//! assert_eq!(validate_expiry("12/99", today), Ok(YearMonth::new(2099, 12)));
//! assert_eq!(validate_expiry("13/25", today), Err(ExpiryError::MonthOutOfRange));
//! assert_eq!(
//!     is_expiry_invalid("01/20", &messages, today).as_deref(),
//!     Some("Expiry year cannot be in the past")
//! );
//! // Still typing
//! assert_eq!(is_expiry_invalid("1", &messages, today), None);
//! ```

use std::fmt;

use chrono::Datelike;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    /// Four-digit year.
    pub year: u16,
    /// Month, 1-12.
    pub month: u8,
}

impl YearMonth {
    /// Creates a year/month pair. The month is not range-checked.
    #[inline]
    pub const fn new(year: u16, month: u8) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year % 100)
    }
}

/// Source of the current month for expiry checks.
pub trait Clock {
    /// The current year and month.
    fn today(&self) -> YearMonth;
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> YearMonth {
        let now = chrono::Local::now();
        let year = u16::try_from(now.year()).unwrap_or(u16::MAX);
        YearMonth::new(year, now.month() as u8)
    }
}

/// Always reports the same month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub YearMonth);

impl Clock for FixedClock {
    fn today(&self) -> YearMonth {
        self.0
    }
}

/// Why an expiry value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpiryError {
    /// Not a recognizable month/year pair, or incomplete.
    Malformed,
    /// Month outside 01-12.
    MonthOutOfRange,
    /// Year before the current year.
    YearInPast,
    /// Current year, month before the current month.
    DateInPast,
}

impl ExpiryError {
    /// True for the two "already expired" variants.
    #[inline]
    pub const fn is_past(&self) -> bool {
        matches!(self, Self::YearInPast | Self::DateInPast)
    }
}

impl fmt::Display for ExpiryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "invalid expiry format (expected MM/YY or MM/YYYY)"),
            Self::MonthOutOfRange => write!(f, "month out of range (must be 01-12)"),
            Self::YearInPast => write!(f, "expiry year is in the past"),
            Self::DateInPast => write!(f, "expiry date is in the past"),
        }
    }
}

impl std::error::Error for ExpiryError {}

/// User-facing text for each [`ExpiryError`]. Any key left out of a
/// deserialized config keeps its default.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ExpiryMessages {
    /// For [`ExpiryError::Malformed`].
    pub invalid_expiry_date: String,
    /// For [`ExpiryError::MonthOutOfRange`].
    pub month_out_of_range: String,
    /// For [`ExpiryError::YearInPast`].
    pub year_out_of_range: String,
    /// For [`ExpiryError::DateInPast`].
    pub date_out_of_range: String,
}

impl Default for ExpiryMessages {
    fn default() -> Self {
        Self {
            invalid_expiry_date: "Expiry date is invalid".to_string(),
            month_out_of_range: "Expiry month must be between 01 and 12".to_string(),
            year_out_of_range: "Expiry year cannot be in the past".to_string(),
            date_out_of_range: "Expiry date cannot be in the past".to_string(),
        }
    }
}

impl ExpiryMessages {
    /// The message configured for `error`.
    pub fn message(&self, error: ExpiryError) -> &str {
        match error {
            ExpiryError::Malformed => &self.invalid_expiry_date,
            ExpiryError::MonthOutOfRange => &self.month_out_of_range,
            ExpiryError::YearInPast => &self.year_out_of_range,
            ExpiryError::DateInPast => &self.date_out_of_range,
        }
    }
}

/// Digits needed before the as-you-type check reports anything.
pub const EXPIRY_MIN_DIGITS: usize = 4;

/// Parses a month/year pair without comparing it to today.
pub fn parse_expiry(input: &str) -> Result<YearMonth, ExpiryError> {
    let input = input.trim();

    let (month_str, year_str) = match input.split_once(|c: char| c == '/' || c == '-') {
        Some((m, y)) => (m.trim(), y.trim()),
        None if input.bytes().all(|b| b.is_ascii_digit()) => match input.len() {
            4 => (&input[..2], &input[2..]),
            6 => (&input[..2], &input[2..]),
            _ => return Err(ExpiryError::Malformed),
        },
        None => return Err(ExpiryError::Malformed),
    };

    if !is_digits(month_str) || !is_digits(year_str) || month_str.len() > 2 {
        return Err(ExpiryError::Malformed);
    }

    let month: u8 = month_str.parse().map_err(|_| ExpiryError::Malformed)?;
    if !(1..=12).contains(&month) {
        return Err(ExpiryError::MonthOutOfRange);
    }

    let year: u16 = match year_str.len() {
        2 => 2000 + year_str.parse::<u16>().map_err(|_| ExpiryError::Malformed)?,
        4 => year_str.parse().map_err(|_| ExpiryError::Malformed)?,
        _ => return Err(ExpiryError::Malformed),
    };

    Ok(YearMonth::new(year, month))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Full validation, used on blur. Incomplete input is [`ExpiryError::Malformed`].
pub fn validate_expiry(input: &str, today: YearMonth) -> Result<YearMonth, ExpiryError> {
    let date = parse_expiry(input)?;

    if date.year < today.year {
        return Err(ExpiryError::YearInPast);
    }
    if date.year == today.year && date.month < today.month {
        return Err(ExpiryError::DateInPast);
    }

    Ok(date)
}

/// As-you-type check: `None` while valid or while fewer than
/// [`EXPIRY_MIN_DIGITS`] digits have been typed, otherwise the message for
/// the failure.
pub fn is_expiry_invalid(
    input: &str,
    messages: &ExpiryMessages,
    today: YearMonth,
) -> Option<String> {
    let digits = input.bytes().filter(u8::is_ascii_digit).count();
    if digits < EXPIRY_MIN_DIGITS {
        return None;
    }

    validate_expiry(input, today)
        .err()
        .map(|e| messages.message(e).to_string())
}
