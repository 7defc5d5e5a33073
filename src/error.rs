//! Error types.
//!
//! [`FieldError`] is what a field publishes when the user's input does not
//! validate; it never aborts anything and always carries a human-readable
//! message through [`FieldError::message`]. [`ConfigError`] is returned when
//! a [`crate::FormConfig`] cannot be loaded or contains unusable rules.

use std::fmt;
use std::io;

use crate::config::TextLabels;
use crate::expiry::ExpiryError;
use crate::CardBrand;

/// A user-input validation failure on one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Wrong length for the brand, unknown brand or failed checksum.
    InvalidCardNumber,
    /// The expiry date did not parse or lies in the past.
    InvalidExpiry(ExpiryError),
    /// Wrong CVC length or non-digit characters.
    InvalidCvc,
    /// The postal code failed the pattern check.
    InvalidPostalCode,
}

impl FieldError {
    /// The message shown to the user, taken from `labels`.
    pub fn message(&self, labels: &TextLabels) -> String {
        match self {
            Self::InvalidCardNumber => labels.invalid_card_number.clone(),
            Self::InvalidExpiry(e) => labels.expiry_error.message(*e).to_string(),
            Self::InvalidCvc => labels.invalid_cvc.clone(),
            Self::InvalidPostalCode => labels.invalid_zip_code.clone(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCardNumber => write!(f, "card number is invalid"),
            Self::InvalidExpiry(e) => write!(f, "expiry is invalid: {}", e),
            Self::InvalidCvc => write!(f, "CVC is invalid"),
            Self::InvalidPostalCode => write!(f, "postal code is invalid"),
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidExpiry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExpiryError> for FieldError {
    fn from(e: ExpiryError) -> Self {
        Self::InvalidExpiry(e)
    }
}

/// Errors raised while loading or checking a form configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration text could not be parsed.
    Parse(String),
    /// Reading the configuration failed.
    Io(io::Error),
    /// A brand override is unusable.
    InvalidRule {
        /// The brand whose override was rejected.
        brand: CardBrand,
        /// What is wrong with it.
        reason: String,
    },
    /// The operation needs a cargo feature that was not compiled in.
    FeatureNotEnabled(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {}", msg),
            Self::Io(e) => write!(f, "config I/O error: {}", e),
            Self::InvalidRule { brand, reason } => {
                write!(f, "invalid rule for {}: {}", brand, reason)
            }
            Self::FeatureNotEnabled(feature) => {
                write!(f, "feature `{}` is not enabled", feature)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
