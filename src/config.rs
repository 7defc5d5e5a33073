//! Form configuration.
//!
//! A [`FormConfig`] is plain data: postal-code collection, brand rule
//! overrides, image overrides and every user-facing string. With the `serde`
//! feature it loads from JSON; keys left out keep their defaults.
//!
//! # Example
//!
//! ```
//! use card_field::FormConfig;
//!
//! let mut config = FormConfig::default();
//! config.enable_zip_input = true;
//! config.labels.invalid_cvc = "Security code is invalid".to_string();
//! assert!(config.validate().is_ok());
//! ```

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::expiry::ExpiryMessages;
use crate::table::{CardImages, CardTypeTable, RuleOverride};
use crate::CardBrand;

/// Every string the form shows.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TextLabels {
    /// Error for a rejected card number.
    pub invalid_card_number: String,
    /// Errors for rejected expiry dates.
    pub expiry_error: ExpiryMessages,
    /// Error for a rejected CVC.
    pub invalid_cvc: String,
    /// Error for a rejected postal code.
    pub invalid_zip_code: String,
    /// Placeholder of the number input.
    pub card_number_placeholder: String,
    /// Placeholder of the expiry input.
    pub expiry_placeholder: String,
    /// Placeholder of the CVC input.
    pub cvc_placeholder: String,
    /// Placeholder of the zip input.
    pub zip_placeholder: String,
}

impl Default for TextLabels {
    fn default() -> Self {
        Self {
            invalid_card_number: "Card number is invalid".to_string(),
            expiry_error: ExpiryMessages::default(),
            invalid_cvc: "CVC is invalid".to_string(),
            invalid_zip_code: "Zip code is invalid".to_string(),
            card_number_placeholder: "Card number".to_string(),
            expiry_placeholder: "MM/YY".to_string(),
            cvc_placeholder: "CVC".to_string(),
            zip_placeholder: "Zip".to_string(),
        }
    }
}

/// Configuration for a [`crate::CardForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FormConfig {
    /// Collect a postal code after the CVC.
    pub enable_zip_input: bool,
    /// Restrict the postal code to digits.
    pub zip_numeric_only: bool,
    /// Per-brand rule replacements.
    pub brand_overrides: BTreeMap<CardBrand, RuleOverride>,
    /// Card image keys.
    pub images: CardImages,
    /// User-facing strings.
    pub labels: TextLabels,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            enable_zip_input: false,
            zip_numeric_only: true,
            brand_overrides: BTreeMap::new(),
            images: CardImages::default(),
            labels: TextLabels::default(),
        }
    }
}

impl FormConfig {
    /// Builds the brand table this configuration describes.
    pub fn card_types(&self) -> Result<CardTypeTable, ConfigError> {
        CardTypeTable::new(&self.brand_overrides)
    }

    /// Checks that the brand overrides are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.card_types().map(|_| ())
    }

    /// Parses a JSON configuration.
    ///
    /// ```
    /// use card_field::FormConfig;
    ///
    /// let config = FormConfig::from_json(r#"{
    ///     "enable_zip_input": true,
    ///     "brand_overrides": { "visa": { "lengths": [16] } },
    ///     "labels": { "expiry_error": { "year_out_of_range": "Card expired" } }
    /// }"#).unwrap();
    ///
    /// assert!(config.enable_zip_input);
    /// assert_eq!(config.labels.expiry_error.year_out_of_range, "Card expired");
    /// assert_eq!(config.labels.invalid_cvc, "CVC is invalid");
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration from `reader`.
    #[cfg(feature = "serde")]
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON configuration file.
    #[cfg(feature = "serde")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// JSON loading needs the `serde` feature.
    #[cfg(not(feature = "serde"))]
    pub fn from_json(_json: &str) -> Result<Self, ConfigError> {
        Err(ConfigError::FeatureNotEnabled("serde"))
    }

    /// JSON loading needs the `serde` feature.
    #[cfg(not(feature = "serde"))]
    pub fn from_file<P: AsRef<std::path::Path>>(_path: P) -> Result<Self, ConfigError> {
        Err(ConfigError::FeatureNotEnabled("serde"))
    }
}
