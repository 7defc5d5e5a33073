//! Card-type table: per-brand rules with caller overrides merged in.
//!
//! The table is built once from the compile-time defaults on [`CardBrand`]
//! and the overrides in [`crate::FormConfig`], then shared read-only by every
//! field controller.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use card_field::table::{CardTypeTable, RuleOverride};
//! use card_field::CardBrand;
//!
//! let mut overrides = BTreeMap::new();
//! overrides.insert(
//!     CardBrand::Visa,
//!     RuleOverride { lengths: Some(vec![16]), ..Default::default() },
//! );
//!
//! let table = CardTypeTable::new(&overrides).unwrap();
//! assert_eq!(table.lengths(Some(CardBrand::Visa)), &[16]);
//! assert_eq!(table.lengths(None), &[16]);
//! assert_eq!(table.cvc_length(Some(CardBrand::Amex)), 4);
//! ```

use std::collections::BTreeMap;

use crate::card::{MAX_CARD_DIGITS, MIN_CARD_DIGITS};
use crate::error::ConfigError;
use crate::CardBrand;

/// Lengths assumed when no brand has been detected yet.
pub const FALLBACK_LENGTHS: &[u8] = &[16];

/// CVC length assumed when no brand has been detected yet.
pub const FALLBACK_CVC_LENGTH: usize = 3;

/// Image key shown while no brand is detected.
pub const PLACEHOLDER_IMAGE: &str = "placeholder";

/// Immutable metadata for one brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardBrandRule {
    /// The brand this rule describes.
    pub brand: CardBrand,
    /// Valid total digit counts, ascending.
    pub lengths: Vec<u8>,
    /// Exact CVC digit count.
    pub cvc_length: usize,
    /// Display grouping; `None` means blocks of four.
    pub grouping: Option<Vec<usize>>,
}

impl CardBrandRule {
    /// The built-in rule for `brand`.
    pub fn default_for(brand: CardBrand) -> Self {
        Self {
            brand,
            lengths: brand.valid_lengths().to_vec(),
            cvc_length: brand.cvc_length(),
            grouping: brand.digit_groups().map(|g| g.to_vec()),
        }
    }

    /// The largest valid digit count.
    #[inline]
    pub fn max_length(&self) -> usize {
        self.lengths
            .last()
            .copied()
            .unwrap_or(FALLBACK_LENGTHS[0]) as usize
    }

    /// Returns true if `len` is one of the brand's valid digit counts.
    #[inline]
    pub fn accepts_length(&self, len: usize) -> bool {
        self.lengths.iter().any(|&l| l as usize == len)
    }
}

/// Caller-supplied replacement for parts of a brand rule.
///
/// Unset fields keep the built-in value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct RuleOverride {
    /// Replacement digit counts.
    pub lengths: Option<Vec<u8>>,
    /// Replacement CVC length.
    pub cvc_length: Option<usize>,
    /// Replacement display grouping.
    pub grouping: Option<Vec<usize>>,
}

/// All brand rules, defaults merged with overrides.
#[derive(Debug, Clone)]
pub struct CardTypeTable {
    rules: BTreeMap<CardBrand, CardBrandRule>,
}

impl Default for CardTypeTable {
    fn default() -> Self {
        Self {
            rules: CardBrand::ALL
                .iter()
                .map(|&b| (b, CardBrandRule::default_for(b)))
                .collect(),
        }
    }
}

impl CardTypeTable {
    /// Builds the table, rejecting overrides that would break formatting or
    /// validation.
    pub fn new(overrides: &BTreeMap<CardBrand, RuleOverride>) -> Result<Self, ConfigError> {
        let mut table = Self::default();

        for (&brand, over) in overrides {
            let rule = table
                .rules
                .entry(brand)
                .or_insert_with(|| CardBrandRule::default_for(brand));

            if let Some(lengths) = &over.lengths {
                rule.lengths = normalize_lengths(brand, lengths)?;
            }

            if let Some(cvc) = over.cvc_length {
                if !(3..=4).contains(&cvc) {
                    return Err(ConfigError::InvalidRule {
                        brand,
                        reason: format!("cvc length {} is outside 3..=4", cvc),
                    });
                }
                rule.cvc_length = cvc;
            }

            if let Some(grouping) = &over.grouping {
                if grouping.is_empty() || grouping.contains(&0) {
                    return Err(ConfigError::InvalidRule {
                        brand,
                        reason: "grouping must be non-empty and contain no zero-sized groups"
                            .to_string(),
                    });
                }
                let total = grouping
                    .iter()
                    .try_fold(0usize, |acc, &size| acc.checked_add(size));
                if !matches!(total, Some(t) if t <= MAX_CARD_DIGITS) {
                    return Err(ConfigError::InvalidRule {
                        brand,
                        reason: format!("grouping covers more than {} digits", MAX_CARD_DIGITS),
                    });
                }
                rule.grouping = Some(grouping.clone());
            }
        }

        Ok(table)
    }

    /// Looks up the rule for `brand`.
    #[inline]
    pub fn rule(&self, brand: CardBrand) -> Option<&CardBrandRule> {
        self.rules.get(&brand)
    }

    /// Looks up the rule for an optional brand.
    #[inline]
    pub fn rule_for(&self, brand: Option<CardBrand>) -> Option<&CardBrandRule> {
        brand.and_then(|b| self.rule(b))
    }

    /// Valid digit counts for `brand`, or [`FALLBACK_LENGTHS`].
    pub fn lengths(&self, brand: Option<CardBrand>) -> &[u8] {
        match self.rule_for(brand) {
            Some(rule) => &rule.lengths,
            None => FALLBACK_LENGTHS,
        }
    }

    /// CVC length for `brand`, or [`FALLBACK_CVC_LENGTH`].
    pub fn cvc_length(&self, brand: Option<CardBrand>) -> usize {
        self.rule_for(brand)
            .map(|r| r.cvc_length)
            .unwrap_or(FALLBACK_CVC_LENGTH)
    }

    /// Largest valid digit count for `brand`.
    pub fn max_length(&self, brand: Option<CardBrand>) -> usize {
        self.lengths(brand)
            .last()
            .copied()
            .unwrap_or(FALLBACK_LENGTHS[0]) as usize
    }

    /// Iterates the rules in brand order.
    pub fn iter(&self) -> impl Iterator<Item = &CardBrandRule> {
        self.rules.values()
    }
}

fn normalize_lengths(brand: CardBrand, lengths: &[u8]) -> Result<Vec<u8>, ConfigError> {
    if lengths.is_empty() {
        return Err(ConfigError::InvalidRule {
            brand,
            reason: "lengths must not be empty".to_string(),
        });
    }

    if let Some(&bad) = lengths
        .iter()
        .find(|&&l| (l as usize) < MIN_CARD_DIGITS || (l as usize) > MAX_CARD_DIGITS)
    {
        return Err(ConfigError::InvalidRule {
            brand,
            reason: format!(
                "length {} is outside {}..={}",
                bad, MIN_CARD_DIGITS, MAX_CARD_DIGITS
            ),
        });
    }

    let mut sorted = lengths.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    Ok(sorted)
}

/// Image keys per brand with a placeholder fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CardImages {
    /// Per-brand replacements for [`CardBrand::image_key`].
    pub brands: BTreeMap<CardBrand, String>,
    /// Shown while no brand is detected.
    pub placeholder: String,
}

impl Default for CardImages {
    fn default() -> Self {
        Self {
            brands: BTreeMap::new(),
            placeholder: PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

impl CardImages {
    /// The image for `brand`: caller override, then built-in key, then the
    /// placeholder.
    pub fn image_for(&self, brand: Option<CardBrand>) -> &str {
        match brand {
            Some(b) => self
                .brands
                .get(&b)
                .map(String::as_str)
                .unwrap_or_else(|| b.image_key()),
            None => &self.placeholder,
        }
    }
}
