//! Card brands known to the form.
//!
//! [`CardBrand`] identifies a payment network. The per-brand metadata the
//! form needs while the user types (valid lengths, CVC length, grouping and
//! image key) lives here as compile-time defaults; the runtime view with
//! caller overrides applied is [`crate::table::CardTypeTable`].

use std::fmt;

/// Supported credit card brands/networks.
///
/// Each variant represents a major payment network with its own BIN ranges
/// and length rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum CardBrand {
    /// Visa - Prefix 4, lengths 16, 18, 19
    Visa,
    /// Mastercard - Prefix 51-55, 2221-2720, length 16
    Mastercard,
    /// American Express - Prefix 34, 37, length 15
    Amex,
    /// Discover - Prefix 6011, 644-649, 65, length 16-19
    Discover,
    /// Diners Club - Prefix 36, 38, 300-305, length 14-19
    DinersClub,
    /// JCB - Prefix 3528-3589, length 16-19
    Jcb,
    /// UnionPay - Prefix 62, length 16-19
    UnionPay,
    /// Maestro - Prefix 50, 56-69, length 12-19
    Maestro,
    /// Mir - Russian payment system, Prefix 2200-2204, length 16-19
    Mir,
    /// RuPay - Indian payment system, Prefix 81, 82, length 16
    RuPay,
    /// Verve - Nigerian payment system, Prefix 506, 507, length 16-19
    Verve,
    /// Elo - Brazilian payment system, various prefixes, length 16
    Elo,
    /// Troy - Turkish payment system, Prefix 9792, length 16
    Troy,
    /// BC Card - South Korean payment system, Prefix 94, length 16
    BcCard,
}

impl CardBrand {
    /// Every brand, in table order.
    pub const ALL: [CardBrand; 14] = [
        Self::Visa,
        Self::Mastercard,
        Self::Amex,
        Self::Discover,
        Self::DinersClub,
        Self::Jcb,
        Self::UnionPay,
        Self::Maestro,
        Self::Mir,
        Self::RuPay,
        Self::Verve,
        Self::Elo,
        Self::Troy,
        Self::BcCard,
    ];

    /// Returns the default valid lengths for this card brand.
    #[inline]
    pub const fn valid_lengths(&self) -> &'static [u8] {
        match self {
            Self::Visa => &[16, 18, 19],
            Self::Mastercard => &[16],
            Self::Amex => &[15],
            Self::Discover => &[16, 17, 18, 19],
            Self::DinersClub => &[14, 15, 16, 17, 18, 19],
            Self::Jcb => &[16, 17, 18, 19],
            Self::UnionPay => &[16, 17, 18, 19],
            Self::Maestro => &[12, 13, 14, 15, 16, 17, 18, 19],
            Self::Mir => &[16, 17, 18, 19],
            Self::RuPay => &[16],
            Self::Verve => &[16, 17, 18, 19],
            Self::Elo => &[16],
            Self::Troy => &[16],
            Self::BcCard => &[16],
        }
    }

    /// Returns the default CVC length: 4 for American Express, 3 otherwise.
    #[inline]
    pub const fn cvc_length(&self) -> usize {
        match self {
            Self::Amex => 4,
            _ => 3,
        }
    }

    /// Returns the default digit grouping for display, or `None` for plain
    /// groups of four.
    #[inline]
    pub const fn digit_groups(&self) -> Option<&'static [usize]> {
        match self {
            Self::Amex => Some(&[4, 6, 5]),
            Self::DinersClub => Some(&[4, 6, 4]),
            _ => None,
        }
    }

    /// Returns a human-readable name for the card brand.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Visa => "Visa",
            Self::Mastercard => "Mastercard",
            Self::Amex => "American Express",
            Self::Discover => "Discover",
            Self::DinersClub => "Diners Club",
            Self::Jcb => "JCB",
            Self::UnionPay => "UnionPay",
            Self::Maestro => "Maestro",
            Self::Mir => "Mir",
            Self::RuPay => "RuPay",
            Self::Verve => "Verve",
            Self::Elo => "Elo",
            Self::Troy => "Troy",
            Self::BcCard => "BC Card",
        }
    }

    /// Returns the default image asset key shown while this brand is detected.
    #[inline]
    pub const fn image_key(&self) -> &'static str {
        match self {
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::Amex => "amex",
            Self::Discover => "discover",
            Self::DinersClub => "dinersclub",
            Self::Jcb => "jcb",
            Self::UnionPay => "unionpay",
            Self::Maestro => "maestro",
            Self::Mir => "mir",
            Self::RuPay => "rupay",
            Self::Verve => "verve",
            Self::Elo => "elo",
            Self::Troy => "troy",
            Self::BcCard => "bccard",
        }
    }

    /// Parses a brand from a loose user-facing name (`"visa"`, `"mc"`,
    /// `"american express"`, ...).
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "visa" => Some(Self::Visa),
            "mastercard" | "mc" => Some(Self::Mastercard),
            "amex" | "american express" | "american-express" => Some(Self::Amex),
            "discover" => Some(Self::Discover),
            "diners" | "dinersclub" | "diners club" | "diners-club" => Some(Self::DinersClub),
            "jcb" => Some(Self::Jcb),
            "unionpay" | "union pay" | "union-pay" => Some(Self::UnionPay),
            "maestro" => Some(Self::Maestro),
            "mir" => Some(Self::Mir),
            "rupay" | "ru-pay" => Some(Self::RuPay),
            "verve" => Some(Self::Verve),
            "elo" => Some(Self::Elo),
            "troy" => Some(Self::Troy),
            "bccard" | "bc card" | "bc-card" => Some(Self::BcCard),
            _ => None,
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Maximum number of digits in a credit card number.
pub const MAX_CARD_DIGITS: usize = 19;

/// Minimum number of digits in a credit card number.
pub const MIN_CARD_DIGITS: usize = 12;
