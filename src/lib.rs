//! # card_field
//!
//! Core of a payment card form: format-as-you-type, validation, brand
//! detection and focus coordination for four fields (card number, expiry,
//! CVC and an optional postal code). Rendering is left to the host; this
//! crate decides what each input should display, whether a keystroke is
//! allowed, which error to show and which field to focus next.
//!
//! ## Features
//!
//! - Card number grouping per brand (Amex `4 6 5`, Diners `4 6 4`, ...)
//! - Expiry `MM / YY` formatting with past-date and month-range checks
//! - CVC length per detected brand
//! - Postal code field revealed once enough card digits are typed
//! - Auto-advance and backspace setback between fields
//! - Configurable brand rules, images and error text
//!
//! ## Quick Start
//!
//! ```rust
//! use card_field::{CardBrand, CardForm, EditKind, FieldId, FixedClock, FormConfig, YearMonth};
//!
//! let mut form = CardForm::new(FormConfig::default())
//!     .unwrap()
//!     .with_clock(FixedClock(YearMonth::new(2024, 6)));
//!
//! for field in [FieldId::Number, FieldId::Expiry, FieldId::Cvc] {
//!     form.mount(field, None, |_| {});
//! }
//!
//! let shown = form.change(FieldId::Number, "371449635398431", EditKind::Insert);
//! assert_eq!(shown.as_deref(), Some("3714 496353 98431"));
//! assert_eq!(form.detected_brand(), Some(CardBrand::Amex));
//!
//! form.change(FieldId::Expiry, "01/20", EditKind::Insert);
//! assert_eq!(
//!     form.view().active_error_message.as_deref(),
//!     Some("Expiry year cannot be in the past")
//! );
//! ```
//!
//! ## Standalone helpers
//!
//! The formatters and validators work without a form:
//!
//! ```rust
//! use card_field::{format, validate};
//!
//! assert_eq!(format::format_card_number("4242424242424242"), "4242 4242 4242 4242");
//! assert_eq!(format::format_expiry("1225"), "12 / 25");
//! assert!(validate::validate_card_number("4242 4242 4242 4242"));
//! assert!(validate::is_zip_valid("90210"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | JSON form configuration |
//! | `cli` | `cardinput` command-line tool |
//! | `wasm` | WebAssembly bindings |
//!
//! ## Security
//!
//! - Field values are wiped from memory when a field is unmounted
//! - `Debug` output and log lines show masked card numbers only
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod card;
pub mod config;
pub mod controller;
pub mod detect;
pub mod error;
pub mod expiry;
pub mod focus;
pub mod form;
pub mod format;
pub mod luhn;
pub mod mask;
pub mod state;
pub mod table;
pub mod validate;

#[cfg(feature = "wasm")]
mod wasm;

// Re-export main types at crate root
pub use card::{CardBrand, MAX_CARD_DIGITS, MIN_CARD_DIGITS};
pub use config::{FormConfig, TextLabels};
pub use controller::{
    controller_for, EditKind, Effects, FieldContext, FieldController, FieldProps, Key, KeyOutcome,
    KeyPress,
};
pub use error::{ConfigError, FieldError};
pub use expiry::{Clock, ExpiryError, ExpiryMessages, FixedClock, SystemClock, YearMonth};
pub use focus::{DirectFocus, FieldId, FocusBus, FocusRequested, FocusTransport, Subscription};
pub use form::{CardForm, FieldCallbacks, FormView};
pub use state::{FieldPhase, FieldState, FormAction, FormState};
pub use table::{CardBrandRule, CardImages, CardTypeTable, RuleOverride};
