//! Per-field and shared form state.
//!
//! [`FieldState`] belongs to one field slot. [`FormState`] is shared by all
//! fields and only ever replaced wholesale by [`FormState::reduce`].

use std::fmt;

use zeroize::Zeroize;

use crate::focus::FieldId;
use crate::mask::mask_digits;
use crate::CardBrand;

/// Where a field is in its input lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPhase {
    /// Nothing typed.
    #[default]
    Empty,
    /// Some input, not yet at a completion length.
    Typing,
    /// At a completion length and validated.
    Complete {
        /// Result of the validator.
        valid: bool,
    },
}

impl FieldPhase {
    /// True for `Complete { valid: true }`.
    #[inline]
    pub const fn is_complete_valid(&self) -> bool {
        matches!(self, Self::Complete { valid: true })
    }
}

/// Live state of one input.
///
/// Values are wiped from memory on drop, and `Debug` shows them masked.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    /// Content as last received from the input.
    pub raw_value: String,
    /// Content written back to the input.
    pub formatted_value: String,
    /// Result of the last validation.
    pub is_valid: bool,
    /// Whether the input currently has focus.
    pub has_focus: bool,
    /// Lifecycle position.
    pub phase: FieldPhase,
}

impl FieldState {
    /// Stores new content and moves to `phase`, returning true if this is a
    /// transition into `Complete { valid: true }`.
    pub(crate) fn settle(&mut self, raw: &str, formatted: String, phase: FieldPhase) -> bool {
        let entered_valid = phase.is_complete_valid() && !self.phase.is_complete_valid();

        self.raw_value.zeroize();
        self.raw_value.push_str(raw);
        self.formatted_value.zeroize();
        self.formatted_value = formatted;
        self.is_valid = match phase {
            FieldPhase::Complete { valid } => valid,
            FieldPhase::Empty | FieldPhase::Typing => true,
        };
        self.phase = phase;

        entered_valid
    }

    /// Returns true if the field holds no text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.formatted_value.is_empty()
    }
}

impl fmt::Debug for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldState")
            .field("raw_value", &mask_digits(&self.raw_value))
            .field("formatted_value", &mask_digits(&self.formatted_value))
            .field("is_valid", &self.is_valid)
            .field("has_focus", &self.has_focus)
            .field("phase", &self.phase)
            .finish()
    }
}

impl Drop for FieldState {
    fn drop(&mut self) {
        self.raw_value.zeroize();
        self.formatted_value.zeroize();
    }
}

/// The error currently displayed by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveError {
    /// Field that published it.
    pub field: FieldId,
    /// Text shown to the user.
    pub message: String,
}

/// State shared by every field of one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    /// Brand inferred from the number field.
    pub detected_brand: Option<CardBrand>,
    /// Image key for the detected brand.
    pub card_image: String,
    /// Whether the postal field is shown.
    pub postal_field_visible: bool,
    /// The single error on display, if any.
    pub active_error: Option<ActiveError>,
}

impl FormState {
    /// Initial state showing `placeholder_image`.
    pub fn new(placeholder_image: impl Into<String>) -> Self {
        Self {
            detected_brand: None,
            card_image: placeholder_image.into(),
            postal_field_visible: false,
            active_error: None,
        }
    }

    /// Applies `action`, producing the next state.
    pub fn reduce(&self, action: FormAction) -> FormState {
        match action {
            FormAction::DetectBrand { brand, image } => FormState {
                detected_brand: brand,
                card_image: image,
                ..self.clone()
            },
            FormAction::SetPostalVisible(visible) => FormState {
                postal_field_visible: visible,
                ..self.clone()
            },
            FormAction::SetError { field, message } => FormState {
                active_error: Some(ActiveError { field, message }),
                ..self.clone()
            },
            FormAction::ClearError => FormState {
                active_error: None,
                ..self.clone()
            },
        }
    }
}

/// A change to [`FormState`] requested by a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// New brand (or none) and its image.
    DetectBrand {
        /// Detected brand.
        brand: Option<CardBrand>,
        /// Image key to show.
        image: String,
    },
    /// Show or hide the postal field.
    SetPostalVisible(bool),
    /// Display an error.
    SetError {
        /// Publishing field.
        field: FieldId,
        /// Error text.
        message: String,
    },
    /// Remove the displayed error, whichever field set it.
    ClearError,
}
