//! Per-field input state machines.
//!
//! Every field runs the same lifecycle (`Empty → Typing → Complete`) behind
//! the [`FieldController`] trait. A controller never touches shared state
//! directly: it reads a [`FieldContext`] snapshot, updates its own
//! [`FieldState`], and returns [`Effects`] that the form applies once the
//! handler has finished.
//!
//! The four implementations:
//!
//! - `NumberController` - grouping, brand detection, postal reveal
//! - `ExpiryController` - `MM / YY` masking, date checks
//! - `CvcController` - brand-length CVC
//! - `ZipController` - postal code

mod cvc;
mod expiry;
mod number;
mod zip;

pub use cvc::CvcController;
pub use expiry::ExpiryController;
pub use number::NumberController;
pub use zip::ZipController;

use crate::config::FormConfig;
use crate::expiry::YearMonth;
use crate::focus::{FieldId, FocusRequested};
use crate::state::{FieldState, FormAction, FormState};
use crate::table::{CardBrandRule, CardTypeTable};

/// Read-only view handed to a controller for one event.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// Form configuration.
    pub config: &'a FormConfig,
    /// Brand rules.
    pub table: &'a CardTypeTable,
    /// Shared state as it was before this event.
    pub form: &'a FormState,
    /// Current month, for expiry checks.
    pub today: YearMonth,
}

impl<'a> FieldContext<'a> {
    /// Rule of the currently detected brand.
    #[inline]
    pub fn brand_rule(&self) -> Option<&'a CardBrandRule> {
        self.table.rule_for(self.form.detected_brand)
    }
}

/// A key as seen by key press / key down handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Anything else (arrows, tab, enter...).
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }

    /// True for Backspace and Delete.
    #[inline]
    pub const fn is_deletion(&self) -> bool {
        matches!(self, Self::Backspace | Self::Delete)
    }
}

/// A key press about to insert text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key.
    pub key: Key,
    /// Whether part of the field's text is selected (typing would replace it).
    pub has_selection: bool,
}

impl KeyPress {
    /// A press with no selection.
    #[inline]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            has_selection: false,
        }
    }
}

/// Whether a key press may reach the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Let the character through.
    Accept,
    /// Block it.
    Suppress,
}

/// Direction of the edit that produced a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditKind {
    /// Typing or pasting.
    #[default]
    Insert,
    /// Backspace, delete or cut.
    Delete,
}

/// What a handler asks the form to do once it returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    /// Shared-state updates, applied in order.
    pub actions: Vec<FormAction>,
    /// Field to focus after the actions are applied.
    pub focus: Option<FocusRequested>,
}

impl Effects {
    /// No effects.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if nothing needs applying.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.focus.is_none()
    }

    fn clear_error(&mut self) {
        self.actions.push(FormAction::ClearError);
    }

    fn publish_error(&mut self, field: FieldId, message: String) {
        self.actions.push(FormAction::SetError { field, message });
    }

    fn focus(&mut self, field: FieldId) {
        self.focus = Some(FocusRequested(field));
    }
}

/// Attributes the presentation layer renders on an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProps {
    /// DOM id.
    pub id: &'static str,
    /// Current display text.
    pub value: String,
    /// `maxlength` attribute, if any.
    pub max_length: Option<usize>,
    /// Placeholder text.
    pub placeholder: String,
    /// `type` attribute.
    pub input_type: &'static str,
    /// `autocomplete` attribute, if any.
    pub auto_complete: Option<&'static str>,
    /// `pattern` attribute, if any.
    pub pattern: Option<&'static str>,
}

/// Input handling for one field.
pub trait FieldController {
    /// Which field this controller drives.
    fn id(&self) -> FieldId;

    /// Decides whether a typed character may reach the input.
    fn key_press(&self, state: &FieldState, ctx: &FieldContext<'_>, press: KeyPress)
        -> KeyOutcome;

    /// Reformats `input`, stores it in `state` and validates once the field
    /// is long enough.
    fn change(
        &self,
        state: &mut FieldState,
        ctx: &FieldContext<'_>,
        input: &str,
        edit: EditKind,
    ) -> Effects;

    /// Runs the full validator.
    fn blur(&self, state: &mut FieldState, ctx: &FieldContext<'_>) -> Effects;

    /// Backspace or Delete on an empty field moves focus to the previous one.
    fn key_down(&self, state: &FieldState, key: Key) -> Effects {
        let mut effects = Effects::none();
        if key.is_deletion() && state.is_empty() {
            if let Some(previous) = self.id().previous() {
                effects.focus(previous);
            }
        }
        effects
    }

    /// Render attributes for the input.
    fn props(&self, state: &FieldState, ctx: &FieldContext<'_>) -> FieldProps;
}

/// Returns the controller for `field`.
pub fn controller_for(field: FieldId) -> Box<dyn FieldController> {
    match field {
        FieldId::Number => Box::new(NumberController),
        FieldId::Expiry => Box::new(ExpiryController),
        FieldId::Cvc => Box::new(CvcController),
        FieldId::Zip => Box::new(ZipController),
    }
}

/// Shared key-press rule of the numeric fields: digits only, and nothing
/// more once full unless the typed key replaces a selection.
fn numeric_key_press(press: KeyPress, current: &str, full: bool) -> KeyOutcome {
    match press.key {
        Key::Char(c) if !c.is_ascii_digit() => KeyOutcome::Suppress,
        Key::Char(_) if !current.is_empty() && !press.has_selection && full => {
            KeyOutcome::Suppress
        }
        _ => KeyOutcome::Accept,
    }
}

#[inline]
fn digit_count(s: &str) -> usize {
    s.bytes().filter(u8::is_ascii_digit).count()
}

#[cfg(test)]
struct Fixture {
    config: FormConfig,
    table: CardTypeTable,
    form: FormState,
}

#[cfg(test)]
impl Fixture {
    fn new(config: FormConfig) -> Self {
        let table = config.card_types().unwrap();
        let form = FormState::new(config.images.placeholder.clone());
        Self {
            config,
            table,
            form,
        }
    }

    fn ctx(&self) -> FieldContext<'_> {
        FieldContext {
            config: &self.config,
            table: &self.table,
            form: &self.form,
            today: YearMonth::new(2024, 6),
        }
    }

    fn apply(&mut self, effects: &Effects) {
        for action in &effects.actions {
            self.form = self.form.reduce(action.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("7"), Key::Char('7'));
        assert_eq!(Key::from_dom("/"), Key::Char('/'));
        assert_eq!(Key::from_dom("Backspace"), Key::Backspace);
        assert_eq!(Key::from_dom("Delete"), Key::Delete);
        assert_eq!(Key::from_dom("ArrowLeft"), Key::Other);
        assert_eq!(Key::from_dom(""), Key::Other);
    }

    #[test]
    fn test_numeric_key_press() {
        let digit = KeyPress::new(Key::Char('4'));
        assert_eq!(numeric_key_press(digit, "", false), KeyOutcome::Accept);
        assert_eq!(numeric_key_press(digit, "123", true), KeyOutcome::Suppress);
        assert_eq!(
            numeric_key_press(KeyPress { has_selection: true, ..digit }, "123", true),
            KeyOutcome::Accept
        );
        assert_eq!(
            numeric_key_press(KeyPress::new(Key::Char('x')), "", false),
            KeyOutcome::Suppress
        );
        assert_eq!(
            numeric_key_press(KeyPress::new(Key::Other), "123", true),
            KeyOutcome::Accept
        );
    }

    #[test]
    fn test_default_key_down_setback() {
        let empty = FieldState::default();
        let cvc = CvcController;
        assert_eq!(
            cvc.key_down(&empty, Key::Backspace).focus,
            Some(FocusRequested(FieldId::Expiry))
        );
        assert_eq!(
            cvc.key_down(&empty, Key::Delete).focus,
            Some(FocusRequested(FieldId::Expiry))
        );
        assert!(cvc.key_down(&empty, Key::Char('1')).is_empty());
        assert!(NumberController.key_down(&empty, Key::Backspace).is_empty());
    }

    #[test]
    fn test_controller_for() {
        for field in FieldId::ALL {
            assert_eq!(controller_for(field).id(), field);
        }
    }
}
