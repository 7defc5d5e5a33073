use tracing::trace;

use super::{
    digit_count, EditKind, Effects, FieldContext, FieldController, FieldProps, Key, KeyOutcome,
    KeyPress,
};
use crate::error::FieldError;
use crate::expiry::{is_expiry_invalid, validate_expiry, EXPIRY_MIN_DIGITS};
use crate::focus::FieldId;
use crate::format::{format_expiry, format_expiry_on_delete};
use crate::state::{FieldPhase, FieldState};

/// Collapses the display separator: `"12 / 25"` → `"12/25"`.
fn collapse(value: &str) -> String {
    value.replace(" / ", "/")
}

/// `/` or `-` typed while the value has no separator yet.
fn is_month_dash_key(c: char, value: &str) -> bool {
    (c == '/' || c == '-') && !value.contains(|v: char| v == '/' || v == '-')
}

/// Expiry date input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpiryController;

impl FieldController for ExpiryController {
    fn id(&self) -> FieldId {
        FieldId::Expiry
    }

    fn key_press(&self, state: &FieldState, _ctx: &FieldContext<'_>, press: KeyPress) -> KeyOutcome {
        let value = &state.formatted_value;
        let Key::Char(c) = press.key else {
            return KeyOutcome::Accept;
        };

        if !is_month_dash_key(c, value) && !c.is_ascii_digit() {
            return KeyOutcome::Suppress;
        }
        if !value.is_empty() && !press.has_selection && digit_count(value) >= EXPIRY_MIN_DIGITS {
            return KeyOutcome::Suppress;
        }
        KeyOutcome::Accept
    }

    fn change(
        &self,
        state: &mut FieldState,
        ctx: &FieldContext<'_>,
        input: &str,
        edit: EditKind,
    ) -> Effects {
        let mut effects = Effects::none();

        let formatted = match edit {
            EditKind::Insert => format_expiry(input),
            EditKind::Delete => format_expiry_on_delete(input),
        };
        let value = collapse(&formatted);

        effects.clear_error();

        let mut error = None;
        let phase = if formatted.is_empty() {
            FieldPhase::Empty
        } else if value.len() > EXPIRY_MIN_DIGITS {
            error = is_expiry_invalid(&value, &ctx.config.labels.expiry_error, ctx.today);
            FieldPhase::Complete {
                valid: error.is_none(),
            }
        } else {
            FieldPhase::Typing
        };

        trace!(len = value.len(), ?phase, ?edit, "expiry changed");

        let advance = state.settle(input, formatted, phase);

        if let Some(message) = error {
            effects.publish_error(FieldId::Expiry, message);
        }
        if advance {
            effects.focus(FieldId::Cvc);
        }

        effects
    }

    fn blur(&self, state: &mut FieldState, ctx: &FieldContext<'_>) -> Effects {
        let mut effects = Effects::none();
        let value = collapse(&state.formatted_value);

        match validate_expiry(&value, ctx.today) {
            Ok(_) => state.is_valid = true,
            Err(e) => {
                state.is_valid = false;
                let message = FieldError::InvalidExpiry(e).message(&ctx.config.labels);
                effects.publish_error(FieldId::Expiry, message);
            }
        }

        effects
    }

    fn props(&self, state: &FieldState, ctx: &FieldContext<'_>) -> FieldProps {
        FieldProps {
            id: FieldId::Expiry.id(),
            value: state.formatted_value.clone(),
            max_length: None,
            placeholder: ctx.config.labels.expiry_placeholder.clone(),
            input_type: "tel",
            auto_complete: Some("cc-exp"),
            pattern: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Fixture;
    use super::*;
    use crate::focus::FocusRequested;
    use crate::state::FormAction;
    use crate::FormConfig;

    fn change(fx: &mut Fixture, state: &mut FieldState, input: &str, edit: EditKind) -> Effects {
        let effects = ExpiryController.change(state, &fx.ctx(), input, edit);
        fx.apply(&effects);
        effects
    }

    #[test]
    fn test_typing_sequence() {
        let mut fx = Fixture::new(FormConfig::default());
        let mut state = FieldState::default();

        change(&mut fx, &mut state, "1", EditKind::Insert);
        assert_eq!(state.formatted_value, "1");
        change(&mut fx, &mut state, "12", EditKind::Insert);
        assert_eq!(state.formatted_value, "12 / ");
        change(&mut fx, &mut state, "12 / 2", EditKind::Insert);
        assert_eq!(state.phase, FieldPhase::Typing);

        let effects = change(&mut fx, &mut state, "12 / 29", EditKind::Insert);
        assert_eq!(state.formatted_value, "12 / 29");
        assert_eq!(state.phase, FieldPhase::Complete { valid: true });
        assert_eq!(effects.focus, Some(FocusRequested(FieldId::Cvc)));
    }

    #[test]
    fn test_delete_drops_separator() {
        let mut fx = Fixture::new(FormConfig::default());
        let mut state = FieldState::default();

        change(&mut fx, &mut state, "12", EditKind::Insert);
        change(&mut fx, &mut state, "12 /", EditKind::Delete);
        assert_eq!(state.formatted_value, "12");
    }

    #[test]
    fn test_past_date_publishes_error() {
        let mut fx = Fixture::new(FormConfig::default());
        let mut state = FieldState::default();

        let effects = change(&mut fx, &mut state, "01 / 20", EditKind::Insert);
        assert_eq!(effects.focus, None);
        assert_eq!(state.phase, FieldPhase::Complete { valid: false });
        assert_eq!(
            fx.form.active_error.as_ref().map(|e| e.message.as_str()),
            Some("Expiry year cannot be in the past")
        );
    }

    #[test]
    fn test_month_out_of_range() {
        let mut fx = Fixture::new(FormConfig::default());
        let mut state = FieldState::default();

        // "13" is reformatted to "01 / 3", so paste a full value
        change(&mut fx, &mut state, "00/25", EditKind::Insert);
        assert_eq!(
            fx.form.active_error.as_ref().map(|e| e.message.as_str()),
            Some("Expiry month must be between 01 and 12")
        );
    }

    #[test]
    fn test_key_press() {
        let fx = Fixture::new(FormConfig::default());
        let ctx = fx.ctx();
        let mut state = FieldState::default();

        state.formatted_value = "1".to_string();
        assert_eq!(
            ExpiryController.key_press(&state, &ctx, KeyPress::new(Key::Char('/'))),
            KeyOutcome::Accept
        );
        assert_eq!(
            ExpiryController.key_press(&state, &ctx, KeyPress::new(Key::Char('-'))),
            KeyOutcome::Accept
        );
        assert_eq!(
            ExpiryController.key_press(&state, &ctx, KeyPress::new(Key::Char('x'))),
            KeyOutcome::Suppress
        );

        state.formatted_value = "12 / ".to_string();
        assert_eq!(
            ExpiryController.key_press(&state, &ctx, KeyPress::new(Key::Char('/'))),
            KeyOutcome::Suppress
        );

        state.formatted_value = "12 / 25".to_string();
        assert_eq!(
            ExpiryController.key_press(&state, &ctx, KeyPress::new(Key::Char('1'))),
            KeyOutcome::Suppress
        );
    }

    #[test]
    fn test_blur_flags_incomplete() {
        let mut fx = Fixture::new(FormConfig::default());
        let mut state = FieldState::default();
        change(&mut fx, &mut state, "12 / 2", EditKind::Insert);

        let effects = ExpiryController.blur(&mut state, &fx.ctx());
        assert!(!state.is_valid);
        assert!(matches!(
            effects.actions.as_slice(),
            [FormAction::SetError { field: FieldId::Expiry, message }] if message == "Expiry date is invalid"
        ));
    }

    #[test]
    fn test_setback_to_number() {
        let effects = ExpiryController.key_down(&FieldState::default(), Key::Backspace);
        assert_eq!(effects.focus, Some(FocusRequested(FieldId::Number)));
    }
}
