use tracing::trace;

use super::{
    numeric_key_press, EditKind, Effects, FieldContext, FieldController, FieldProps, Key,
    KeyOutcome, KeyPress,
};
use crate::error::FieldError;
use crate::focus::FieldId;
use crate::format::{format_zip, has_zip_reached_max_length, DEFAULT_ZIP_LENGTH};
use crate::state::{FieldPhase, FieldState};
use crate::validate::{is_zip_valid, ZIP_VALIDATE_THRESHOLD};

/// Postal code input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipController;

impl FieldController for ZipController {
    fn id(&self) -> FieldId {
        FieldId::Zip
    }

    fn key_press(&self, state: &FieldState, ctx: &FieldContext<'_>, press: KeyPress) -> KeyOutcome {
        let value = &state.formatted_value;
        let full = has_zip_reached_max_length(value.chars().count());

        if ctx.config.zip_numeric_only {
            return numeric_key_press(press, value, full);
        }
        match press.key {
            Key::Char(_) if !value.is_empty() && !press.has_selection && full => {
                KeyOutcome::Suppress
            }
            _ => KeyOutcome::Accept,
        }
    }

    fn change(
        &self,
        state: &mut FieldState,
        ctx: &FieldContext<'_>,
        input: &str,
        _edit: EditKind,
    ) -> Effects {
        let mut effects = Effects::none();

        let formatted = format_zip(input, ctx.config.zip_numeric_only);
        let len = formatted.chars().count();

        effects.clear_error();

        let phase = if len == 0 {
            FieldPhase::Empty
        } else if len >= ZIP_VALIDATE_THRESHOLD {
            FieldPhase::Complete {
                valid: is_zip_valid(&formatted),
            }
        } else {
            FieldPhase::Typing
        };

        trace!(len, ?phase, "zip changed");

        state.settle(input, formatted, phase);

        if phase == (FieldPhase::Complete { valid: false }) {
            let message = FieldError::InvalidPostalCode.message(&ctx.config.labels);
            effects.publish_error(FieldId::Zip, message);
        }

        effects
    }

    fn blur(&self, state: &mut FieldState, ctx: &FieldContext<'_>) -> Effects {
        let mut effects = Effects::none();
        state.is_valid = is_zip_valid(&state.formatted_value);
        if !state.is_valid {
            let message = FieldError::InvalidPostalCode.message(&ctx.config.labels);
            effects.publish_error(FieldId::Zip, message);
        }
        effects
    }

    fn props(&self, state: &FieldState, ctx: &FieldContext<'_>) -> FieldProps {
        FieldProps {
            id: FieldId::Zip.id(),
            value: state.formatted_value.clone(),
            max_length: Some(DEFAULT_ZIP_LENGTH),
            placeholder: ctx.config.labels.zip_placeholder.clone(),
            input_type: "text",
            auto_complete: None,
            pattern: ctx.config.zip_numeric_only.then_some("[0-9]*"),
        }
    }
}
