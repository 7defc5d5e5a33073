use tracing::trace;

use super::{
    numeric_key_press, EditKind, Effects, FieldContext, FieldController, FieldProps, KeyOutcome,
    KeyPress,
};
use crate::error::FieldError;
use crate::focus::FieldId;
use crate::format::{format_cvc, has_cvc_reached_max_length, CVC_MAX_LENGTH};
use crate::state::{FieldPhase, FieldState};
use crate::validate::validate_cvc_with;

/// Security code input.
#[derive(Debug, Clone, Copy, Default)]
pub struct CvcController;

impl FieldController for CvcController {
    fn id(&self) -> FieldId {
        FieldId::Cvc
    }

    fn key_press(&self, state: &FieldState, ctx: &FieldContext<'_>, press: KeyPress) -> KeyOutcome {
        let value = &state.formatted_value;
        let full = has_cvc_reached_max_length(value.len(), ctx.brand_rule());
        numeric_key_press(press, value, full)
    }

    fn change(
        &self,
        state: &mut FieldState,
        ctx: &FieldContext<'_>,
        input: &str,
        _edit: EditKind,
    ) -> Effects {
        let mut effects = Effects::none();

        let formatted = format_cvc(input, CVC_MAX_LENGTH);
        let brand = ctx.form.detected_brand;
        let len = formatted.len();

        effects.clear_error();

        let phase = if len == 0 {
            FieldPhase::Empty
        } else if len >= ctx.table.cvc_length(brand) {
            FieldPhase::Complete {
                valid: validate_cvc_with(&formatted, brand, ctx.table),
            }
        } else {
            FieldPhase::Typing
        };

        trace!(len, ?phase, "cvc changed");

        let advance = state.settle(input, formatted, phase);

        if phase == (FieldPhase::Complete { valid: false }) {
            let message = FieldError::InvalidCvc.message(&ctx.config.labels);
            effects.publish_error(FieldId::Cvc, message);
        }
        if advance && ctx.config.enable_zip_input && ctx.form.postal_field_visible {
            effects.focus(FieldId::Zip);
        }

        effects
    }

    fn blur(&self, state: &mut FieldState, ctx: &FieldContext<'_>) -> Effects {
        let mut effects = Effects::none();
        state.is_valid =
            validate_cvc_with(&state.formatted_value, ctx.form.detected_brand, ctx.table);
        if !state.is_valid {
            let message = FieldError::InvalidCvc.message(&ctx.config.labels);
            effects.publish_error(FieldId::Cvc, message);
        }
        effects
    }

    fn props(&self, state: &FieldState, ctx: &FieldContext<'_>) -> FieldProps {
        FieldProps {
            id: FieldId::Cvc.id(),
            value: state.formatted_value.clone(),
            max_length: Some(5),
            placeholder: ctx.config.labels.cvc_placeholder.clone(),
            input_type: "tel",
            auto_complete: Some("off"),
            pattern: None,
        }
    }
}
