use tracing::{debug, trace};

use super::{
    numeric_key_press, digit_count, EditKind, Effects, FieldContext, FieldController, FieldProps,
    KeyOutcome, KeyPress,
};
use crate::detect::detect_brand_str;
use crate::error::FieldError;
use crate::focus::FieldId;
use crate::format::{format_card_number_for, has_card_number_reached_max_length, strip_formatting};
use crate::mask::mask_digits;
use crate::state::{FieldPhase, FieldState, FormAction};
use crate::validate::validate_card_number_with;

/// Digits typed before the postal field appears.
pub const POSTAL_REVEAL_DIGITS: usize = 6;

/// Card number input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberController;

impl FieldController for NumberController {
    fn id(&self) -> FieldId {
        FieldId::Number
    }

    fn key_press(&self, state: &FieldState, ctx: &FieldContext<'_>, press: KeyPress) -> KeyOutcome {
        let value = &state.formatted_value;
        let full = has_card_number_reached_max_length(digit_count(value), ctx.brand_rule());
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

        let digits = strip_formatting(input);
        let brand = detect_brand_str(&digits);
        let rule = ctx.table.rule_for(brand);
        let formatted = format_card_number_for(&digits, rule);
        let len = digit_count(&formatted);

        let image = ctx.config.images.image_for(brand);
        if brand != ctx.form.detected_brand || image != ctx.form.card_image {
            debug!(brand = ?brand, image, "card brand changed");
            effects.actions.push(FormAction::DetectBrand {
                brand,
                image: image.to_string(),
            });
        }

        if ctx.config.enable_zip_input {
            let visible = len >= POSTAL_REVEAL_DIGITS;
            if visible != ctx.form.postal_field_visible {
                effects.actions.push(FormAction::SetPostalVisible(visible));
            }
        }

        effects.clear_error();

        let lengths = ctx.table.lengths(brand);
        let max = ctx.table.max_length(brand);
        let phase = if len == 0 {
            FieldPhase::Empty
        } else if lengths.iter().any(|&l| l as usize == len)
            && validate_card_number_with(&formatted, ctx.table)
        {
            FieldPhase::Complete { valid: true }
        } else if len >= max {
            FieldPhase::Complete { valid: false }
        } else {
            FieldPhase::Typing
        };

        trace!(value = %mask_digits(&formatted), len, ?phase, "number changed");

        let advance = state.settle(input, formatted, phase);

        if phase == (FieldPhase::Complete { valid: false }) {
            let message = FieldError::InvalidCardNumber.message(&ctx.config.labels);
            effects.publish_error(FieldId::Number, message);
        }
        if advance {
            effects.focus(FieldId::Expiry);
        }

        effects
    }

    fn blur(&self, state: &mut FieldState, ctx: &FieldContext<'_>) -> Effects {
        let mut effects = Effects::none();
        state.is_valid = validate_card_number_with(&state.formatted_value, ctx.table);
        if !state.is_valid {
            let message = FieldError::InvalidCardNumber.message(&ctx.config.labels);
            effects.publish_error(FieldId::Number, message);
        }
        effects
    }

    fn props(&self, state: &FieldState, ctx: &FieldContext<'_>) -> FieldProps {
        FieldProps {
            id: FieldId::Number.id(),
            value: state.formatted_value.clone(),
            max_length: Some(19),
            placeholder: ctx.config.labels.card_number_placeholder.clone(),
            input_type: "tel",
            auto_complete: Some("cc-number"),
            pattern: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Fixture, Key};
    use super::*;
    use crate::focus::FocusRequested;
    use crate::{CardBrand, FormConfig};

    fn type_number(fx: &mut Fixture, state: &mut FieldState, input: &str) -> Effects {
        let effects = NumberController.change(state, &fx.ctx(), input, EditKind::Insert);
        fx.apply(&effects);
        effects
    }

    #[test]
    fn test_change_formats_and_detects() {
        let mut fx = Fixture::new(FormConfig::default());
        let mut state = FieldState::default();

        type_number(&mut fx, &mut state, "42424");
        assert_eq!(state.formatted_value, "4242 4");
        assert_eq!(state.phase, FieldPhase::Typing);
        assert_eq!(fx.form.detected_brand, Some(CardBrand::Visa));
        assert_eq!(fx.form.card_image, "visa");
    }

    #[test]
    fn test_valid_number_advances_once() {
        let mut fx = Fixture::new(FormConfig::default());
        let mut state = FieldState::default();

        let effects = type_number(&mut fx, &mut state, "4242424242424242");
        assert_eq!(effects.focus, Some(FocusRequested(FieldId::Expiry)));
        assert!(state.is_valid);

        let effects = type_number(&mut fx, &mut state, "4242 4242 4242 4242");
        assert_eq!(effects.focus, None);
    }

    #[test]
    fn test_invalid_at_max_length_publishes_error() {
        let mut fx = Fixture::new(FormConfig::default());
        let mut state = FieldState::default();

        type_number(&mut fx, &mut state, "5555555555554445");
        assert_eq!(state.phase, FieldPhase::Complete { valid: false });
        let err = fx.form.active_error.as_ref().unwrap();
        assert_eq!(err.field, FieldId::Number);
        assert_eq!(err.message, "Card number is invalid");

        // Fixing a digit clears the error and advances
        let effects = type_number(&mut fx, &mut state, "5555555555554444");
        assert!(fx.form.active_error.is_none());
        assert_eq!(effects.focus, Some(FocusRequested(FieldId::Expiry)));
    }

    #[test]
    fn test_truncates_to_brand_length() {
        let mut fx = Fixture::new(FormConfig::default());
        let mut state = FieldState::default();

        type_number(&mut fx, &mut state, "37828224631000512");
        assert_eq!(state.formatted_value, "3782 822463 10005");
        assert_eq!(fx.form.detected_brand, Some(CardBrand::Amex));
    }

    #[test]
    fn test_postal_visibility_follows_digit_count() {
        let mut config = FormConfig::default();
        config.enable_zip_input = true;
        let mut fx = Fixture::new(config);
        let mut state = FieldState::default();

        type_number(&mut fx, &mut state, "42424");
        assert!(!fx.form.postal_field_visible);
        type_number(&mut fx, &mut state, "424242");
        assert!(fx.form.postal_field_visible);
        type_number(&mut fx, &mut state, "4242 4");
        assert!(!fx.form.postal_field_visible);
    }

    #[test]
    fn test_postal_never_visible_when_disabled() {
        let mut fx = Fixture::new(FormConfig::default());
        let mut state = FieldState::default();
        type_number(&mut fx, &mut state, "4242424242424242");
        assert!(!fx.form.postal_field_visible);
    }

    #[test]
    fn test_key_press_limits() {
        let mut fx = Fixture::new(FormConfig::default());
        let mut state = FieldState::default();
        let digit = KeyPress::new(Key::Char('1'));

        assert_eq!(
            NumberController.key_press(&state, &fx.ctx(), KeyPress::new(Key::Char('a'))),
            KeyOutcome::Suppress
        );

        type_number(&mut fx, &mut state, "5555555555554444");
        assert_eq!(
            NumberController.key_press(&state, &fx.ctx(), digit),
            KeyOutcome::Suppress
        );
        assert_eq!(
            NumberController.key_press(
                &state,
                &fx.ctx(),
                KeyPress {
                    key: Key::Char('1'),
                    has_selection: true
                }
            ),
            KeyOutcome::Accept
        );

        // Visa allows up to 19 digits
        type_number(&mut fx, &mut state, "4242424242424242");
        assert_eq!(
            NumberController.key_press(&state, &fx.ctx(), digit),
            KeyOutcome::Accept
        );
    }

    #[test]
    fn test_blur_validates() {
        let fx = Fixture::new(FormConfig::default());
        let mut state = FieldState::default();
        let effects = NumberController.blur(&mut state, &fx.ctx());
        assert!(!state.is_valid);
        assert!(matches!(
            effects.actions.as_slice(),
            [FormAction::SetError { field: FieldId::Number, .. }]
        ));
    }

    #[test]
    fn test_props() {
        let fx = Fixture::new(FormConfig::default());
        let props = NumberController.props(&FieldState::default(), &fx.ctx());
        assert_eq!(props.id, "card-number");
        assert_eq!(props.auto_complete, Some("cc-number"));
        assert_eq!(props.placeholder, "Card number");
        assert_eq!(props.max_length, Some(19));
    }
}
