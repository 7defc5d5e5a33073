//! Property-based tests using proptest.
//!
//! These check invariants that should hold for any input a user can type or
//! paste, including junk.

use std::cell::RefCell;
use std::rc::Rc;

use card_field::{
    detect::detect_brand_str,
    expiry::{is_expiry_invalid, validate_expiry, ExpiryMessages},
    format, luhn, mask,
    table::CardTypeTable,
    validate, CardBrand, CardForm, EditKind, FieldId, FixedClock, FormConfig, Key, YearMonth,
};
use proptest::prelude::*;

const TODAY: YearMonth = YearMonth::new(2024, 6);

// =============================================================================
// STRATEGIES
// =============================================================================

/// Digits mixed with the separators users type or paste.
fn card_like() -> impl Strategy<Value = String> {
    "[0-9 -]{0,30}"
}

/// Anything that might land in the expiry input.
fn expiry_like() -> impl Strategy<Value = String> {
    "[0-9/ -]{0,10}"
}

fn any_brand() -> impl Strategy<Value = CardBrand> {
    proptest::sample::select(CardBrand::ALL.to_vec())
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}

#[derive(Debug, Clone)]
enum Event {
    Change(FieldId, String, bool),
    Blur(FieldId),
    KeyDown(FieldId, bool),
    Focus(FieldId),
}

fn field() -> impl Strategy<Value = FieldId> {
    proptest::sample::select(FieldId::ALL.to_vec())
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => (field(), "[0-9a-zA-Z/ -]{0,24}", any::<bool>())
            .prop_map(|(f, s, d)| Event::Change(f, s, d)),
        1 => field().prop_map(Event::Blur),
        1 => (field(), any::<bool>()).prop_map(|(f, b)| Event::KeyDown(f, b)),
        1 => field().prop_map(Event::Focus),
    ]
}

// =============================================================================
// FORMATTING
// =============================================================================

proptest! {
    #[test]
    fn prop_card_format_is_idempotent(input in card_like()) {
        let once = format::format_card_number(&input);
        prop_assert_eq!(format::format_card_number(&once), once);
    }

    #[test]
    fn prop_card_format_keeps_digit_prefix(input in card_like()) {
        let formatted = format::format_card_number(&input);
        let digits = format::strip_formatting(&input);
        let kept = format::strip_formatting(&formatted);
        prop_assert!(kept.len() <= 19);
        prop_assert!(digits.starts_with(&kept));
    }

    #[test]
    fn prop_brand_format_respects_rule(input in "[0-9]{0,24}", brand in any_brand()) {
        let table = CardTypeTable::default();
        let rule = table.rule(brand);
        let formatted = format::format_card_number_for(&input, rule);

        prop_assert!(digit_count(&formatted) <= table.max_length(Some(brand)));
        prop_assert_eq!(format::format_card_number_for(&formatted, rule), formatted.clone());
        prop_assert!(!formatted.starts_with(' ') && !formatted.ends_with(' '));
    }

    #[test]
    fn prop_expiry_format_is_stable(input in expiry_like()) {
        let once = format::format_expiry(&input);
        prop_assert!(digit_count(&once) <= 4);
        prop_assert_eq!(format::format_expiry(&once), once);
    }

    #[test]
    fn prop_expiry_delete_never_grows(input in expiry_like()) {
        let deleting = format::format_expiry_on_delete(&input);
        let inserting = format::format_expiry(&input);
        prop_assert!(deleting.len() <= inserting.len());
    }

    #[test]
    fn prop_cvc_and_zip_bounds(input in "\\PC{0,12}", numeric in any::<bool>()) {
        let cvc = format::format_cvc(&input, format::CVC_MAX_LENGTH);
        prop_assert!(cvc.len() <= 4);
        prop_assert!(cvc.bytes().all(|b| b.is_ascii_digit()));

        let zip = format::format_zip(&input, numeric);
        prop_assert!(zip.chars().count() <= format::DEFAULT_ZIP_LENGTH);
        if numeric {
            prop_assert!(zip.bytes().all(|b| b.is_ascii_digit()));
        }
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

proptest! {
    #[test]
    fn prop_valid_number_meets_brand_rules(input in card_like()) {
        if validate::validate_card_number(&input) {
            let digits: Vec<u8> = input
                .bytes()
                .filter(u8::is_ascii_digit)
                .map(|b| b - b'0')
                .collect();
            let brand = detect_brand_str(&input);
            prop_assert!(brand.is_some());
            let lengths = brand.map(|b| b.valid_lengths()).unwrap_or(&[]);
            prop_assert!(lengths.contains(&(digits.len() as u8)));
            prop_assert!(luhn::validate(&digits));
        }
    }

    #[test]
    fn prop_check_digit_completes_number(prefix in proptest::collection::vec(0u8..10, 11..18)) {
        let mut digits = prefix.clone();
        digits.push(luhn::generate_check_digit(&prefix));
        prop_assert!(luhn::validate(&digits));
    }

    #[test]
    fn prop_cvc_length_per_brand(cvc in "[0-9]{1,6}", brand in any_brand()) {
        let valid = validate::validate_cvc(&cvc, Some(brand));
        prop_assert_eq!(valid, cvc.len() == brand.cvc_length());
    }

    #[test]
    fn prop_future_expiry_is_valid(month in 1u8..=12, year in 25u16..=99) {
        let input = format!("{:02}/{:02}", month, year);
        prop_assert_eq!(validate_expiry(&input, TODAY), Ok(YearMonth::new(2000 + year, month)));
    }

    #[test]
    fn prop_past_year_is_rejected(month in 1u8..=12, year in 0u16..24) {
        let input = format!("{:02}/{:02}", month, year);
        let error = validate_expiry(&input, TODAY).unwrap_err();
        prop_assert!(error.is_past());
    }

    #[test]
    fn prop_short_expiry_never_reports(input in "[0-9/]{0,6}") {
        if digit_count(&input) < 4 {
            prop_assert_eq!(is_expiry_invalid(&input, &ExpiryMessages::default(), TODAY), None);
        }
    }

    #[test]
    fn prop_zip_length_bounds(zip in "[A-Za-z0-9]{0,14}") {
        let valid = validate::is_zip_valid(&zip);
        prop_assert_eq!(valid, (3..=10).contains(&zip.len()));
    }
}

// =============================================================================
// MASKING
// =============================================================================

proptest! {
    #[test]
    fn prop_mask_hides_all_but_four(input in card_like()) {
        let masked = mask::mask_digits(&input);
        prop_assert_eq!(masked.chars().count(), input.chars().count());
        prop_assert!(digit_count(&masked) <= 4);
    }
}

// =============================================================================
// FORM
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_form_survives_any_event_sequence(
        events in proptest::collection::vec(event(), 0..40),
        zip in any::<bool>(),
    ) {
        let config = FormConfig {
            enable_zip_input: zip,
            ..Default::default()
        };
        let mut form = CardForm::new(config).unwrap().with_clock(FixedClock(TODAY));
        let requests = Rc::new(RefCell::new(Vec::new()));
        for f in FieldId::ALL {
            let requests = Rc::clone(&requests);
            form.mount(f, None, move |ev| requests.borrow_mut().push(ev.0));
        }

        for event in events {
            let before = requests.borrow().len();
            match event {
                Event::Change(f, text, deleting) => {
                    let edit = if deleting { EditKind::Delete } else { EditKind::Insert };
                    let shown = form.change(f, &text, edit);
                    prop_assert!(shown.is_some());
                }
                Event::Blur(f) => form.blur(f),
                Event::KeyDown(f, backspace) => {
                    let key = if backspace { Key::Backspace } else { Key::Char('1') };
                    form.key_down(f, key);
                }
                Event::Focus(f) => form.focus(f),
            }
            // At most one focus request per event
            prop_assert!(requests.borrow().len() <= before + 1);

            let view = form.view();
            prop_assert_eq!(view.is_invalid, view.active_error_message.is_some());
            if !zip {
                prop_assert!(!view.postal_field_visible);
            }
            let number = &form.field_state(FieldId::Number).unwrap().formatted_value;
            prop_assert!(digit_count(number) <= 19);
        }

        if !zip {
            prop_assert!(!requests.borrow().contains(&FieldId::Zip));
        }
    }

    #[test]
    fn prop_detected_brand_tracks_number(input in "[0-9]{0,19}") {
        let mut form = CardForm::new(FormConfig::default()).unwrap();
        form.mount(FieldId::Number, None, |_| {});
        form.change(FieldId::Number, &input, EditKind::Insert);
        prop_assert_eq!(form.detected_brand(), detect_brand_str(&input));
    }
}

// =============================================================================
// FIELD ORDER
// =============================================================================

#[test]
fn test_next_and_previous_are_inverse() {
    for f in FieldId::ALL {
        if let Some(next) = f.next() {
            assert_eq!(next.previous(), Some(f));
        }
    }
}
